// ==========================================
// 项目执行仪表盘 - 记录规范化器
// ==========================================
// 输入形状:
//   1. 扁平: [ {..}, {..} ]
//   2. 嵌套: { Component: { Grade: { Unit: { Week: [ {..} ] } } } }
// 输出: 扁平 Vec<WorkflowRecord>，所有必填字段存在
// 红线: 嵌套形状中路径键覆盖记录自身的 Component/Grade/Unit/Week
// ==========================================

use crate::domain::record::WorkflowRecord;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use serde_json::{Map, Value};
use tracing::{debug, error, warn};

/// 嵌套形状的层级深度（Component → Grade → Unit → Week）
const NESTED_DEPTH: usize = 4;

pub struct RecordNormalizer {
    mapper: FieldMapper,
}

impl Default for RecordNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordNormalizer {
    pub fn new() -> Self {
        Self {
            mapper: FieldMapper,
        }
    }

    /// 规范化原始输入
    ///
    /// 输入既非数组也非对象时记录错误日志并返回空列表，不中断调用方
    pub fn normalize(&self, input: &Value) -> Vec<WorkflowRecord> {
        match self.try_normalize(input) {
            Ok(records) => records,
            Err(e) => {
                error!(error = %e, "规范化失败，返回空数据集");
                Vec::new()
            }
        }
    }

    /// 规范化原始输入（保留错误原因）
    pub fn try_normalize(&self, input: &Value) -> ImportResult<Vec<WorkflowRecord>> {
        let records = match input {
            Value::Array(items) => self.normalize_flat(items),
            Value::Object(root) => self.normalize_nested(root),
            other => return Err(ImportError::InvalidShape(json_kind(other).to_string())),
        };

        debug!(count = records.len(), "规范化完成");
        Ok(records)
    }

    // ==========================================
    // 扁平形状
    // ==========================================

    fn normalize_flat(&self, items: &[Value]) -> Vec<WorkflowRecord> {
        let mut records = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match item {
                Value::Object(row) => records.push(self.mapper.map_object(row)),
                other => warn!(index, kind = json_kind(other), "跳过非对象条目"),
            }
        }
        records
    }

    // ==========================================
    // 嵌套形状（显式栈，深度优先，保持文档顺序）
    // ==========================================

    fn normalize_nested(&self, root: &Map<String, Value>) -> Vec<WorkflowRecord> {
        let mut records = Vec::new();
        let mut stack: Vec<(Vec<&str>, &Value)> = Vec::new();

        // 逆序入栈，出栈即为正序
        for (key, child) in root.iter().rev() {
            stack.push((vec![key.as_str()], child));
        }

        while let Some((path, node)) = stack.pop() {
            if path.len() < NESTED_DEPTH {
                match node {
                    Value::Object(children) => {
                        for (key, child) in children.iter().rev() {
                            let mut child_path = path.clone();
                            child_path.push(key.as_str());
                            stack.push((child_path, child));
                        }
                    }
                    other => {
                        debug!(path = %path.join("/"), kind = json_kind(other), "跳过非对象节点")
                    }
                }
                continue;
            }

            // Week 层: 期望记录数组
            let Value::Array(items) = node else {
                debug!(path = %path.join("/"), kind = json_kind(node), "Week 节点不是数组，跳过");
                continue;
            };

            for item in items {
                let Value::Object(row) = item else {
                    warn!(path = %path.join("/"), kind = json_kind(item), "跳过非对象条目");
                    continue;
                };

                let mut record = self.mapper.map_object(row);
                record.component = path[0].to_string();
                record.grade = path[1].to_string();
                record.unit = path[2].to_string();
                record.week = path[3].to_string();
                records.push(record);
            }
        }

        records
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::PercentField;
    use serde_json::json;

    #[test]
    fn test_flat_input_fills_missing_fields() {
        let input = json!([
            { "Component": "Math", "Progress": "Complete", "% Complete": 1 },
            { "Component": "ELA" }
        ]);
        let records = RecordNormalizer::new().normalize(&input);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].component, "Math");
        assert_eq!(records[0].percent_complete, PercentField::Number(1.0));
        assert_eq!(records[1].progress, "");
        assert_eq!(records[1].scheduled_start, "");
    }

    #[test]
    fn test_flat_input_skips_non_objects() {
        let input = json!([{ "Component": "Math" }, 42, "text", null]);
        let records = RecordNormalizer::new().normalize(&input);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_nested_input_stamps_path_values() {
        let input = json!({
            "Math": {
                "G3": {
                    "U1": {
                        "W1": [
                            { "Component": "WrongComponent", "Activity": "Draft" },
                            { "Activity": "Review" }
                        ]
                    }
                }
            },
            "ELA": {
                "G4": { "U2": { "W5": [ { "Activity": "Edit" } ] } }
            }
        });
        let records = RecordNormalizer::new().normalize(&input);

        assert_eq!(records.len(), 3);
        // 文档顺序
        assert_eq!(records[0].activity, "Draft");
        assert_eq!(records[0].component, "Math");
        assert_eq!(records[0].grade, "G3");
        assert_eq!(records[0].unit, "U1");
        assert_eq!(records[0].week, "W1");
        assert_eq!(records[1].activity, "Review");
        assert_eq!(records[2].component, "ELA");
        assert_eq!(records[2].week, "W5");
    }

    #[test]
    fn test_nested_input_ignores_malformed_branches() {
        let input = json!({
            "Math": {
                "G3": {
                    "U1": { "W1": "not-an-array", "W2": [ { "Activity": "Keep" } ] },
                    "U2": 5
                }
            },
            "Science": null
        });
        let records = RecordNormalizer::new().normalize(&input);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].activity, "Keep");
        assert_eq!(records[0].week, "W2");
    }

    #[test]
    fn test_invalid_shape() {
        let normalizer = RecordNormalizer::new();
        assert!(normalizer.normalize(&json!("oops")).is_empty());
        assert!(normalizer.normalize(&json!(12)).is_empty());
        assert!(matches!(
            normalizer.try_normalize(&Value::Null),
            Err(ImportError::InvalidShape(_))
        ));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let input = json!([
            { "Component": "Math", "Week": 2, "% Complete": "45%", "Batch": "B1" }
        ]);
        let normalizer = RecordNormalizer::new();
        let once = normalizer.normalize(&input);
        let twice = normalizer.normalize(&serde_json::to_value(&once).unwrap());
        assert_eq!(once, twice);
    }
}
