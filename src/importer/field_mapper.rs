// ==========================================
// 项目执行仪表盘 - 字段映射器
// ==========================================
// 职责: 松散 JSON 对象 → WorkflowRecord
// 规则: 缺失字段补 ""；数字/布尔转为文本；未知字段丢弃
// ==========================================

use crate::domain::record::{PercentField, RecordField, WorkflowRecord};
use serde_json::{Map, Value};

pub struct FieldMapper;

impl FieldMapper {
    /// 将一个源对象映射为完整的 WorkflowRecord
    pub fn map_object(&self, row: &Map<String, Value>) -> WorkflowRecord {
        WorkflowRecord {
            health: self.get_string(row, RecordField::Health),
            format: self.get_string(row, RecordField::Format),
            grade: self.get_string(row, RecordField::Grade),
            unit: self.get_string(row, RecordField::Unit),
            week: self.get_string(row, RecordField::Week),
            component: self.get_string(row, RecordField::Component),
            // Batch: 键存在（哪怕为 null）即为 Some
            batch: row
                .get(RecordField::Batch.column_name())
                .map(value_to_text),
            activity: self.get_string(row, RecordField::Activity),
            workflow: self.get_string(row, RecordField::Workflow),
            assigned_to: self.get_string(row, RecordField::AssignedTo),
            ww_status: self.get_string(row, RecordField::WwStatus),
            progress: self.get_string(row, RecordField::Progress),
            predecessors: self.get_string(row, RecordField::Predecessors),
            reporting_status: self.get_string(row, RecordField::ReportingStatus),
            duration: self.get_string(row, RecordField::Duration),
            scheduled_start: self.get_string(row, RecordField::ScheduledStart),
            scheduled_end: self.get_string(row, RecordField::ScheduledEnd),
            comments: self.get_string(row, RecordField::Comments),
            completion_date: self.get_string(row, RecordField::CompletionDate),
            variance: self.get_string(row, RecordField::Variance),
            baseline_start: self.get_string(row, RecordField::BaselineStart),
            baseline_finish: self.get_string(row, RecordField::BaselineFinish),
            percent_complete: self.get_percent(row, RecordField::PercentComplete),
            percent_remaining: self.get_percent(row, RecordField::PercentRemaining),
            percent_allocation: self.get_percent(row, RecordField::PercentAllocation),
            read: self.get_string(row, RecordField::Read),
        }
    }

    /// 提取文本字段（缺失 → ""）
    fn get_string(&self, row: &Map<String, Value>, field: RecordField) -> String {
        row.get(field.column_name())
            .map(value_to_text)
            .unwrap_or_default()
    }

    /// 提取百分比字段（数字保留为数字）
    fn get_percent(&self, row: &Map<String, Value>, field: RecordField) -> PercentField {
        match row.get(field.column_name()) {
            Some(Value::Number(n)) => n
                .as_f64()
                .map(PercentField::Number)
                .unwrap_or_else(|| PercentField::Text(n.to_string())),
            Some(other) => PercentField::Text(value_to_text(other)),
            None => PercentField::default(),
        }
    }
}

/// JSON 值转文本: null/数组/对象 → ""，数字/布尔 → 字面量
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}
