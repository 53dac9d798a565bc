// ==========================================
// 项目执行仪表盘 - 层级构建器
// ==========================================
// 职责: 扁平记录 → Component → [Batch →] Grade → Unit → Week → 记录列表
// 红线: 是否含 Batch 层仅由第一条记录是否带 Batch 键决定（不看值是否为空）
// ==========================================

use crate::config::ConfigManager;
use crate::domain::hierarchy::{GradeGroups, HierarchicalData};
use crate::domain::record::WorkflowRecord;
use std::collections::BTreeMap;
use tracing::debug;

/// 默认空批次标签
pub const DEFAULT_NO_BATCH_LABEL: &str = "No Batch";

pub struct HierarchyBuilder {
    no_batch_label: String,
}

impl Default for HierarchyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self {
            no_batch_label: DEFAULT_NO_BATCH_LABEL.to_string(),
        }
    }

    pub fn from_config(config: &ConfigManager) -> Self {
        Self {
            no_batch_label: config.no_batch_label(),
        }
    }

    /// 构建层级结构（叶子内保持输入顺序，不去重）
    pub fn build(&self, records: &[WorkflowRecord]) -> HierarchicalData {
        let has_batch = records.first().is_some_and(|r| r.batch.is_some());
        debug!(records = records.len(), has_batch, "构建层级结构");

        if has_batch {
            let mut components: BTreeMap<String, BTreeMap<String, GradeGroups>> = BTreeMap::new();
            for record in records {
                let batch = match record.batch.as_deref() {
                    Some(b) if !b.is_empty() => b.to_string(),
                    _ => self.no_batch_label.clone(),
                };
                let grades = components
                    .entry(record.component.clone())
                    .or_default()
                    .entry(batch)
                    .or_default();
                insert_leaf(grades, record);
            }
            HierarchicalData::Batched(components)
        } else {
            let mut components: BTreeMap<String, GradeGroups> = BTreeMap::new();
            for record in records {
                let grades = components.entry(record.component.clone()).or_default();
                insert_leaf(grades, record);
            }
            HierarchicalData::Plain(components)
        }
    }
}

fn insert_leaf(grades: &mut GradeGroups, record: &WorkflowRecord) {
    grades
        .entry(record.grade.clone())
        .or_default()
        .entry(record.unit.clone())
        .or_default()
        .entry(record.week.clone())
        .or_default()
        .push(record.clone());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(component: &str, batch: Option<&str>, grade: &str, unit: &str, week: &str) -> WorkflowRecord {
        WorkflowRecord {
            component: component.to_string(),
            batch: batch.map(str::to_string),
            grade: grade.to_string(),
            unit: unit.to_string(),
            week: week.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_plain_hierarchy() {
        let mut first = record("Math", None, "G3", "U1", "W1");
        first.activity = "first".to_string();
        let mut second = record("Math", None, "G3", "U1", "W1");
        second.activity = "second".to_string();
        let records = vec![first, second, record("ELA", None, "G4", "U2", "W2")];

        let tree = HierarchyBuilder::new().build(&records);
        assert!(!tree.has_batch());
        assert_eq!(tree.component_names(), vec!["ELA", "Math"]);
        assert_eq!(tree.record_count(), 3);

        let HierarchicalData::Plain(components) = &tree else {
            panic!("expected plain hierarchy");
        };
        let leaf = &components["Math"]["G3"]["U1"]["W1"];
        // 保持输入顺序，不去重
        assert_eq!(leaf.len(), 2);
        assert_eq!(leaf[0].activity, "first");
        assert_eq!(leaf[1].activity, "second");
    }

    #[test]
    fn test_batched_hierarchy_with_default_label() {
        let records = vec![
            record("Math", Some("B1"), "G3", "U1", "W1"),
            record("Math", Some(""), "G3", "U1", "W1"),
            record("Math", None, "G3", "U1", "W1"),
        ];

        let tree = HierarchyBuilder::new().build(&records);
        assert!(tree.has_batch());

        let HierarchicalData::Batched(components) = &tree else {
            panic!("expected batched hierarchy");
        };
        assert_eq!(components["Math"]["B1"]["G3"]["U1"]["W1"].len(), 1);
        assert_eq!(components["Math"]["No Batch"]["G3"]["U1"]["W1"].len(), 2);
    }

    #[test]
    fn test_batch_decided_by_first_record_only() {
        let records = vec![
            record("Math", None, "G3", "U1", "W1"),
            record("Math", Some("B1"), "G3", "U1", "W1"),
        ];
        let tree = HierarchyBuilder::new().build(&records);
        assert!(!tree.has_batch());
        assert_eq!(tree.record_count(), 2);
    }

    #[test]
    fn test_empty_keys_are_valid_groups() {
        let records = vec![record("", None, "", "", "")];
        let tree = HierarchyBuilder::new().build(&records);
        assert_eq!(tree.record_count(), 1);
        assert_eq!(tree.component_names(), vec![""]);
    }

    #[test]
    fn test_empty_input() {
        let tree = HierarchyBuilder::new().build(&[]);
        assert!(tree.is_empty());
        assert_eq!(tree.record_count(), 0);
    }
}
