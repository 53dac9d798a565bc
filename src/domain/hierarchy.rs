// ==========================================
// 项目执行仪表盘 - 层级数据结构
// ==========================================
// 职责: Component → [Batch →] Grade → Unit → Week → 记录列表
// 红线: 整体重建，不做原地修改；是否含 Batch 层在加载时一次性决定
// ==========================================

use crate::domain::record::WorkflowRecord;
use serde::Serialize;
use std::collections::BTreeMap;

pub type WeekGroups = BTreeMap<String, Vec<WorkflowRecord>>;
pub type UnitGroups = BTreeMap<String, WeekGroups>;
pub type GradeGroups = BTreeMap<String, UnitGroups>;
pub type BatchGroups = BTreeMap<String, GradeGroups>;

/// 层级数据（序列化为嵌套对象，与上传的嵌套 JSON 形状一致）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HierarchicalData {
    /// Component → Grade → Unit → Week
    Plain(BTreeMap<String, GradeGroups>),
    /// Component → Batch → Grade → Unit → Week
    Batched(BTreeMap<String, BatchGroups>),
}

impl Default for HierarchicalData {
    fn default() -> Self {
        HierarchicalData::Plain(BTreeMap::new())
    }
}

/// 叶子节点路径
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafPath<'a> {
    pub component: &'a str,
    pub batch: Option<&'a str>,
    pub grade: &'a str,
    pub unit: &'a str,
    pub week: &'a str,
}

impl HierarchicalData {
    pub fn has_batch(&self) -> bool {
        matches!(self, HierarchicalData::Batched(_))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            HierarchicalData::Plain(map) => map.is_empty(),
            HierarchicalData::Batched(map) => map.is_empty(),
        }
    }

    pub fn component_names(&self) -> Vec<&str> {
        match self {
            HierarchicalData::Plain(map) => map.keys().map(String::as_str).collect(),
            HierarchicalData::Batched(map) => map.keys().map(String::as_str).collect(),
        }
    }

    /// 展开所有叶子（路径 + 记录切片）
    pub fn leaves(&self) -> Vec<(LeafPath<'_>, &[WorkflowRecord])> {
        let mut out = Vec::new();
        match self {
            HierarchicalData::Plain(components) => {
                for (component, grades) in components {
                    collect_grade_leaves(component, None, grades, &mut out);
                }
            }
            HierarchicalData::Batched(components) => {
                for (component, batches) in components {
                    for (batch, grades) in batches {
                        collect_grade_leaves(component, Some(batch.as_str()), grades, &mut out);
                    }
                }
            }
        }
        out
    }

    /// 所有叶子的记录总数
    pub fn record_count(&self) -> usize {
        self.leaves().iter().map(|(_, records)| records.len()).sum()
    }
}

fn collect_grade_leaves<'a>(
    component: &'a str,
    batch: Option<&'a str>,
    grades: &'a GradeGroups,
    out: &mut Vec<(LeafPath<'a>, &'a [WorkflowRecord])>,
) {
    for (grade, units) in grades {
        for (unit, weeks) in units {
            for (week, records) in weeks {
                out.push((
                    LeafPath {
                        component,
                        batch,
                        grade,
                        unit,
                        week,
                    },
                    records.as_slice(),
                ));
            }
        }
    }
}
