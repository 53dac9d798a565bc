// ==========================================
// 项目执行仪表盘 - 资源分配引擎
// ==========================================
// 职责: 按负责人汇总工期（多人任务平摊）、共享任务集合、活动类型分布
// 规则:
//   - "Assigned to:" 按逗号拆分，trim，丢弃空名
//   - 工期 = 计划结束 - 计划开始（天），任一日期无法解析 → 0，但仍计任务数
//   - 负责人 ≥ 2 的记录为共享任务，以 Component-Activity-Week 为键只记一次
// ==========================================

use crate::domain::metrics::{ActivityCount, AllocationReport, AssigneeAllocation, SharedTaskKey};
use crate::domain::record::WorkflowRecord;
use crate::engine::dates::parse_date;
use std::collections::{BTreeSet, HashMap};

/// 活动为空时的分组标签
const UNKNOWN_ACTIVITY: &str = "Unknown";

/// 记录的计划工期（天），任一日期无法解析时为 None
pub fn scheduled_duration_days(record: &WorkflowRecord) -> Option<i64> {
    let start = parse_date(&record.scheduled_start)?;
    let end = parse_date(&record.scheduled_end)?;
    Some((end - start).num_days())
}

pub struct AllocationEngine;

impl Default for AllocationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AllocationEngine {
    pub fn new() -> Self {
        Self
    }

    /// 按负责人汇总分配天数（按 allocated_days 降序，同值保持首次出现顺序）
    pub fn allocate(&self, records: &[WorkflowRecord]) -> AllocationReport {
        let mut assignees: Vec<AssigneeAllocation> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut shared_tasks = BTreeSet::new();

        for record in records {
            let names = record.assignees();
            if names.is_empty() {
                continue;
            }

            let shared = names.len() > 1;
            if shared {
                shared_tasks.insert(SharedTaskKey {
                    component: record.component.clone(),
                    activity: record.activity.clone(),
                    week: record.week.clone(),
                });
            }

            let share = scheduled_duration_days(record)
                .map(|days| days as f64 / names.len() as f64)
                .unwrap_or(0.0);

            for name in names {
                let slot = *index.entry(name.to_string()).or_insert_with(|| {
                    assignees.push(AssigneeAllocation {
                        assignee: name.to_string(),
                        allocated_days: 0.0,
                        task_count: 0,
                        shared_task_count: 0,
                        activities: Vec::new(),
                    });
                    assignees.len() - 1
                });

                let entry = &mut assignees[slot];
                entry.allocated_days += share;
                entry.task_count += 1;
                if shared {
                    entry.shared_task_count += 1;
                }
                if !record.activity.is_empty() && !entry.activities.contains(&record.activity) {
                    entry.activities.push(record.activity.clone());
                }
            }
        }

        assignees.sort_by(|a, b| b.allocated_days.total_cmp(&a.allocated_days));

        AllocationReport {
            assignees,
            shared_tasks,
        }
    }

    /// 活动类型分布（按数量降序，同值保持首次出现顺序）
    pub fn activity_distribution(&self, records: &[WorkflowRecord]) -> Vec<ActivityCount> {
        let mut counts: Vec<ActivityCount> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for record in records {
            let name = if record.activity.is_empty() {
                UNKNOWN_ACTIVITY
            } else {
                record.activity.as_str()
            };
            match index.get(name) {
                Some(&slot) => counts[slot].value += 1,
                None => {
                    index.insert(name, counts.len());
                    counts.push(ActivityCount {
                        name: name.to_string(),
                        value: 1,
                    });
                }
            }
        }

        counts.sort_by(|a, b| b.value.cmp(&a.value));
        counts
    }
}
