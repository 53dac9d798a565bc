// ==========================================
// 项目执行仪表盘 - 指标输出结构
// ==========================================
// 职责: 指标引擎的输出对象（派生数据，不持久化）
// 红线: 每次渲染基于当前筛选集重新计算，不跨筛选变更缓存
// ==========================================

use crate::domain::record::WorkflowRecord;
use crate::domain::types::DelaySeverity;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ==========================================
// 状态统计
// ==========================================

/// 进度分布 + 风险数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub complete: usize,
    pub in_progress: usize,
    pub not_started: usize,
    pub at_risk: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCounts {
    pub green: usize,
    pub yellow: usize,
    pub red: usize,
    pub blank: usize,
}

/// 偏差分桶计数（negative = 提前, zero = 按期, positive = 落后）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarianceCounts {
    pub negative: usize,
    pub zero: usize,
    pub positive: usize,
}

/// 当前视图的综合指标
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowMetrics {
    pub total_items: usize,
    pub completed_items: usize,
    pub in_progress_items: usize,
    pub not_started_items: usize,
    pub health_status: HealthCounts,
    /// 平均完成度（四舍五入取整）
    pub average_completion: u32,
    /// 按原始 "Assigned to:" 字符串计数
    pub workflows_by_assignee: BTreeMap<String, usize>,
    /// 计划结束日分布（yyyy-MM-dd）
    pub due_date_distribution: BTreeMap<String, usize>,
    pub variance: VarianceCounts,
}

/// 总览摘要（百分比均为整数）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSummary {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub not_started: usize,
    pub at_risk: usize,
    pub completion: u32,
    pub on_track: u32,
    pub behind_schedule: u32,
    pub ahead_of_schedule: u32,
}

// ==========================================
// 资源分配
// ==========================================

/// 共享任务键（Component + Activity + Week）
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SharedTaskKey {
    pub component: String,
    pub activity: String,
    pub week: String,
}

impl fmt::Display for SharedTaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.component, self.activity, self.week)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssigneeAllocation {
    pub assignee: String,
    /// 按工期分摊的天数
    pub allocated_days: f64,
    /// 分配到该人的记录数
    pub task_count: usize,
    /// 其中多人共享的记录数
    pub shared_task_count: usize,
    /// 去重后的 Activity（首次出现顺序）
    pub activities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationReport {
    /// 按 allocated_days 降序
    pub assignees: Vec<AssigneeAllocation>,
    pub shared_tasks: BTreeSet<SharedTaskKey>,
}

impl AllocationReport {
    pub fn total_assignees(&self) -> usize {
        self.assignees.len()
    }

    pub fn get(&self, assignee: &str) -> Option<&AssigneeAllocation> {
        self.assignees.iter().find(|a| a.assignee == assignee)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityCount {
    pub name: String,
    pub value: usize,
}

// ==========================================
// 时间线
// ==========================================

/// 月度燃尽点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelinePoint {
    /// 显示标签，如 "Jan 2024"
    pub month: String,
    /// 排序键，如 "2024-01"
    pub month_key: String,
    pub planned: usize,
    pub actual: usize,
    pub remaining: usize,
}

/// 月度计划/实际完成数（非累计）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCompletion {
    pub name: String,
    pub month_key: String,
    pub planned: usize,
    pub actual: usize,
}

/// 里程碑（Unit + Reporting Status 聚合）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub unit: String,
    pub status: String,
    /// 组内最晚的计划结束日
    pub date: Option<NaiveDate>,
    pub completed: bool,
    pub total: usize,
    pub completed_count: usize,
}

/// 甘特条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItem {
    pub unit: String,
    pub status: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub completed: bool,
    pub title: String,
    pub description: String,
}

/// Component 级进度摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSchedule {
    pub component: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub baseline_start: Option<NaiveDate>,
    pub baseline_finish: Option<NaiveDate>,
    /// Variance 累加（天）
    pub variance: i64,
}

impl ComponentSchedule {
    /// 实际工期（天），起止任一缺失时为 None
    pub fn duration_days(&self) -> Option<i64> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some((end - start).num_days()),
            _ => None,
        }
    }
}

// ==========================================
// 延期与告警
// ==========================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayTally {
    pub flags: usize,
    pub alerts: usize,
}

/// 延期通知条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelayedItem {
    pub component: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,
    pub grade: String,
    pub unit: String,
    pub week: String,
    pub activity: String,
    pub delay_days: i64,
    pub severity: DelaySeverity,
}

// ==========================================
// 明细报表
// ==========================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPage {
    pub items: Vec<WorkflowRecord>,
    /// 从 1 开始
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// 筛选面板下拉选项（首次出现顺序）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub components: Vec<String>,
    pub batches: Vec<String>,
    pub grades: Vec<String>,
    pub units: Vec<String>,
    pub weeks: Vec<String>,
    pub activities: Vec<String>,
    pub assignees: Vec<String>,
    pub reporting_statuses: Vec<String>,
}
