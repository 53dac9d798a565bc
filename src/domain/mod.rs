// ==========================================
// 项目执行仪表盘 - 领域模型层
// ==========================================
// 职责: 定义工作流记录、层级结构、筛选条件、指标输出
// 红线: 不含解析逻辑,不含引擎逻辑
// ==========================================

pub mod filters;
pub mod hierarchy;
pub mod metrics;
pub mod record;
pub mod types;

// 重导出核心类型
pub use filters::{DashboardFilters, FilterKey};
pub use hierarchy::{BatchGroups, GradeGroups, HierarchicalData, LeafPath, UnitGroups, WeekGroups};
pub use metrics::{
    ActivityCount, AllocationReport, AssigneeAllocation, ComponentSchedule, DelayTally,
    DelayedItem, FilterOptions, HealthCounts, MetricSummary, Milestone, MonthlyCompletion,
    ReportPage, ScheduleItem, SharedTaskKey, StatusCounts, TimelinePoint, VarianceCounts,
    WorkflowMetrics,
};
pub use record::{PercentField, RecordField, WorkflowRecord};
pub use types::{
    DashboardView, DataSource, DelaySeverity, GroupLevel, HealthStatus, ProgressStatus,
    SortDirection, VarianceBucket,
};
