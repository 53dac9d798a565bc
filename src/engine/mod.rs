// ==========================================
// 项目执行仪表盘 - 引擎层
// ==========================================
// 职责: 层级构建、筛选、指标、延期风险、资源分配、时间线、明细报表
// 红线: 引擎均为纯函数式（无内部状态、不读系统时钟），可被视图重复调用
// ==========================================

pub mod allocation;
pub mod dates;
pub mod filter;
pub mod hierarchy;
pub mod metrics;
pub mod progress;
pub mod report;
pub mod risk;
pub mod timeline;

// 重导出核心引擎
pub use allocation::AllocationEngine;
pub use dates::{calculate_variance, format_date, parse_date, parse_leading_int};
pub use filter::FilterEngine;
pub use hierarchy::HierarchyBuilder;
pub use metrics::MetricsEngine;
pub use progress::{progress_percentage, record_completion};
pub use report::ReportEngine;
pub use risk::RiskEngine;
pub use timeline::TimelineEngine;
