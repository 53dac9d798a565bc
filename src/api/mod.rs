// ==========================================
// 项目执行仪表盘 - API 层
// ==========================================
// 职责: 面向视图的只读接口与错误类型
// ==========================================

pub mod dashboard_api;
pub mod error;

// 重导出核心类型
pub use dashboard_api::{today, DashboardApi};
pub use error::{ApiError, ApiResult};
