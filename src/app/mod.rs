// ==========================================
// 项目执行仪表盘 - 应用层
// ==========================================
// 职责: 状态容器，串联 导入 → 层级 → 筛选
// ==========================================

pub mod state;

// 重导出
pub use state::{DashboardState, DatasetSnapshot};
