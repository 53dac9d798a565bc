// ==========================================
// 项目执行仪表盘 - 配置层
// ==========================================
// 职责: 阈值、标签、分页、语言与远程端点配置
// 存储: 内存（默认值 + JSON/环境变量覆写）
// ==========================================

pub mod config_manager;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigError, ConfigManager, ENV_PREFIX};
