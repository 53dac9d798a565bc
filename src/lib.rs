// ==========================================
// 项目执行仪表盘 - 核心库
// ==========================================
// 职责: 工作流记录规范化、层级构建、筛选与指标计算
// 形态: 纯内存单会话；所有引擎为无副作用函数，"今天" 由调用方注入
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 记录与视图数据类型
pub mod domain;

// 导入层 - 文件 / 远程表格 → 工作流记录
pub mod importer;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 阈值与标签
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 视图接口
pub mod api;

// 应用层 - 状态容器
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    DashboardFilters, DashboardView, DataSource, DelaySeverity, FilterKey, GroupLevel,
    HealthStatus, HierarchicalData, MetricSummary, PercentField, ProgressStatus, RecordField,
    SortDirection, WorkflowRecord,
};

// 引擎
pub use engine::{
    AllocationEngine, FilterEngine, HierarchyBuilder, MetricsEngine, ReportEngine, RiskEngine,
    TimelineEngine,
};

// 导入
pub use importer::{RecordNormalizer, SheetCredentials, SheetFetcher, UniversalFileParser};

// 配置
pub use config::ConfigManager;

// API 与状态
pub use api::{ApiError, ApiResult, DashboardApi};
pub use app::{DashboardState, DatasetSnapshot};

// ==========================================
// 版本信息
// ==========================================
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用名称
pub const APP_NAME: &str = "项目执行仪表盘";
