// ==========================================
// 项目执行仪表盘 - 导入层
// ==========================================
// 职责: 原始输入（上传 JSON / 表格文件 / 远程表格）→ 规范化记录
// 流程: 文件或远程拉取 → serde_json::Value → RecordNormalizer → Vec<WorkflowRecord>
// ==========================================

pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod normalizer;
pub mod remote;
pub mod traits;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvParser, ExcelParser, JsonFileParser, UniversalFileParser};
pub use normalizer::RecordNormalizer;
pub use remote::{
    EdgeFunctionFetcher, FetchError, FetchResult, SheetCredentials, SmartsheetApiFetcher,
};

// 重导出 Trait 接口
pub use traits::{FileParser, SheetFetcher};
