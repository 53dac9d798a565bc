// ==========================================
// 项目执行仪表盘 - 导入层 Trait 定义
// ==========================================
// 职责: 定义数据来源接口（本地文件 / 远程表格），解耦调用方与具体实现
// ==========================================

use crate::importer::error::ImportResult;
use crate::importer::remote::{FetchResult, SheetCredentials};
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;

// ==========================================
// FileParser - 文件解析器
// ==========================================
// 输出与上传 JSON 相同形状的原始值，交由 RecordNormalizer 处理
pub trait FileParser {
    fn parse_to_raw_value(&self, file_path: &Path) -> ImportResult<Value>;
}

// ==========================================
// SheetFetcher - 远程表格拉取
// ==========================================
#[async_trait]
pub trait SheetFetcher: Send + Sync {
    /// 拉取工作表行数据
    ///
    /// # 返回
    /// - Ok(Value): 记录数组（可能为空）
    /// - Err(FetchError): 凭证无效 / 网络失败 / 上游错误
    async fn fetch(&self, credentials: &SheetCredentials) -> FetchResult<Value>;
}
