// ==========================================
// 项目执行仪表盘 - 远程表格数据源
// ==========================================
// 两种拉取方式:
//   1. EdgeFunctionFetcher: 经托管代理函数转发（凭证不直接暴露给表格 API）
//   2. SmartsheetApiFetcher: 直连表格 API，本地完成列 → 字段映射
// 红线: 返回值为原始记录数组，字段映射仍由 RecordNormalizer 完成
// ==========================================

use crate::config::ConfigManager;
use crate::importer::traits::SheetFetcher;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info, warn};

/// 代理函数路径
const EDGE_FUNCTION_PATH: &str = "/functions/v1/executive-dashboard-smartsheet";

/// 表格 API 地址
const SMARTSHEET_API_URL: &str = "https://api.smartsheet.com/2.0/sheets";

// ==========================================
// 凭证
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetCredentials {
    pub sheet_id: String,
    pub token: String,
}

impl SheetCredentials {
    pub fn new(sheet_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            sheet_id: sheet_id.into(),
            token: token.into(),
        }
    }

    /// 本地预校验: 两者非空，Sheet ID 为纯数字
    pub fn validate(&self) -> FetchResult<()> {
        let sheet_id = self.sheet_id.trim();
        if sheet_id.is_empty() {
            return Err(FetchError::InvalidCredentials("Sheet ID is required".to_string()));
        }
        if self.token.trim().is_empty() {
            return Err(FetchError::InvalidCredentials(
                "Smartsheet API token is required".to_string(),
            ));
        }
        if !sheet_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FetchError::InvalidCredentials(
                "Invalid sheet ID format. Sheet ID should be a number".to_string(),
            ));
        }
        Ok(())
    }
}

// ==========================================
// 错误类型
// ==========================================
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("远程数据源未配置: {0}")]
    ConfigMissing(String),

    #[error("凭证无效: {0}")]
    InvalidCredentials(String),

    #[error("鉴权失败 (HTTP {status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("工作表不存在: {0}")]
    NotFound(String),

    #[error("请求过于频繁: {0}")]
    RateLimited(String),

    #[error("上游服务不可用 (HTTP {status}): {message}")]
    UpstreamUnavailable { status: u16, message: String },

    #[error("远程请求失败 (HTTP {status}): {message}")]
    Generic { status: u16, message: String },

    #[error("远程数据源未返回任何记录")]
    EmptyResponse,

    #[error("网络请求失败: {0}")]
    Transport(String),

    #[error("响应解析失败: {0}")]
    InvalidResponse(String),
}

impl FetchError {
    /// 可直接展示给用户的上游说明（无则由调用方使用通用提示）
    pub fn upstream_message(&self) -> Option<&str> {
        match self {
            FetchError::InvalidCredentials(msg)
            | FetchError::NotFound(msg)
            | FetchError::RateLimited(msg)
            | FetchError::ConfigMissing(msg) => Some(msg),
            FetchError::Unauthorized { message, .. }
            | FetchError::UpstreamUnavailable { message, .. }
            | FetchError::Generic { message, .. } => Some(message),
            FetchError::Transport(_) | FetchError::InvalidResponse(_) | FetchError::EmptyResponse => {
                None
            }
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err.to_string())
    }
}

pub type FetchResult<T> = Result<T, FetchError>;

/// HTTP 状态码 → 错误分类
pub fn classify_status(status: u16, message: String) -> FetchError {
    match status {
        400 => FetchError::InvalidCredentials(message),
        401 | 403 => FetchError::Unauthorized { status, message },
        404 => FetchError::NotFound(message),
        429 => FetchError::RateLimited(message),
        500..=599 => FetchError::UpstreamUnavailable { status, message },
        _ => FetchError::Generic { status, message },
    }
}

/// 从错误响应体中提取说明（优先 message，其次 error）
pub fn extract_error_message(body: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .filter(|msg| !msg.trim().is_empty())
        .map(str::to_string)
}

/// 响应体必须是非空数组
fn ensure_rows(body: Value) -> FetchResult<Value> {
    match &body {
        Value::Array(rows) if !rows.is_empty() => Ok(body),
        _ => Err(FetchError::EmptyResponse),
    }
}

async fn error_from_response(resp: reqwest::Response) -> FetchError {
    let status = resp.status();
    let body: Value = resp.json().await.unwrap_or(Value::Null);
    let message = extract_error_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Unknown error occurred")
            .to_string()
    });
    warn!(status = status.as_u16(), %message, "远程数据源返回错误");
    classify_status(status.as_u16(), message)
}

// ==========================================
// 表格 API 响应 → 记录数组
// ==========================================

/// 将 `{ columns: [{id,title}], rows: [{cells: [{columnId,value}]}] }` 转为记录数组
///
/// 结构不完整时返回空数组
pub fn sheet_to_rows(sheet: &Value) -> Value {
    let (Some(columns), Some(rows)) = (
        sheet.get("columns").and_then(Value::as_array),
        sheet.get("rows").and_then(Value::as_array),
    ) else {
        debug!("表格响应缺少 columns/rows");
        return Value::Array(Vec::new());
    };

    let titles: HashMap<String, &str> = columns
        .iter()
        .filter_map(|col| {
            let id = col.get("id")?;
            let title = col.get("title")?.as_str()?;
            Some((id.to_string(), title))
        })
        .collect();

    let records = rows
        .iter()
        .map(|row| {
            let mut record = Map::new();
            let cells = row.get("cells").and_then(Value::as_array);
            for cell in cells.into_iter().flatten() {
                let Some(title) = cell.get("columnId").and_then(|id| titles.get(&id.to_string()))
                else {
                    continue;
                };
                let value = match cell.get("value") {
                    None | Some(Value::Null) => Value::String(String::new()),
                    Some(v) => v.clone(),
                };
                record.insert((*title).to_string(), value);
            }
            Value::Object(record)
        })
        .collect();

    Value::Array(records)
}

// ==========================================
// EdgeFunctionFetcher - 代理函数拉取
// ==========================================
pub struct EdgeFunctionFetcher {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl EdgeFunctionFetcher {
    pub fn new(base_url: &str, anon_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }

    /// 从配置构建（缺少 URL 或匿名密钥时报 ConfigMissing）
    pub fn from_config(config: &ConfigManager) -> FetchResult<Self> {
        let (Some(url), Some(key)) = (config.edge_function_url(), config.edge_function_anon_key())
        else {
            return Err(FetchError::ConfigMissing(
                "Supabase configuration is missing. Please check your environment variables."
                    .to_string(),
            ));
        };
        Ok(Self::new(&url, &key))
    }

    pub fn function_url(&self) -> String {
        format!("{}{}", self.base_url, EDGE_FUNCTION_PATH)
    }
}

#[async_trait]
impl SheetFetcher for EdgeFunctionFetcher {
    async fn fetch(&self, credentials: &SheetCredentials) -> FetchResult<Value> {
        credentials.validate()?;

        let url = self.function_url();
        info!(sheet_id = %credentials.sheet_id, "经代理函数拉取表格数据");

        let resp = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .bearer_auth(&self.anon_key)
            .json(&json!({
                "sheetId": credentials.sheet_id,
                "token": credentials.token,
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| FetchError::InvalidResponse(e.to_string()))?;
        ensure_rows(body)
    }
}

// ==========================================
// SmartsheetApiFetcher - 直连表格 API
// ==========================================
pub struct SmartsheetApiFetcher {
    client: reqwest::Client,
    api_url: String,
}

impl Default for SmartsheetApiFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl SmartsheetApiFetcher {
    pub fn new() -> Self {
        Self::with_api_url(SMARTSHEET_API_URL)
    }

    pub fn with_api_url(api_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SheetFetcher for SmartsheetApiFetcher {
    async fn fetch(&self, credentials: &SheetCredentials) -> FetchResult<Value> {
        credentials.validate()?;

        let url = format!("{}/{}", self.api_url, credentials.sheet_id.trim());
        info!(sheet_id = %credentials.sheet_id, "直连表格 API 拉取数据");

        let resp = self
            .client
            .get(&url)
            .header("Content-Type", "application/json")
            .bearer_auth(&credentials.token)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        let sheet: Value = resp
            .json()
            .await
            .map_err(|e| FetchError::InvalidResponse(e.to_string()))?;
        ensure_rows(sheet_to_rows(&sheet))
    }
}
