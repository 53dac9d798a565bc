// ==========================================
// 项目执行仪表盘 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，把导入/拉取错误转换为面向视图的错误
// 红线: 单条记录的数据质量问题不会出现在这里（引擎内部吸收）
// ==========================================

use crate::importer::{FetchError, ImportError};
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入与状态错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("尚未加载数据")]
    NoDataLoaded,

    /// 整批加载失败（消息已本地化，可直接展示）
    #[error("{0}")]
    LoadFailed(String),

    // ==========================================
    // 数据来源错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),

    #[error("远程拉取失败: {0}")]
    FetchError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::InternalError(msg) => ApiError::InternalError(msg),
            ImportError::Other(err) => ApiError::Other(err),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

// ==========================================
// 从 FetchError 转换
// ==========================================
impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::InvalidCredentials(msg) => ApiError::InvalidInput(msg),
            other => ApiError::FetchError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_error_conversion() {
        let api_err: ApiError = ImportError::UnsupportedFormat("txt".to_string()).into();
        match api_err {
            ApiError::ImportError(msg) => assert!(msg.contains("txt")),
            _ => panic!("Expected ImportError"),
        }

        let api_err: ApiError = ImportError::InternalError("boom".to_string()).into();
        assert!(matches!(api_err, ApiError::InternalError(msg) if msg == "boom"));
    }

    #[test]
    fn test_fetch_error_conversion() {
        let api_err: ApiError =
            FetchError::InvalidCredentials("Sheet ID is required".to_string()).into();
        assert!(matches!(api_err, ApiError::InvalidInput(_)));

        let api_err: ApiError = FetchError::RateLimited("slow down".to_string()).into();
        match api_err {
            ApiError::FetchError(msg) => assert!(msg.contains("slow down")),
            _ => panic!("Expected FetchError"),
        }
    }

    #[test]
    fn test_load_failed_displays_message_verbatim() {
        let err = ApiError::LoadFailed("No data returned from Smartsheet".to_string());
        assert_eq!(err.to_string(), "No data returned from Smartsheet");
    }
}
