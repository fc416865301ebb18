// ==========================================
// 仓储管理系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，把导入层错误转换为面向界面的错误消息与错误代码
// ==========================================

use crate::importer::error::ImportError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入与流程错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("无效的状态转换: from={from} to={to}")]
    InvalidStateTransition { from: String, to: String },

    // ==========================================
    // 文件与映射错误
    // ==========================================
    /// 文件被拒绝（损坏、格式不支持、超限），需重新选择文件
    #[error("文件导入失败: {0}")]
    FileRejected(String),

    /// 必填列未映射，可就地修改映射后重试
    #[error("缺少必填列映射: {}", .labels.join(", "))]
    MissingRequiredColumns { labels: Vec<String> },

    // ==========================================
    // 外部导入端点错误
    // ==========================================
    #[error("导入服务拒绝: {0}")]
    BackendRejected(String),

    #[error("导入服务暂不可用: {0}")]
    BackendUnavailable(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("内部错误: {0}")]
    InternalError(String),
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::MalformedFile(_)
            | ImportError::UnsupportedFormat(..)
            | ImportError::FileTooLarge { .. } => ApiError::FileRejected(err.to_string()),
            ImportError::SheetNotFound(name) => ApiError::NotFound(format!("工作表 {}", name)),
            ImportError::MissingRequiredColumns { labels } => {
                ApiError::MissingRequiredColumns { labels }
            }
            ImportError::UnknownField(key) => ApiError::InvalidInput(format!("未知字段: {}", key)),
            ImportError::UnknownHeader(header) => {
                ApiError::InvalidInput(format!("当前工作表不存在该列: {}", header))
            }
            ImportError::UnknownImportType(t) => {
                ApiError::InvalidInput(format!("未知导入类型: {}", t))
            }
            ImportError::InvalidStateTransition { from, to } => {
                ApiError::InvalidStateTransition { from, to }
            }
            ImportError::BackendRejected(msg) => ApiError::BackendRejected(msg),
            ImportError::BackendUnavailable(msg) => ApiError::BackendUnavailable(msg),
            ImportError::ConfigReadError { key, message } => {
                ApiError::ConfigError(format!("{}: {}", key, message))
            }
            ImportError::InternalError(msg) => ApiError::InternalError(msg),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

// ==========================================
// 错误响应（返回给前端）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误代码
    pub code: String,

    /// 错误消息
    pub message: String,

    /// 详细信息（可选）
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// 稳定的错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InvalidStateTransition { .. } => "INVALID_STATE_TRANSITION",
            ApiError::FileRejected(_) => "FILE_REJECTED",
            ApiError::MissingRequiredColumns { .. } => "MISSING_REQUIRED_COLUMNS",
            ApiError::BackendRejected(_) => "BACKEND_REJECTED",
            ApiError::BackendUnavailable(_) => "BACKEND_UNAVAILABLE",
            ApiError::ConfigError(_) => "CONFIG_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.code().to_string(),
            message: self.to_string(),
            details: match self {
                ApiError::MissingRequiredColumns { labels } => {
                    Some(serde_json::json!({ "missing_labels": labels }))
                }
                ApiError::InvalidStateTransition { from, to } => {
                    Some(serde_json::json!({ "from": from, "to": to }))
                }
                _ => None,
            },
        }
    }

    /// 序列化为 JSON 字符串（界面桥接层要求字符串错误）
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.to_response()).unwrap_or_else(|_| self.to_string())
    }
}
