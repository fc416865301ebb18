// ==========================================
// 仓储管理系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件无法解析为表格: {0}")]
    MalformedFile(String),

    #[error("文件格式不支持: {0}（仅支持 {1}）")]
    UnsupportedFormat(String, String),

    #[error("文件过大: {size} 字节（上限 {limit} 字节）")]
    FileTooLarge { size: usize, limit: usize },

    #[error("工作表不存在: {0}")]
    SheetNotFound(String),

    // ===== 列映射错误 =====
    #[error("缺少必填列映射: {}", .labels.join(", "))]
    MissingRequiredColumns { labels: Vec<String> },

    #[error("未知字段: {0}")]
    UnknownField(String),

    #[error("当前工作表不存在该列: {0}")]
    UnknownHeader(String),

    #[error("未知导入类型: {0}")]
    UnknownImportType(String),

    // ===== 流程状态错误 =====
    #[error("无效的状态转换: from={from} to={to}")]
    InvalidStateTransition { from: String, to: String },

    // ===== 外部导入端点错误 =====
    #[error("导入服务拒绝了该文件: {0}")]
    BackendRejected(String),

    #[error("导入服务暂不可用: {0}")]
    BackendUnavailable(String),

    // ===== 配置错误 =====
    #[error("配置读取失败 (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl ImportError {
    /// 文件级拒绝（格式损坏/不支持/超限）：会话停留在 FileSelected，需重新选择文件
    pub fn is_file_rejection(&self) -> bool {
        matches!(
            self,
            ImportError::MalformedFile(_)
                | ImportError::UnsupportedFormat(..)
                | ImportError::FileTooLarge { .. }
        )
    }

    /// 缺失的必填字段标签（仅 MissingRequiredColumns）
    pub fn missing_labels(&self) -> Option<&[String]> {
        match self {
            ImportError::MissingRequiredColumns { labels } => Some(labels),
            _ => None,
        }
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::MalformedFile(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::MalformedFile(format!("CSV 解析失败: {}", err))
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::MalformedFile(format!("Excel 解析失败: {}", err))
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_lists_labels() {
        let err = ImportError::MissingRequiredColumns {
            labels: vec!["RFC".to_string(), "Teléfono".to_string()],
        };
        assert_eq!(err.to_string(), "缺少必填列映射: RFC, Teléfono");
        assert_eq!(err.missing_labels().map(|l| l.len()), Some(2));
    }

    #[test]
    fn test_file_rejection_kinds() {
        assert!(ImportError::MalformedFile("x".into()).is_file_rejection());
        assert!(ImportError::FileTooLarge { size: 2, limit: 1 }.is_file_rejection());
        assert!(!ImportError::UnknownField("x".into()).is_file_rejection());
    }
}
