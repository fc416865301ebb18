// ==========================================
// 仓储管理系统 - API 层
// ==========================================
// 职责: 提供批量导入 API 接口，供界面桥接层调用
// ==========================================

pub mod error;
pub mod import_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use import_api::{
    ImportApi, ImportTypeInfo, MappingRow, MappingStatus, MappingTableResponse, UploadResponse,
    ValidationResponse,
};
