// ==========================================
// 仓储管理系统 - 批量导入列映射引擎
// ==========================================
// 职责: 上传的表格文件 → 表头/预览 → 字段映射 → 校验 → 提交包
// 系统定位: 由界面驱动的上传会话核心（不负责行级转换与落库）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 值对象与类型
pub mod domain;

// 导入层 - 解析、字段发现、映射、校验
pub mod importer;

// 配置层 - 导入配置
pub mod config;

// 日志系统
pub mod logging;

// 应用层 - 上传会话状态机
pub mod app;

// API 层 - 界面接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    ColumnMapping, ColumnTarget, FieldSpec, ImportOutcome, ImportType, ImportTypeSchema,
    MappingWarning, ParsedSheet, SubmissionBundle, UploadStep, UploadedFile, WorkbookState,
};

// 导入层
pub use importer::{
    effective_schema, static_schema, AutoMapper, ImportError, ImportResult, MappingValidator,
    WorkbookLoader,
};

// 应用与 API
pub use api::{ApiError, ImportApi};
pub use app::{ImportBackend, UploadSession};
pub use config::{ConfigManager, ImportConfigReader};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "仓储管理系统 - 批量导入";
