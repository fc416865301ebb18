// ==========================================
// 仓储管理系统 - 领域模型层
// ==========================================
// 职责: 定义导入字段、工作表、列映射、提交包等值对象
// 红线: 不含文件解码逻辑，不含映射算法
// ==========================================

pub mod field;
pub mod mapping;
pub mod sheet;
pub mod submission;
pub mod types;

// 重导出核心类型
pub use field::{FieldSpec, ImportTypeSchema};
pub use mapping::{ColumnMapping, ColumnTarget, MappingWarning, UNASSIGNED};
pub use sheet::{ParsedSheet, WorkbookState};
pub use submission::{ImportOutcome, RowError, SubmissionBundle, SubmissionMetadata, UploadedFile};
pub use types::{ImportType, UploadStep};
