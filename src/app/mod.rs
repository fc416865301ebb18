// ==========================================
// 仓储管理系统 - 应用层
// ==========================================
// 职责: 上传会话状态机，连接导入层与外部导入端点
// ==========================================

pub mod backend;
pub mod upload_session;

// 重导出
pub use backend::ImportBackend;
pub use upload_session::UploadSession;
