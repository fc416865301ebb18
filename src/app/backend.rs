// ==========================================
// 仓储管理系统 - 外部导入端点接口
// ==========================================
// 职责: 接收提交包并返回结果摘要；传输方式（HTTP multipart 等）由实现者决定
// ==========================================

use crate::domain::submission::{ImportOutcome, SubmissionBundle};
use crate::importer::error::ImportResult;
use async_trait::async_trait;

// ==========================================
// ImportBackend Trait
// ==========================================
// 错误约定:
// - BackendUnavailable: 暂时不可用，会话回到 FileSelected 并保留文件与映射
// - BackendRejected: 内容被拒绝，会话重置为 Idle
#[async_trait]
pub trait ImportBackend: Send + Sync {
    /// 提交导入；结果摘要原样返回，不做解释
    async fn submit(&self, bundle: &SubmissionBundle) -> ImportResult<ImportOutcome>;
}
