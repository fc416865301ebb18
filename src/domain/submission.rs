// ==========================================
// 仓储管理系统 - 上传文件与提交包
// ==========================================
// 职责: UploadedFile（用户选择的原始文件）、SubmissionBundle（交给外部导入端点的内容）、
//       ImportOutcome（外部端点返回的结果摘要，原样透传）
// ==========================================

use crate::domain::types::ImportType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Cursor;
use std::sync::Arc;
use uuid::Uuid;

// ==========================================
// UploadedFile - 原始上传文件
// ==========================================
// 内容以 Arc<[u8]> 共享：切换工作表重新解码、提交时都不复制字节
#[derive(Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content: Arc<[u8]>,
    pub uploaded_at: DateTime<Utc>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content: Arc::from(content.into()),
            uploaded_at: Utc::now(),
        }
    }

    /// 小写扩展名（无扩展名时为空字符串）
    pub fn extension(&self) -> String {
        std::path::Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase()
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.content
    }

    /// 可 Seek 的读取器（共享底层字节）
    pub fn reader(&self) -> Cursor<Arc<[u8]>> {
        Cursor::new(Arc::clone(&self.content))
    }
}

impl fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedFile")
            .field("file_name", &self.file_name)
            .field("size", &self.content.len())
            .field("uploaded_at", &self.uploaded_at)
            .finish()
    }
}

// ==========================================
// SubmissionBundle - 提交包
// ==========================================
// 只保证内容合法（必填字段均映射到真实表头）；传输由外部协作方负责
#[derive(Debug, Clone)]
pub struct SubmissionBundle {
    pub session_id: Uuid,
    pub import_type: ImportType,
    pub sheet_name: String,
    pub mapping: BTreeMap<String, String>,
    pub file: UploadedFile,
}

impl SubmissionBundle {
    /// 映射的 JSON 文本（key → 表头），对应 multipart 的 mapping 字段
    pub fn mapping_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.mapping)
    }

    /// 不含文件字节的元数据，用于日志与调试
    pub fn metadata(&self) -> SubmissionMetadata {
        SubmissionMetadata {
            session_id: self.session_id,
            import_type: self.import_type,
            sheet_name: self.sheet_name.clone(),
            mapping: self.mapping.clone(),
            file_name: self.file.file_name.clone(),
            file_size: self.file.size(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionMetadata {
    pub session_id: Uuid,
    pub import_type: ImportType,
    pub sheet_name: String,
    pub mapping: BTreeMap<String, String>,
    pub file_name: String,
    pub file_size: usize,
}

// ==========================================
// ImportOutcome - 外部导入端点的结果摘要
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub processed: u64,
    pub success: u64,
    #[serde(default)]
    pub errors: Vec<RowError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    pub row: u64,
    pub error: String,
}

impl ImportOutcome {
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    pub fn failed(&self) -> u64 {
        self.processed.saturating_sub(self.success)
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.processed == self.success
    }
}
