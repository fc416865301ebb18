// ==========================================
// 仓储管理系统 - 工作簿加载器
// ==========================================
// 职责: 上传文件 → WorkbookState + 首个工作表的 ParsedSheet
// 原子性: 只返回新值，由调用方在成功后一次性提交
// ==========================================

use crate::domain::sheet::{ParsedSheet, WorkbookState};
use crate::domain::submission::UploadedFile;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::import_trait::FileParser;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct WorkbookLoader {
    parser: Arc<dyn FileParser>,
    preview_limit: usize,
    max_file_bytes: usize,
}

impl WorkbookLoader {
    pub fn new(parser: Arc<dyn FileParser>, preview_limit: usize, max_file_bytes: usize) -> Self {
        Self {
            parser,
            preview_limit,
            max_file_bytes,
        }
    }

    /// 使用通用解析器（按扩展名分派）
    pub fn with_extensions(
        allowed_extensions: Vec<String>,
        preview_limit: usize,
        max_file_bytes: usize,
    ) -> Self {
        Self::new(
            Arc::new(UniversalFileParser::new(allowed_extensions)),
            preview_limit,
            max_file_bytes,
        )
    }

    /// 解码上传文件并选中第一个工作表
    ///
    /// # 错误
    /// - MalformedFile: 空文件 / 无法解码 / 无工作表 / 首个工作表无数据
    /// - UnsupportedFormat: 扩展名不在允许列表
    /// - FileTooLarge: 超过大小上限
    pub fn load(&self, file: UploadedFile) -> ImportResult<(WorkbookState, ParsedSheet)> {
        let started = Instant::now();

        if file.is_empty() {
            return Err(ImportError::MalformedFile(format!(
                "{}: 文件为空",
                file.file_name
            )));
        }
        if file.size() > self.max_file_bytes {
            return Err(ImportError::FileTooLarge {
                size: file.size(),
                limit: self.max_file_bytes,
            });
        }

        let sheet_names = self.parser.sheet_names(&file)?;
        let first = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::MalformedFile("工作簿中没有工作表".to_string()))?;

        let sheet = self.parser.read_sheet(&file, &first, self.preview_limit)?;

        tracing::info!(
            file_name = %file.file_name,
            size = file.size(),
            sheets = sheet_names.len(),
            sheet = %first,
            columns = sheet.headers.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "工作簿加载完成"
        );

        let state = WorkbookState {
            file,
            sheet_names,
            selected_sheet: first,
        };
        Ok((state, sheet))
    }

    /// 重新解码已保留的文件字节，读取另一个工作表
    pub fn load_sheet(&self, state: &WorkbookState, sheet_name: &str) -> ImportResult<ParsedSheet> {
        if !state.has_sheet(sheet_name) {
            return Err(ImportError::SheetNotFound(sheet_name.to_string()));
        }
        let sheet = self
            .parser
            .read_sheet(&state.file, sheet_name, self.preview_limit)?;

        tracing::debug!(
            sheet = sheet_name,
            columns = sheet.headers.len(),
            preview_rows = sheet.preview_rows.len(),
            "工作表已切换"
        );
        Ok(sheet)
    }
}
