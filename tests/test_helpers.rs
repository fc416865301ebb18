// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的工作簿夹具、Mock 配置与 Mock 导入端点
// ==========================================

#![allow(dead_code)]

use async_trait::async_trait;
use rust_xlsxwriter::Workbook;
use std::sync::Mutex;
use warehouse_import::config::ImportConfigReader;
use warehouse_import::domain::{ImportOutcome, RowError, SubmissionBundle, SubmissionMetadata};
use warehouse_import::importer::{ImportError, ImportResult};
use warehouse_import::UploadedFile;

// ==========================================
// 工作簿夹具
// ==========================================

/// 工作表定义: (名称, 行)；可解析为数字的单元格写为数值
pub type SheetDef<'a> = (&'a str, &'a [&'a [&'a str]]);

/// 在内存中生成 xlsx 字节
pub fn build_xlsx(sheets: &[SheetDef]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).expect("工作表名无效");
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                match value.parse::<f64>() {
                    Ok(number) => worksheet.write_number(r as u32, c as u16, number),
                    Err(_) => worksheet.write_string(r as u32, c as u16, *value),
                }
                .expect("写入单元格失败");
            }
        }
    }
    workbook.save_to_buffer().expect("生成 xlsx 失败")
}

pub fn xlsx_file(name: &str, sheets: &[SheetDef]) -> UploadedFile {
    UploadedFile::new(name, build_xlsx(sheets))
}

pub fn csv_file(name: &str, content: &str) -> UploadedFile {
    UploadedFile::new(name, content.as_bytes().to_vec())
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

// ==========================================
// Mock 配置
// ==========================================
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub preview_row_limit: usize,
    pub max_file_bytes: usize,
    pub allowed_extensions: Vec<String>,
    pub auto_map_enabled: bool,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            preview_row_limit: 5,
            max_file_bytes: 10 * 1024 * 1024,
            allowed_extensions: strings(&["xlsx", "xls", "csv"]),
            auto_map_enabled: true,
        }
    }
}

impl MockConfig {
    pub fn with_max_file_bytes(max_file_bytes: usize) -> Self {
        Self {
            max_file_bytes,
            ..Self::default()
        }
    }
}

impl ImportConfigReader for MockConfig {
    fn get_preview_row_limit(&self) -> ImportResult<usize> {
        Ok(self.preview_row_limit)
    }

    fn get_max_file_bytes(&self) -> ImportResult<usize> {
        Ok(self.max_file_bytes)
    }

    fn get_allowed_extensions(&self) -> ImportResult<Vec<String>> {
        Ok(self.allowed_extensions.clone())
    }

    fn get_auto_map_enabled(&self) -> ImportResult<bool> {
        Ok(self.auto_map_enabled)
    }
}

// ==========================================
// Mock 导入端点
// ==========================================
#[derive(Debug, Clone)]
pub enum BackendBehavior {
    Accept(ImportOutcome),
    Unavailable,
    Reject,
}

/// 记录收到的提交包并按预设行为返回
pub struct MockBackend {
    behavior: BackendBehavior,
    pub received: Mutex<Vec<SubmissionMetadata>>,
    pub mapping_json: Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn new(behavior: BackendBehavior) -> Self {
        Self {
            behavior,
            received: Mutex::new(Vec::new()),
            mapping_json: Mutex::new(Vec::new()),
        }
    }

    pub fn accepting(processed: u64, failed_rows: &[u64]) -> Self {
        let errors = failed_rows
            .iter()
            .map(|row| RowError {
                row: *row,
                error: "SKU inexistente".to_string(),
            })
            .collect();
        Self::new(BackendBehavior::Accept(ImportOutcome {
            processed,
            success: processed - failed_rows.len() as u64,
            errors,
        }))
    }

    pub fn received_count(&self) -> usize {
        self.received.lock().unwrap().len()
    }

    pub fn last_received(&self) -> Option<SubmissionMetadata> {
        self.received.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl warehouse_import::ImportBackend for MockBackend {
    async fn submit(&self, bundle: &SubmissionBundle) -> ImportResult<ImportOutcome> {
        self.received.lock().unwrap().push(bundle.metadata());
        self.mapping_json
            .lock()
            .unwrap()
            .push(bundle.mapping_json().unwrap());

        match &self.behavior {
            BackendBehavior::Accept(outcome) => Ok(outcome.clone()),
            BackendBehavior::Unavailable => {
                Err(ImportError::BackendUnavailable("503 Service Unavailable".to_string()))
            }
            BackendBehavior::Reject => {
                Err(ImportError::BackendRejected("400 archivo inválido".to_string()))
            }
        }
    }
}
