// ==========================================
// 仓储管理系统 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls/.xlsb/.ods) / CSV (.csv)
// 职责: 原始字节 → 工作表名 + 字符串化的行
// ==========================================

use crate::domain::submission::UploadedFile;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::import_trait::FileParser;
use calamine::{open_workbook_auto_from_rs, Data, Reader, Sheets};
use csv::ReaderBuilder;
use std::io::Cursor;
use std::sync::Arc;

/// CSV 只有一个工作表，沿用表格软件的默认名称
pub const CSV_SHEET_NAME: &str = "Sheet1";

/// 默认允许的扩展名
pub const DEFAULT_EXTENSIONS: [&str; 3] = ["xlsx", "xls", "csv"];

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    /// 拒绝二进制内容（例如改了扩展名的图片/压缩包）
    fn ensure_text(file: &UploadedFile) -> ImportResult<()> {
        if file.bytes().contains(&0) {
            return Err(ImportError::MalformedFile(format!(
                "{} 不是文本格式的 CSV",
                file.file_name
            )));
        }
        Ok(())
    }
}

/// 从首行推断分隔符（逗号/分号/制表符，平局取逗号）
pub fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let first_line = bytes.split(|b| *b == b'\n').next().unwrap_or(&[]);
    let count = |d: u8| first_line.iter().filter(|b| **b == d).count();

    let mut best = (b',', count(b','));
    for candidate in [b';', b'\t'] {
        let n = count(candidate);
        if n > best.1 {
            best = (candidate, n);
        }
    }
    best.0
}

impl FileParser for CsvParser {
    fn sheet_names(&self, file: &UploadedFile) -> ImportResult<Vec<String>> {
        Self::ensure_text(file)?;
        Ok(vec![CSV_SHEET_NAME.to_string()])
    }

    fn read_rows(
        &self,
        file: &UploadedFile,
        sheet_name: &str,
        max_rows: usize,
    ) -> ImportResult<Vec<Vec<String>>> {
        if sheet_name != CSV_SHEET_NAME {
            return Err(ImportError::SheetNotFound(sheet_name.to_string()));
        }
        Self::ensure_text(file)?;

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .delimiter(sniff_delimiter(file.bytes()))
            .from_reader(file.reader());

        let mut rows = Vec::new();
        for result in reader.byte_records() {
            if rows.len() >= max_rows {
                break;
            }
            let record = result?;
            let mut row: Vec<String> = record
                .iter()
                .map(|field| String::from_utf8_lossy(field).trim().to_string())
                .collect();

            // 跳过完全空白的行
            if row.iter().all(|v| v.is_empty()) {
                continue;
            }

            // 首行去掉 UTF-8 BOM
            if rows.is_empty() {
                if let Some(first) = row.first_mut() {
                    *first = first.trim_start_matches('\u{feff}').trim().to_string();
                }
            }

            rows.push(row);
        }

        Ok(rows)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    /// 按内容自动识别 xlsx/xls/xlsb/ods
    fn open(file: &UploadedFile) -> ImportResult<Sheets<Cursor<Arc<[u8]>>>> {
        open_workbook_auto_from_rs(file.reader()).map_err(|e| {
            ImportError::MalformedFile(format!("{} 无法识别为工作簿: {}", file.file_name, e))
        })
    }
}

/// 单元格 → 去空白字符串；整数值浮点按整数输出
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string().trim().to_string(),
    }
}

impl FileParser for ExcelParser {
    fn sheet_names(&self, file: &UploadedFile) -> ImportResult<Vec<String>> {
        let workbook = Self::open(file)?;
        let names: Vec<String> = workbook.sheet_names().iter().cloned().collect();
        if names.is_empty() {
            return Err(ImportError::MalformedFile("工作簿中没有工作表".to_string()));
        }
        Ok(names)
    }

    fn read_rows(
        &self,
        file: &UploadedFile,
        sheet_name: &str,
        max_rows: usize,
    ) -> ImportResult<Vec<Vec<String>>> {
        let mut workbook = Self::open(file)?;
        if !workbook.sheet_names().iter().any(|n| n == sheet_name) {
            return Err(ImportError::SheetNotFound(sheet_name.to_string()));
        }

        let range = workbook.worksheet_range(sheet_name)?;

        let rows = range
            .rows()
            .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>())
            .filter(|row| row.iter().any(|v| !v.is_empty())) // 跳过完全空白的行
            .take(max_rows)
            .collect();

        Ok(rows)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser {
    allowed_extensions: Vec<String>,
}

impl Default for UniversalFileParser {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect())
    }
}

impl UniversalFileParser {
    pub fn new(allowed_extensions: Vec<String>) -> Self {
        Self {
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|e| e.trim().trim_start_matches('.').to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    fn select(&self, file: &UploadedFile) -> ImportResult<&'static dyn FileParser> {
        let ext = file.extension();
        if !self.allowed_extensions.iter().any(|e| *e == ext) {
            let shown = if ext.is_empty() { file.file_name.clone() } else { ext };
            return Err(ImportError::UnsupportedFormat(
                shown,
                self.allowed_extensions.join("/"),
            ));
        }

        match ext.as_str() {
            "csv" => Ok(&CsvParser),
            _ => Ok(&ExcelParser),
        }
    }
}

impl FileParser for UniversalFileParser {
    fn sheet_names(&self, file: &UploadedFile) -> ImportResult<Vec<String>> {
        self.select(file)?.sheet_names(file)
    }

    fn read_rows(
        &self,
        file: &UploadedFile,
        sheet_name: &str,
        max_rows: usize,
    ) -> ImportResult<Vec<Vec<String>>> {
        self.select(file)?.read_rows(file, sheet_name, max_rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_file(content: &str) -> UploadedFile {
        UploadedFile::new("datos.csv", content.as_bytes().to_vec())
    }

    #[test]
    fn test_csv_parser_header_and_preview() {
        let file = csv_file("SKU,Nombre\nA1,Manzana\nA2,Pera\n");
        let sheet = CsvParser.read_sheet(&file, CSV_SHEET_NAME, 5).unwrap();

        assert_eq!(sheet.headers, vec!["SKU", "Nombre"]);
        assert_eq!(sheet.preview_rows.len(), 2);
        assert_eq!(sheet.preview_rows[1], vec!["A2", "Pera"]);
    }

    #[test]
    fn test_csv_parser_preview_limited_to_five() {
        let mut content = String::from("SKU\n");
        for i in 0..20 {
            content.push_str(&format!("A{}\n", i));
        }
        let sheet = CsvParser
            .read_sheet(&csv_file(&content), CSV_SHEET_NAME, 5)
            .unwrap();
        assert_eq!(sheet.preview_rows.len(), 5);
        assert_eq!(sheet.preview_rows[4], vec!["A4"]);
    }

    #[test]
    fn test_csv_parser_trims_and_strips_bom() {
        let file = csv_file("\u{feff} SKU , Nombre \n");
        let sheet = CsvParser.read_sheet(&file, CSV_SHEET_NAME, 5).unwrap();
        assert_eq!(sheet.headers, vec!["SKU", "Nombre"]);
        assert!(sheet.preview_rows.is_empty());
    }

    #[test]
    fn test_csv_parser_semicolon_delimiter() {
        let file = csv_file("SKU;Nombre;Categoría\nA1;Manzana;Fruta\n");
        let sheet = CsvParser.read_sheet(&file, CSV_SHEET_NAME, 5).unwrap();
        assert_eq!(sheet.headers.len(), 3);
        assert_eq!(sheet.headers[2], "Categoría");
    }

    #[test]
    fn test_csv_parser_skip_empty_rows() {
        let file = csv_file(",\nSKU,Nombre\n,\nA1,Manzana\n");
        let sheet = CsvParser.read_sheet(&file, CSV_SHEET_NAME, 5).unwrap();
        assert_eq!(sheet.headers, vec!["SKU", "Nombre"]);
        assert_eq!(sheet.preview_rows, vec![vec!["A1", "Manzana"]]);
    }

    #[test]
    fn test_csv_parser_empty_is_malformed() {
        let err = CsvParser
            .read_sheet(&csv_file(""), CSV_SHEET_NAME, 5)
            .unwrap_err();
        assert!(matches!(err, ImportError::MalformedFile(_)));
    }

    #[test]
    fn test_csv_parser_rejects_binary() {
        let file = UploadedFile::new("foto.csv", vec![0x89, b'P', b'N', b'G', 0, 0, 1]);
        assert!(matches!(
            CsvParser.sheet_names(&file),
            Err(ImportError::MalformedFile(_))
        ));
    }

    #[test]
    fn test_csv_parser_unknown_sheet() {
        let err = CsvParser
            .read_rows(&csv_file("SKU\n"), "Hoja2", 5)
            .unwrap_err();
        assert!(matches!(err, ImportError::SheetNotFound(_)));
    }

    #[test]
    fn test_excel_parser_garbage_is_malformed() {
        let file = UploadedFile::new("roto.xlsx", b"esto no es un libro".to_vec());
        assert!(matches!(
            ExcelParser.sheet_names(&file),
            Err(ImportError::MalformedFile(_))
        ));
    }

    #[test]
    fn test_universal_parser_rejects_extension() {
        let file = UploadedFile::new("notas.txt", b"SKU\n".to_vec());
        let err = UniversalFileParser::default().sheet_names(&file).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat(ref ext, _) if ext == "txt"));
    }

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Float(12.0)), "12");
        assert_eq!(cell_to_string(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_to_string(&Data::String("  Caja ".into())), "Caja");
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::Int(7)), "7");
    }

    #[test]
    fn test_sniff_delimiter() {
        assert_eq!(sniff_delimiter(b"a;b;c\n1,2;3"), b';');
        assert_eq!(sniff_delimiter(b"a\tb\n"), b'\t');
        assert_eq!(sniff_delimiter(b"solo\n"), b',');
    }
}
