// ==========================================
// 仓储管理系统 - 工作表领域模型
// ==========================================
// 职责: ParsedSheet（表头 + 预览行）与 WorkbookState（上传会话持有的工作簿）
// ==========================================

use crate::domain::field::normalize_header;
use crate::domain::submission::UploadedFile;
use serde::{Deserialize, Serialize};

// ==========================================
// ParsedSheet - 单个工作表的解码结果
// ==========================================
// 表头允许重复；列顺序即插入顺序
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSheet {
    pub sheet_name: String,
    pub headers: Vec<String>,
    pub preview_rows: Vec<Vec<String>>,
}

impl ParsedSheet {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn contains_header(&self, header: &str) -> bool {
        self.headers.iter().any(|h| h == header)
    }

    /// 表头首次出现的列号
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// 某列在预览行中的取值（缺失单元格视为空字符串）
    pub fn sample_values(&self, column: usize) -> Vec<String> {
        self.preview_rows
            .iter()
            .map(|row| row.get(column).cloned().unwrap_or_default())
            .collect()
    }

    /// 忽略大小写后重复的表头: (表头, 出现的列号列表)
    pub fn duplicate_headers(&self) -> Vec<(String, Vec<usize>)> {
        let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
        for (idx, header) in self.headers.iter().enumerate() {
            let normalized = normalize_header(header);
            if normalized.is_empty() {
                continue;
            }
            match groups
                .iter_mut()
                .find(|(first, _)| normalize_header(first) == normalized)
            {
                Some((_, columns)) => columns.push(idx),
                None => groups.push((header.clone(), vec![idx])),
            }
        }
        groups.retain(|(_, columns)| columns.len() > 1);
        groups
    }
}

// ==========================================
// WorkbookState - 上传会话独占的工作簿状态
// ==========================================
// 原始字节随文件保留：切换工作表时按需重新解码，提交时原样交给后端
#[derive(Debug, Clone)]
pub struct WorkbookState {
    pub file: UploadedFile,
    pub sheet_names: Vec<String>,
    pub selected_sheet: String,
}

impl WorkbookState {
    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheet_names.iter().any(|s| s == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(headers: &[&str], rows: &[&[&str]]) -> ParsedSheet {
        ParsedSheet {
            sheet_name: "Hoja1".to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            preview_rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_sample_values_pads_short_rows() {
        let s = sheet(&["SKU", "Nombre"], &[&["A1", "Manzana"], &["A2"]]);
        assert_eq!(s.sample_values(1), vec!["Manzana".to_string(), String::new()]);
    }

    #[test]
    fn test_duplicate_headers_case_insensitive() {
        let s = sheet(&["SKU", "Nombre", "sku", "", ""], &[]);
        let dups = s.duplicate_headers();
        assert_eq!(dups, vec![("SKU".to_string(), vec![0, 2])]);
    }

    #[test]
    fn test_column_index_first_occurrence() {
        let s = sheet(&["Lote", "Lote"], &[]);
        assert_eq!(s.column_index("Lote"), Some(0));
        assert!(!s.contains_header("lote"));
    }
}
