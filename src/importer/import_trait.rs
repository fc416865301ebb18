// ==========================================
// 仓储管理系统 - 导入管道 Trait
// ==========================================
// 职责: 定义文件解析与列映射的接口（不包含实现）
// ==========================================

use crate::domain::field::ImportTypeSchema;
use crate::domain::mapping::ColumnMapping;
use crate::domain::sheet::ParsedSheet;
use crate::domain::submission::UploadedFile;
use crate::importer::error::{ImportError, ImportResult};

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 工作簿解码接口（表头 + 预览行）
// 实现者: CsvParser, ExcelParser, UniversalFileParser
pub trait FileParser: Send + Sync {
    /// 列出工作表名（按文件中存储的顺序）
    ///
    /// # 返回
    /// - Ok(Vec<String>): 至少包含一个工作表
    /// - Err(MalformedFile): 无法解码或没有工作表
    fn sheet_names(&self, file: &UploadedFile) -> ImportResult<Vec<String>>;

    /// 读取工作表的非空行（单元格已字符串化并去空白）
    ///
    /// # 参数
    /// - sheet_name: 工作表名
    /// - max_rows: 最多返回的行数（含表头行）
    fn read_rows(
        &self,
        file: &UploadedFile,
        sheet_name: &str,
        max_rows: usize,
    ) -> ImportResult<Vec<Vec<String>>>;

    /// 读取工作表为 ParsedSheet：首行为表头，其后最多 preview_limit 行为预览
    ///
    /// # 返回
    /// - Err(MalformedFile): 工作表没有任何非空行
    fn read_sheet(
        &self,
        file: &UploadedFile,
        sheet_name: &str,
        preview_limit: usize,
    ) -> ImportResult<ParsedSheet> {
        let mut rows = self
            .read_rows(file, sheet_name, preview_limit.saturating_add(1))?
            .into_iter();

        let headers = rows.next().ok_or_else(|| {
            ImportError::MalformedFile(format!("工作表 {} 无数据行", sheet_name))
        })?;

        Ok(ParsedSheet {
            sheet_name: sheet_name.to_string(),
            headers,
            preview_rows: rows.collect(),
        })
    }
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 自动列映射接口
// 实现者: AutoMapper
pub trait FieldMapper: Send + Sync {
    /// 为尚未出现在映射中的字段自动匹配表头
    ///
    /// # 规则
    /// - 已有映射（用户设置或先前结果）绝不覆盖
    /// - 多列文本相同时取列号最小者
    ///
    /// # 返回
    /// - 本次新映射的字段 key（按字段表顺序）
    fn auto_map(
        &self,
        schema: &ImportTypeSchema,
        headers: &[String],
        mapping: &mut ColumnMapping,
    ) -> Vec<String>;
}
