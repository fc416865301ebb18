// ==========================================
// 仓储管理系统 - 导入模板导出
// ==========================================
// 职责: 按导入类型生成只含表头行的 CSV 模板，供用户下载填写
// ==========================================

use crate::domain::types::ImportType;
use crate::importer::error::ImportResult;
use crate::importer::schema_registry::static_schema;
use std::io::Write;

/// 模板表头（字段表的展示名，按字段表顺序）
///
/// 退还物料占位字段以序号 1 的表头形式出现，上传时同样能被动态发现
pub fn template_headers(import_type: ImportType) -> Vec<String> {
    static_schema(import_type)
        .fields()
        .iter()
        .map(|f| f.label.clone())
        .collect()
}

/// 写出 CSV 模板（UTF-8，逗号分隔，仅表头行）
pub fn write_template_csv<W: Write>(import_type: ImportType, writer: W) -> ImportResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(template_headers(import_type))?;
    csv_writer.flush()?;

    tracing::debug!(import_type = %import_type, "导入模板已生成");
    Ok(())
}
