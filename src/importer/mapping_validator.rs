// ==========================================
// 仓储管理系统 - 映射校验器
// ==========================================
// 职责: 提交前检查必填字段是否都映射到当前工作表的真实表头
// 口径: 未设置 / Unassigned / 表头已不存在 均视为缺失
// ==========================================

use crate::domain::field::{FieldSpec, ImportTypeSchema};
use crate::domain::mapping::ColumnMapping;
use crate::importer::error::{ImportError, ImportResult};

pub struct MappingValidator;

impl MappingValidator {
    /// 缺失的必填字段（按字段表顺序）
    pub fn missing_required<'a>(
        schema: &'a ImportTypeSchema,
        headers: &[String],
        mapping: &ColumnMapping,
    ) -> Vec<&'a FieldSpec> {
        schema
            .required_fields()
            .filter(|f| mapping.resolved_header(&f.key, headers).is_none())
            .collect()
    }

    /// 校验映射；失败时列出全部缺失字段的展示名
    pub fn validate(
        schema: &ImportTypeSchema,
        headers: &[String],
        mapping: &ColumnMapping,
    ) -> ImportResult<()> {
        let missing = Self::missing_required(schema, headers, mapping);
        if missing.is_empty() {
            return Ok(());
        }

        let labels: Vec<String> = missing.iter().map(|f| f.label.clone()).collect();
        tracing::info!(
            import_type = %schema.import_type,
            missing = ?labels,
            "必填列映射缺失"
        );
        Err(ImportError::MissingRequiredColumns { labels })
    }
}
