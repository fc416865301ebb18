// ==========================================
// 仓储管理系统 - 列映射器实现
// ==========================================
// 职责: 表头 → 字段 key 的自动映射、手工覆写、切换工作表后的映射复核
// 规则: 已存在的映射条目绝不被自动映射覆盖；多个字段争用同一表头时归字段表中靠前者
// ==========================================

use crate::domain::field::ImportTypeSchema;
use crate::domain::mapping::{ColumnMapping, ColumnTarget, MappingWarning};
use crate::domain::sheet::ParsedSheet;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::import_trait::FieldMapper;

pub struct AutoMapper;

impl FieldMapper for AutoMapper {
    fn auto_map(
        &self,
        schema: &ImportTypeSchema,
        headers: &[String],
        mapping: &mut ColumnMapping,
    ) -> Vec<String> {
        let fields = schema.fields();
        let mut assigned = Vec::new();

        for (i, field) in fields.iter().enumerate() {
            if mapping.contains_key(&field.key) {
                continue;
            }

            // 只取列序最靠前的匹配表头，靠后的重复表头永不分配给该字段
            let Some(header) = headers.iter().find(|h| field.matches_header(h)) else {
                continue;
            };

            // 同一表头同时匹配多个字段时归字段表中靠前且已映射到它的字段
            let contested = fields[..i].iter().any(|earlier| {
                earlier.matches_header(header)
                    && mapping.header_for(&earlier.key) == Some(header.as_str())
            });
            if contested {
                continue;
            }

            mapping.assign(field.key.clone(), header.clone());
            assigned.push(field.key.clone());
        }

        tracing::debug!(
            import_type = %schema.import_type,
            assigned = assigned.len(),
            total = mapping.len(),
            "自动映射完成"
        );
        assigned
    }
}

/// 复核已有映射: 删除表头已不存在、或字段已不在字段表中的条目
///
/// 显式的 Unassigned 选择对仍存在的字段保留
pub fn revalidate_mapping(
    schema: &ImportTypeSchema,
    headers: &[String],
    mapping: &mut ColumnMapping,
) -> Vec<MappingWarning> {
    let mut stale_keys = Vec::new();
    let mut warnings = Vec::new();

    for (key, target) in mapping.iter() {
        if !schema.contains_key(key) {
            stale_keys.push(key.clone());
            if let Some(header) = target.header() {
                warnings.push(MappingWarning::StaleMapping {
                    field_key: key.clone(),
                    header: header.to_string(),
                });
            }
            continue;
        }
        if let Some(header) = target.header() {
            if !headers.iter().any(|h| h == header) {
                stale_keys.push(key.clone());
                warnings.push(MappingWarning::StaleMapping {
                    field_key: key.clone(),
                    header: header.to_string(),
                });
            }
        }
    }

    for key in &stale_keys {
        mapping.remove(key);
    }

    if !warnings.is_empty() {
        tracing::warn!(stale = warnings.len(), "映射条目已失效并被移除");
    }
    warnings
}

/// 手工设置单个字段的映射
///
/// # 错误
/// - UnknownField: key 不在当前字段表中
/// - UnknownHeader: 目标表头不在当前工作表中
pub fn apply_override(
    schema: &ImportTypeSchema,
    headers: &[String],
    mapping: &mut ColumnMapping,
    key: &str,
    target: ColumnTarget,
) -> ImportResult<()> {
    if !schema.contains_key(key) {
        return Err(ImportError::UnknownField(key.to_string()));
    }
    if let Some(header) = target.header() {
        if !headers.iter().any(|h| h == header) {
            return Err(ImportError::UnknownHeader(header.to_string()));
        }
    }

    tracing::debug!(field_key = key, target = ?target, "手工覆写映射");
    mapping.set(key, target);
    Ok(())
}

/// 重复表头告警（忽略大小写）
pub fn duplicate_header_warnings(sheet: &ParsedSheet) -> Vec<MappingWarning> {
    sheet
        .duplicate_headers()
        .into_iter()
        .map(|(header, columns)| MappingWarning::DuplicateHeader { header, columns })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::field::FieldSpec;
    use crate::domain::types::ImportType;
    use crate::importer::schema_registry::static_schema;

    fn headers(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_auto_map_products() {
        let schema = static_schema(ImportType::Products);
        let h = headers(&["SKU", "Nombre", "Categoría"]);
        let mut mapping = ColumnMapping::new();

        let assigned = AutoMapper.auto_map(&schema, &h, &mut mapping);

        assert_eq!(assigned, vec!["sku", "name"]);
        assert_eq!(mapping.header_for("sku"), Some("SKU"));
        assert_eq!(mapping.header_for("name"), Some("Nombre"));
        assert!(!mapping.contains_key("categoryId"));
    }

    #[test]
    fn test_auto_map_idempotent() {
        let schema = static_schema(ImportType::Inventory);
        let h = headers(&["sku", "ALMACÉN", "cantidad", "Lote"]);
        let mut mapping = ColumnMapping::new();

        AutoMapper.auto_map(&schema, &h, &mut mapping);
        let first = mapping.clone();
        let second_pass = AutoMapper.auto_map(&schema, &h, &mut mapping);

        assert!(second_pass.is_empty());
        assert_eq!(mapping, first);
    }

    #[test]
    fn test_auto_map_never_overrides_existing() {
        let schema = static_schema(ImportType::Products);
        let h = headers(&["SKU", "Nombre", "Código"]);
        let mut mapping = ColumnMapping::new();
        mapping.assign("sku", "Código");
        mapping.set("name", ColumnTarget::Unassigned);

        AutoMapper.auto_map(&schema, &h, &mut mapping);

        assert_eq!(mapping.header_for("sku"), Some("Código"));
        assert_eq!(mapping.get("name"), Some(&ColumnTarget::Unassigned));
    }

    #[test]
    fn test_auto_map_duplicate_header_lowest_index() {
        let schema = static_schema(ImportType::Products);
        let h = headers(&["SKU", "sku"]);
        let mut mapping = ColumnMapping::new();

        AutoMapper.auto_map(&schema, &h, &mut mapping);

        assert_eq!(mapping.header_for("sku"), Some("SKU"));
    }

    #[test]
    fn test_contested_header_goes_to_first_field() {
        // 两个字段都能匹配 "Código"：字段表中靠前者获得
        let schema = ImportTypeSchema::new(
            ImportType::Warehouses,
            vec![
                FieldSpec::new("code", "Código", true),
                FieldSpec::new("altCode", "Código", false),
            ],
        );
        let h = headers(&["Código"]);
        let mut mapping = ColumnMapping::new();

        AutoMapper.auto_map(&schema, &h, &mut mapping);

        assert_eq!(mapping.header_for("code"), Some("Código"));
        assert!(!mapping.contains_key("altCode"));
    }

    #[test]
    fn test_contested_duplicate_header_not_shifted_to_later_column() {
        let schema = ImportTypeSchema::new(
            ImportType::Warehouses,
            vec![
                FieldSpec::new("code", "Código", true),
                FieldSpec::new("altCode", "Código", false),
            ],
        );
        let h = headers(&["Código", "código"]);
        let mut mapping = ColumnMapping::new();

        AutoMapper.auto_map(&schema, &h, &mut mapping);
        let second_pass = AutoMapper.auto_map(&schema, &h, &mut mapping);

        assert_eq!(mapping.header_for("code"), Some("Código"));
        assert!(!mapping.contains_key("altCode"));
        assert!(second_pass.is_empty());
    }

    #[test]
    fn test_header_held_by_manual_mapping_still_auto_assigned() {
        let schema = static_schema(ImportType::Products);
        let h = headers(&["SKU", "sku", "Nombre"]);
        let mut mapping = ColumnMapping::new();
        mapping.assign("description", "SKU");

        AutoMapper.auto_map(&schema, &h, &mut mapping);

        // 列序最靠前的 "SKU"，不会退到第 1 列的 "sku"
        assert_eq!(mapping.header_for("sku"), Some("SKU"));
        assert_eq!(mapping.header_for("description"), Some("SKU"));
        assert_eq!(mapping.header_for("name"), Some("Nombre"));
    }

    #[test]
    fn test_required_field_keeps_exact_header_after_optional_override() {
        let schema = static_schema(ImportType::FruitReceptions);
        let h = headers(&["Fecha de Recepción", "Productor", "Producto", "Notas"]);
        let mut mapping = ColumnMapping::new();
        mapping.assign("notes", "Producto");

        AutoMapper.auto_map(&schema, &h, &mut mapping);

        assert_eq!(mapping.header_for("product"), Some("Producto"));
        assert_eq!(mapping.header_for("notes"), Some("Producto"));
    }

    #[test]
    fn test_revalidate_drops_stale_and_keeps_unassigned() {
        let schema = static_schema(ImportType::Inventory);
        let mut mapping = ColumnMapping::new();
        mapping.assign("sku", "SKU");
        mapping.assign("warehouse", "Almacén");
        mapping.set("location", ColumnTarget::Unassigned);
        mapping.assign("price", "Precio");

        let warnings = revalidate_mapping(&schema, &headers(&["SKU", "Cantidad"]), &mut mapping);

        assert_eq!(mapping.header_for("sku"), Some("SKU"));
        assert!(!mapping.contains_key("warehouse"));
        assert!(!mapping.contains_key("price"));
        assert_eq!(mapping.get("location"), Some(&ColumnTarget::Unassigned));
        assert_eq!(warnings.len(), 2);
        assert!(warnings.contains(&MappingWarning::StaleMapping {
            field_key: "warehouse".to_string(),
            header: "Almacén".to_string(),
        }));
    }

    #[test]
    fn test_apply_override_rejects_unknown() {
        let schema = static_schema(ImportType::Products);
        let h = headers(&["SKU"]);
        let mut mapping = ColumnMapping::new();

        let err = apply_override(&schema, &h, &mut mapping, "price", "SKU".into()).unwrap_err();
        assert!(matches!(err, ImportError::UnknownField(_)));

        let err = apply_override(&schema, &h, &mut mapping, "sku", "Código".into()).unwrap_err();
        assert!(matches!(err, ImportError::UnknownHeader(_)));

        apply_override(&schema, &h, &mut mapping, "sku", ColumnTarget::Unassigned).unwrap();
        assert_eq!(mapping.get("sku"), Some(&ColumnTarget::Unassigned));
    }

    #[test]
    fn test_duplicate_header_warnings() {
        let sheet = ParsedSheet {
            sheet_name: "Hoja1".to_string(),
            headers: headers(&["SKU", "Nombre", "sku"]),
            preview_rows: vec![],
        };
        assert_eq!(
            duplicate_header_warnings(&sheet),
            vec![MappingWarning::DuplicateHeader {
                header: "SKU".to_string(),
                columns: vec![0, 2],
            }]
        );
    }
}
