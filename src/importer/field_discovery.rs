// ==========================================
// 仓储管理系统 - 退还物料列动态发现
// ==========================================
// 适用: 仅 fruit-receptions（鲜果收货）
// 职责: 按实际表头发现可重复的 "Código de <物料> n" / "Cantidad de <物料> n" 列，
//       替换静态字段表中的占位字段
// ==========================================

use crate::domain::field::{FieldSpec, ImportTypeSchema};
use crate::domain::mapping::MappingWarning;
use crate::domain::types::ImportType;
use crate::importer::schema_registry::static_schema;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

/// 物料类别（顺序即匹配优先级）
pub const MATERIAL_CATEGORIES: [&str; 5] = ["Caja", "Clam", "Tarima", "Interlock", "Producto"];

/// 占位字段之后插入发现字段的锚点
const NOTES_KEY: &str = "notes";
const TOTAL_RETURNED_KEY: &str = "valorTotalMaterialDevuelto";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaterialColumnKind {
    Code,     // 物料编码列
    Quantity, // 物料数量列
}

impl MaterialColumnKind {
    fn key_prefix(&self) -> &'static str {
        match self {
            MaterialColumnKind::Code => "codigo",
            MaterialColumnKind::Quantity => "cantidad",
        }
    }
}

struct CategoryPattern {
    category: &'static str,
    code: Regex,
    quantity: Regex,
}

fn compile(prefix: &str, category: &str) -> Option<Regex> {
    // 序号可选；无序号视为 1
    Regex::new(&format!(
        r"(?i)^{}\s+(?:de\s+)?{}(?:\s*(\d+))?$",
        prefix,
        regex::escape(category)
    ))
    .ok()
}

// 模式均由常量拼接，编译失败的类别会被单元测试发现
static PATTERNS: LazyLock<Vec<CategoryPattern>> = LazyLock::new(|| {
    MATERIAL_CATEGORIES
        .into_iter()
        .filter_map(|category| {
            Some(CategoryPattern {
                category,
                code: compile("c[oó]digo", category)?,
                quantity: compile("cantidad", category)?,
            })
        })
        .collect()
});

// ==========================================
// 发现结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredField {
    pub spec: FieldSpec,
    pub column: usize,
    pub category: &'static str,
    pub kind: MaterialColumnKind,
    pub index: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    pub fields: Vec<DiscoveredField>,
    pub warnings: Vec<MappingWarning>,
}

/// 单个表头的匹配: (类别, 列类型, 序号)；按类别声明顺序取第一个命中
fn match_header(header: &str) -> Option<(&'static str, MaterialColumnKind, u32)> {
    let text = header.trim();
    PATTERNS.iter().find_map(|p| {
        let (kind, caps) = if let Some(caps) = p.code.captures(text) {
            (MaterialColumnKind::Code, caps)
        } else {
            (MaterialColumnKind::Quantity, p.quantity.captures(text)?)
        };
        let index = match caps.get(1) {
            Some(m) => m.as_str().parse::<u32>().ok()?,
            None => 1,
        };
        Some((p.category, kind, index))
    })
}

fn field_key(category: &str, kind: MaterialColumnKind, index: u32) -> String {
    if index > 1 {
        format!("{}{}{}", kind.key_prefix(), category, index)
    } else {
        format!("{}{}", kind.key_prefix(), category)
    }
}

/// 扫描表头，发现退还物料列（按列号从左到右）
pub fn discover_material_columns(headers: &[String]) -> Discovery {
    let mut discovery = Discovery::default();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for (column, header) in headers.iter().enumerate() {
        let Some((category, kind, index)) = match_header(header) else {
            continue;
        };
        let key = field_key(category, kind, index);

        // 同一物料+序号出现多次：保留最左列
        if let Some(&kept_column) = seen.get(&key) {
            discovery.warnings.push(MappingWarning::DuplicateMaterialColumn {
                field_key: key,
                header: header.clone(),
                column,
                kept_column,
            });
            continue;
        }
        seen.insert(key.clone(), column);

        discovery.fields.push(DiscoveredField {
            spec: FieldSpec::new(key, header.trim(), false),
            column,
            category,
            kind,
            index,
        });
    }

    discovery.fields.sort_by_key(|f| f.column);

    tracing::debug!(
        discovered = discovery.fields.len(),
        duplicates = discovery.warnings.len(),
        "退还物料列发现完成"
    );
    discovery
}

/// 按列顺序返回发现的字段定义
pub fn discover_fields(headers: &[String]) -> Vec<FieldSpec> {
    discover_material_columns(headers)
        .fields
        .into_iter()
        .map(|f| f.spec)
        .collect()
}

/// 静态字段表中的退还物料占位字段
pub fn is_material_placeholder(key: &str) -> bool {
    key.starts_with("codigo") || key.starts_with("cantidad") || key == TOTAL_RETURNED_KEY
}

/// 去掉占位字段，并把发现的字段插入到 notes 之前（无 notes 则追加到末尾）
pub fn extend_schema(base: ImportTypeSchema, discovered: Vec<FieldSpec>) -> ImportTypeSchema {
    let import_type = base.import_type;
    let mut fields: Vec<FieldSpec> = base
        .fields
        .into_iter()
        .filter(|f| !is_material_placeholder(&f.key))
        .collect();

    let at = fields
        .iter()
        .position(|f| f.key == NOTES_KEY)
        .unwrap_or(fields.len());
    let tail = fields.split_off(at);
    fields.extend(discovered);
    fields.extend(tail);

    ImportTypeSchema::new(import_type, fields)
}

/// 本次上传实际使用的字段表
pub fn effective_schema(import_type: ImportType, headers: &[String]) -> ImportTypeSchema {
    let base = static_schema(import_type);
    if !import_type.has_dynamic_fields() {
        return base;
    }
    extend_schema(base, discover_fields(headers))
}
