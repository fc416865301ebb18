// ==========================================
// 仓储管理系统 - 导入字段定义
// ==========================================
// 职责: FieldSpec（可映射目标字段）与 ImportTypeSchema（导入类型字段表）
// ==========================================

use crate::domain::types::ImportType;
use serde::{Deserialize, Serialize};

// ==========================================
// FieldSpec - 可映射的目标字段
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub key: String,    // 稳定标识（如 "sku"、"codigoCaja2"）
    pub label: String,  // 展示名称，同时作为匹配备选
    pub required: bool, // 是否必须映射
}

impl FieldSpec {
    pub fn new(key: impl Into<String>, label: impl Into<String>, required: bool) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            required,
        }
    }

    /// 表头是否与字段 key 或 label 匹配（去空白、忽略大小写）
    pub fn matches_header(&self, header: &str) -> bool {
        let normalized = normalize_header(header);
        if normalized.is_empty() {
            return false;
        }
        normalized == normalize_header(&self.key) || normalized == normalize_header(&self.label)
    }
}

/// 表头比较口径: TRIM + 小写
pub fn normalize_header(value: &str) -> String {
    value.trim().to_lowercase()
}

// ==========================================
// ImportTypeSchema - 导入类型的有序字段表
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportTypeSchema {
    pub import_type: ImportType,
    pub fields: Vec<FieldSpec>,
}

impl ImportTypeSchema {
    pub fn new(import_type: ImportType, fields: Vec<FieldSpec>) -> Self {
        Self {
            import_type,
            fields,
        }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.required)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
