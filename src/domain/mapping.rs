// ==========================================
// 仓储管理系统 - 列映射领域模型
// ==========================================
// 职责: ColumnMapping（字段 key → 表头）、映射告警
// 不变式: Header(h) 仅当 h 存在于当前表头时才算已映射
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// "未分配" 的序列化哨兵值
pub const UNASSIGNED: &str = "__unassigned__";

// ==========================================
// ColumnTarget - 单个字段的映射目标
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnTarget {
    Unassigned,
    Header(String),
}

impl ColumnTarget {
    pub fn header(&self) -> Option<&str> {
        match self {
            ColumnTarget::Header(h) => Some(h.as_str()),
            ColumnTarget::Unassigned => None,
        }
    }
}

impl From<String> for ColumnTarget {
    fn from(value: String) -> Self {
        if value == UNASSIGNED || value.trim().is_empty() {
            ColumnTarget::Unassigned
        } else {
            ColumnTarget::Header(value)
        }
    }
}

impl From<&str> for ColumnTarget {
    fn from(value: &str) -> Self {
        ColumnTarget::from(value.to_string())
    }
}

impl From<ColumnTarget> for String {
    fn from(value: ColumnTarget) -> Self {
        match value {
            ColumnTarget::Unassigned => UNASSIGNED.to_string(),
            ColumnTarget::Header(h) => h,
        }
    }
}

// ==========================================
// ColumnMapping - 字段 key → 映射目标
// ==========================================
// 用 BTreeMap 保证序列化顺序稳定
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    entries: BTreeMap<String, ColumnTarget>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&ColumnTarget> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn set(&mut self, key: impl Into<String>, target: ColumnTarget) {
        self.entries.insert(key.into(), target);
    }

    pub fn assign(&mut self, key: impl Into<String>, header: impl Into<String>) {
        self.set(key, ColumnTarget::Header(header.into()));
    }

    pub fn remove(&mut self, key: &str) -> Option<ColumnTarget> {
        self.entries.remove(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ColumnTarget)> {
        self.entries.iter()
    }

    /// 字段当前映射的表头（不检查是否仍存在于表头中）
    pub fn header_for(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(ColumnTarget::header)
    }

    /// 字段映射到的有效表头：必须存在于给定表头中，否则视为未映射
    pub fn resolved_header<'a>(&'a self, key: &str, headers: &[String]) -> Option<&'a str> {
        self.header_for(key)
            .filter(|h| headers.iter().any(|candidate| candidate == h))
    }

    /// 已被占用的表头
    pub fn assigned_headers(&self) -> impl Iterator<Item = &str> {
        self.entries.values().filter_map(ColumnTarget::header)
    }

    /// 提交用的 key → 表头映射（排除未分配）
    pub fn to_submission_map(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.header().map(|h| (k.clone(), h.to_string())))
            .collect()
    }
}

// ==========================================
// MappingWarning - 映射软告警
// ==========================================
// StaleMapping: 已映射的表头在新工作表中不存在
// DuplicateHeader / DuplicateMaterialColumn: 表头歧义，按确定规则处理
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MappingWarning {
    StaleMapping {
        field_key: String,
        header: String,
    },
    DuplicateHeader {
        header: String,
        columns: Vec<usize>,
    },
    DuplicateMaterialColumn {
        field_key: String,
        header: String,
        column: usize,
        kept_column: usize,
    },
}

impl fmt::Display for MappingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingWarning::StaleMapping { field_key, header } => {
                write!(f, "字段 {} 映射的列 \"{}\" 在当前工作表中不存在", field_key, header)
            }
            MappingWarning::DuplicateHeader { header, columns } => {
                write!(f, "表头 \"{}\" 重复出现于列 {:?}，自动映射取最左列", header, columns)
            }
            MappingWarning::DuplicateMaterialColumn {
                field_key,
                header,
                column,
                kept_column,
            } => write!(
                f,
                "列 {} \"{}\" 与列 {} 同为 {}，已忽略",
                column, header, kept_column, field_key
            ),
        }
    }
}
