// ==========================================
// 仓储管理系统 - 领域类型定义
// ==========================================
// 职责: 导入类型枚举、上传流程步骤枚举
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 导入类型 (Import Type)
// ==========================================
// 序列化格式: kebab-case（与前端/后端导入端点一致）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportType {
    Products,         // 产品
    Inventory,        // 库存
    Suppliers,        // 供应商
    Warehouses,       // 仓库
    InputAssignments, // 投入品分配
    FruitReceptions,  // 鲜果收货
    InitialStock,     // 期初库存
}

impl ImportType {
    /// 全部导入类型（展示顺序）
    pub const ALL: [ImportType; 7] = [
        ImportType::Products,
        ImportType::Inventory,
        ImportType::Suppliers,
        ImportType::Warehouses,
        ImportType::InputAssignments,
        ImportType::FruitReceptions,
        ImportType::InitialStock,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImportType::Products => "products",
            ImportType::Inventory => "inventory",
            ImportType::Suppliers => "suppliers",
            ImportType::Warehouses => "warehouses",
            ImportType::InputAssignments => "input-assignments",
            ImportType::FruitReceptions => "fruit-receptions",
            ImportType::InitialStock => "initial-stock",
        }
    }

    /// 是否需要根据表头动态扩展字段（仅鲜果收货的退还物料列）
    pub fn has_dynamic_fields(&self) -> bool {
        matches!(self, ImportType::FruitReceptions)
    }
}

impl fmt::Display for ImportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ImportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        ImportType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| s.to_string())
    }
}

// ==========================================
// 上传流程步骤 (Upload Step)
// ==========================================
// 流转: Idle → FileSelected → Mapping → Validating → Submitting → Completed | Failed
// 终态: Completed；显式 reset 后的 Idle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UploadStep {
    Idle,         // 未选择文件
    FileSelected, // 已选择文件，尚未得到可用的工作表
    Mapping,      // 列映射编辑中
    Validating,   // 必填列校验中
    Submitting,   // 已提交外部导入端点
    Completed,    // 导入完成
    Failed,       // 外部导入失败（瞬态）
}

impl fmt::Display for UploadStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadStep::Idle => write!(f, "IDLE"),
            UploadStep::FileSelected => write!(f, "FILE_SELECTED"),
            UploadStep::Mapping => write!(f, "MAPPING"),
            UploadStep::Validating => write!(f, "VALIDATING"),
            UploadStep::Submitting => write!(f, "SUBMITTING"),
            UploadStep::Completed => write!(f, "COMPLETED"),
            UploadStep::Failed => write!(f, "FAILED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_type_round_trip_names() {
        for t in ImportType::ALL {
            assert_eq!(t.as_str().parse::<ImportType>(), Ok(t));
        }
    }

    #[test]
    fn test_import_type_parse_lenient() {
        assert_eq!(
            " Fruit_Receptions ".parse::<ImportType>(),
            Ok(ImportType::FruitReceptions)
        );
        assert_eq!("bogus".parse::<ImportType>(), Err("bogus".to_string()));
    }

    #[test]
    fn test_import_type_serde_kebab_case() {
        let json = serde_json::to_string(&ImportType::InitialStock).unwrap();
        assert_eq!(json, "\"initial-stock\"");
    }

    #[test]
    fn test_only_fruit_receptions_is_dynamic() {
        let dynamic: Vec<_> = ImportType::ALL
            .iter()
            .filter(|t| t.has_dynamic_fields())
            .collect();
        assert_eq!(dynamic, vec![&ImportType::FruitReceptions]);
    }
}
