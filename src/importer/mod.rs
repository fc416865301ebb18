// ==========================================
// 仓储管理系统 - 导入层
// ==========================================
// 职责: 工作簿解码、字段表、动态字段发现、自动映射、映射校验
// 支持: Excel (xlsx/xls/xlsb/ods), CSV
// ==========================================

// 模块声明
pub mod error;
pub mod field_discovery;
pub mod field_mapper;
pub mod file_parser;
pub mod import_trait;
pub mod mapping_validator;
pub mod schema_registry;
pub mod template;
pub mod workbook;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_discovery::{
    discover_fields, discover_material_columns, effective_schema, DiscoveredField, Discovery,
    MaterialColumnKind,
};
pub use field_mapper::{apply_override, duplicate_header_warnings, revalidate_mapping, AutoMapper};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use mapping_validator::MappingValidator;
pub use schema_registry::static_schema;
pub use template::{template_headers, write_template_csv};
pub use workbook::WorkbookLoader;

// 重导出 Trait 接口
pub use import_trait::{FieldMapper, FileParser};
