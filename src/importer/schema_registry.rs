// ==========================================
// 仓储管理系统 - 导入字段表（静态配置）
// ==========================================
// 职责: 每种导入类型的有序字段表（key / 展示名 / 是否必填）
// 说明: 标签为面向用户的西语列名，同时作为自动映射的匹配依据
// ==========================================

use crate::domain::field::{FieldSpec, ImportTypeSchema};
use crate::domain::types::ImportType;

/// (key, label, required)
type StaticField = (&'static str, &'static str, bool);

const PRODUCTS: &[StaticField] = &[
    ("sku", "SKU", true),
    ("name", "Nombre", true),
    ("description", "Descripción", false),
    ("categoryId", "ID de Categoría", false),
    ("unitOfMeasure", "Unidad de Medida", false),
    ("minStock", "Stock Mínimo", false),
    ("maxStock", "Stock Máximo", false),
];

const INVENTORY: &[StaticField] = &[
    ("sku", "SKU", true),
    ("warehouse", "Almacén", true),
    ("quantity", "Cantidad", true),
    ("location", "Ubicación", false),
    ("lotNumber", "Lote", false),
    ("expirationDate", "Fecha de Caducidad", false),
    ("unitCost", "Costo Unitario", false),
];

const SUPPLIERS: &[StaticField] = &[
    ("name", "Nombre", true),
    ("rfc", "RFC", true),
    ("contactName", "Contacto", true),
    ("email", "Correo Electrónico", true),
    ("phone", "Teléfono", true),
    ("address", "Dirección", true),
    ("city", "Ciudad", false),
    ("state", "Estado", false),
    ("postalCode", "Código Postal", false),
    ("paymentTerms", "Condiciones de Pago", false),
];

const WAREHOUSES: &[StaticField] = &[
    ("code", "Código", true),
    ("name", "Nombre", true),
    ("address", "Dirección", false),
    ("city", "Ciudad", false),
    ("manager", "Responsable", false),
    ("capacity", "Capacidad", false),
];

const INPUT_ASSIGNMENTS: &[StaticField] = &[
    ("sku", "SKU", true),
    ("producer", "Productor", true),
    ("quantity", "Cantidad", true),
    ("assignmentDate", "Fecha de Asignación", true),
    ("warehouse", "Almacén", false),
    ("notes", "Notas", false),
];

// 退还物料的 codigo*/cantidad*/valorTotalMaterialDevuelto 为占位字段，
// 解析时由 field_discovery 按实际表头替换
const FRUIT_RECEPTIONS: &[StaticField] = &[
    ("receptionDate", "Fecha de Recepción", true),
    ("producer", "Productor", true),
    ("product", "Producto", true),
    ("warehouse", "Almacén", true),
    ("boxes", "Cajas Recibidas", true),
    ("weightKg", "Peso (kg)", false),
    ("lotNumber", "Lote", false),
    ("codigoCaja", "Código de Caja", false),
    ("cantidadCaja", "Cantidad de Caja", false),
    ("codigoClam", "Código de Clam", false),
    ("cantidadClam", "Cantidad de Clam", false),
    ("codigoTarima", "Código de Tarima", false),
    ("cantidadTarima", "Cantidad de Tarima", false),
    ("codigoInterlock", "Código de Interlock", false),
    ("cantidadInterlock", "Cantidad de Interlock", false),
    ("codigoProducto", "Código de Producto", false),
    ("cantidadProducto", "Cantidad de Producto", false),
    ("valorTotalMaterialDevuelto", "Valor Total Material Devuelto", false),
    ("notes", "Notas", false),
];

const INITIAL_STOCK: &[StaticField] = &[
    ("sku", "SKU", true),
    ("warehouse", "Almacén", true),
    ("quantity", "Cantidad", true),
    ("unitCost", "Costo Unitario", false),
    ("lotNumber", "Lote", false),
    ("stockDate", "Fecha de Corte", false),
];

fn table(import_type: ImportType) -> &'static [StaticField] {
    match import_type {
        ImportType::Products => PRODUCTS,
        ImportType::Inventory => INVENTORY,
        ImportType::Suppliers => SUPPLIERS,
        ImportType::Warehouses => WAREHOUSES,
        ImportType::InputAssignments => INPUT_ASSIGNMENTS,
        ImportType::FruitReceptions => FRUIT_RECEPTIONS,
        ImportType::InitialStock => INITIAL_STOCK,
    }
}

/// 导入类型的静态字段表
pub fn static_schema(import_type: ImportType) -> ImportTypeSchema {
    let fields = table(import_type)
        .iter()
        .map(|(key, label, required)| FieldSpec::new(*key, *label, *required))
        .collect();
    ImportTypeSchema::new(import_type, fields)
}
