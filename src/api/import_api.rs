// ==========================================
// 仓储管理系统 - 批量导入API
// ==========================================
// 职责: 封装上传会话，向界面返回可序列化的响应
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::app::backend::ImportBackend;
use crate::app::upload_session::UploadSession;
use crate::config::import_config_trait::ImportConfigReader;
use crate::domain::mapping::{ColumnTarget, MappingWarning};
use crate::domain::submission::{ImportOutcome, UploadedFile};
use crate::domain::types::{ImportType, UploadStep};
use crate::importer::error::ImportError;
use crate::importer::schema_registry::static_schema;
use crate::importer::template::{template_headers, write_template_csv};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 导入类型说明
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportTypeInfo {
    /// 导入类型标识（kebab-case）
    pub import_type: ImportType,
    /// 静态字段数量
    pub field_count: usize,
    /// 必填字段展示名
    pub required_labels: Vec<String>,
    /// 是否按表头动态扩展字段
    pub has_dynamic_fields: bool,
    /// 模板表头
    pub template_headers: Vec<String>,
}

/// 映射行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MappingStatus {
    Mapped,   // 指向当前工作表的真实表头
    Unmapped, // 未设置或显式未分配
    Stale,    // 指向的表头已不存在
}

/// 映射表中的一行（按字段表顺序）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingRow {
    pub key: String,
    pub label: String,
    pub required: bool,
    /// 映射到的表头
    pub header: Option<String>,
    /// 表头所在列（首次出现）
    pub column_index: Option<usize>,
    /// 该列在预览行中的取值
    pub sample_values: Vec<String>,
    pub status: MappingStatus,
}

/// 映射表响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingTableResponse {
    pub rows: Vec<MappingRow>,
    /// 缺失的必填字段展示名
    pub missing_labels: Vec<String>,
    pub warnings: Vec<MappingWarning>,
}

/// 上传/切换工作表响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub session_id: Uuid,
    pub step: UploadStep,
    pub import_type: ImportType,
    pub file_name: Option<String>,
    pub sheets: Vec<String>,
    pub selected_sheet: Option<String>,
    pub headers: Vec<String>,
    pub preview_rows: Vec<Vec<String>>,
    pub mapping: MappingTableResponse,
}

/// 校验响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub valid: bool,
    pub missing_labels: Vec<String>,
}

/// 批量导入API
pub struct ImportApi {
    session: UploadSession,
}

impl ImportApi {
    /// 创建新的ImportApi实例
    ///
    /// # 参数
    /// - import_type: 导入类型标识（如 "fruit-receptions"）
    pub fn new(import_type: &str, config: &dyn ImportConfigReader) -> ApiResult<Self> {
        let import_type = parse_import_type(import_type)?;
        let session = UploadSession::new(import_type, config)?;
        Ok(Self { session })
    }

    /// 基于已有会话创建（自定义解析器等）
    pub fn from_session(session: UploadSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &UploadSession {
        &self.session
    }

    /// 所有导入类型及其字段概要
    pub fn list_import_types() -> Vec<ImportTypeInfo> {
        ImportType::ALL
            .iter()
            .map(|t| {
                let schema = static_schema(*t);
                ImportTypeInfo {
                    import_type: *t,
                    field_count: schema.len(),
                    required_labels: schema.required_fields().map(|f| f.label.clone()).collect(),
                    has_dynamic_fields: t.has_dynamic_fields(),
                    template_headers: template_headers(*t),
                }
            })
            .collect()
    }

    /// 导入模板（CSV 文本）
    pub fn template_csv(import_type: &str) -> ApiResult<String> {
        let import_type = parse_import_type(import_type)?;
        let mut buffer = Vec::new();
        write_template_csv(import_type, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| ApiError::InternalError(e.to_string()))
    }

    /// 上传文件并自动映射
    ///
    /// # 返回
    /// - Ok(UploadResponse): 工作表、表头、预览与映射表
    /// - Err(FileRejected): 文件无法解析，会话停留在 FileSelected
    pub async fn upload(&mut self, file_name: &str, bytes: Vec<u8>) -> ApiResult<UploadResponse> {
        tracing::info!(file_name, size = bytes.len(), "[upload] 收到文件");
        self.session
            .select_file_async(UploadedFile::new(file_name, bytes))
            .await?;
        Ok(self.snapshot())
    }

    /// 切换工作表
    pub fn select_sheet(&mut self, sheet_name: &str) -> ApiResult<UploadResponse> {
        self.session.select_sheet(sheet_name)?;
        Ok(self.snapshot())
    }

    /// 切换导入类型
    pub fn set_import_type(&mut self, import_type: &str) -> ApiResult<UploadResponse> {
        let import_type = parse_import_type(import_type)?;
        self.session.set_import_type(import_type)?;
        Ok(self.snapshot())
    }

    /// 修改单个字段映射；value 为 "__unassigned__" 或空串表示清除
    pub fn update_mapping(
        &mut self,
        field_key: &str,
        value: &str,
    ) -> ApiResult<MappingTableResponse> {
        self.session
            .set_mapping(field_key, ColumnTarget::from(value))?;
        Ok(self.mapping_table())
    }

    /// 清空映射
    pub fn clear_mapping(&mut self) -> ApiResult<MappingTableResponse> {
        self.session.clear_mapping()?;
        Ok(self.mapping_table())
    }

    /// 校验必填字段
    pub fn validate(&self) -> ValidationResponse {
        let missing_labels = self.session.missing_required_labels();
        ValidationResponse {
            valid: self.session.sheet().is_some() && missing_labels.is_empty(),
            missing_labels,
        }
    }

    /// 提交到外部导入端点
    pub async fn submit(&mut self, backend: &dyn ImportBackend) -> ApiResult<ImportOutcome> {
        let outcome = self.session.submit(backend).await.map_err(|e| {
            tracing::error!("[submit] 导入失败: {}", e);
            ApiError::from(e)
        })?;
        Ok(outcome)
    }

    /// 失败后回到映射阶段
    pub fn resume_mapping(&mut self) -> ApiResult<UploadResponse> {
        self.session.resume_mapping()?;
        Ok(self.snapshot())
    }

    /// 重置会话
    pub fn reset(&mut self) -> UploadResponse {
        self.session.reset();
        self.snapshot()
    }

    /// 当前会话快照
    pub fn snapshot(&self) -> UploadResponse {
        let session = &self.session;
        UploadResponse {
            session_id: session.session_id(),
            step: session.step(),
            import_type: session.import_type(),
            file_name: session.workbook().map(|w| w.file.file_name.clone()),
            sheets: session.sheet_names().to_vec(),
            selected_sheet: session.selected_sheet().map(str::to_string),
            headers: session.headers().to_vec(),
            preview_rows: session
                .sheet()
                .map(|s| s.preview_rows.clone())
                .unwrap_or_default(),
            mapping: self.mapping_table(),
        }
    }

    /// 按字段表顺序生成映射表
    pub fn mapping_table(&self) -> MappingTableResponse {
        let session = &self.session;
        let mapping = session.mapping();

        let rows = session
            .schema()
            .fields()
            .iter()
            .map(|field| {
                let header = mapping.header_for(&field.key).map(str::to_string);
                let column_index = session
                    .sheet()
                    .zip(header.as_deref())
                    .and_then(|(sheet, h)| sheet.column_index(h));
                let status = match (&header, column_index) {
                    (Some(_), Some(_)) => MappingStatus::Mapped,
                    (Some(_), None) => MappingStatus::Stale,
                    (None, _) => MappingStatus::Unmapped,
                };
                let sample_values = match (session.sheet(), column_index) {
                    (Some(sheet), Some(idx)) => sheet.sample_values(idx),
                    _ => Vec::new(),
                };
                MappingRow {
                    key: field.key.clone(),
                    label: field.label.clone(),
                    required: field.required,
                    header,
                    column_index,
                    sample_values,
                    status,
                }
            })
            .collect();

        MappingTableResponse {
            rows,
            missing_labels: session.missing_required_labels(),
            warnings: session.warnings().to_vec(),
        }
    }
}

fn parse_import_type(raw: &str) -> ApiResult<ImportType> {
    raw.parse::<ImportType>()
        .map_err(|e| ApiError::from(ImportError::UnknownImportType(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigManager;

    #[test]
    fn test_list_import_types_covers_all() {
        let types = ImportApi::list_import_types();
        assert_eq!(types.len(), 7);
        let fruit = types
            .iter()
            .find(|t| t.import_type == ImportType::FruitReceptions)
            .unwrap();
        assert!(fruit.has_dynamic_fields);
    }

    #[test]
    fn test_unknown_import_type_is_invalid_input() {
        let err = ImportApi::new("pedidos", &ConfigManager::new()).err().unwrap();
        assert_eq!(err.code(), "INVALID_INPUT");
    }

    #[test]
    fn test_template_csv() {
        let csv = ImportApi::template_csv("warehouses").unwrap();
        assert_eq!(csv.trim_end(), "Código,Nombre,Dirección,Ciudad,Responsable,Capacidad");
    }

    #[test]
    fn test_validate_without_file() {
        let api = ImportApi::new("products", &ConfigManager::new()).unwrap();
        let response = api.validate();
        assert!(!response.valid);
        assert_eq!(response.missing_labels, vec!["SKU", "Nombre"]);
    }
}
