// ==========================================
// 仓储管理系统 - 上传会话状态机
// ==========================================
// 状态: Idle → FileSelected → Mapping → Validating → Submitting → Completed | Failed
// 职责: 串联工作簿加载、动态字段发现、自动映射、映射校验与提交
// 约束: 会话由单个用户流程独占；每个操作要么完整生效，要么不改变状态
// ==========================================

use crate::app::backend::ImportBackend;
use crate::config::import_config_trait::ImportConfigReader;
use crate::domain::field::ImportTypeSchema;
use crate::domain::mapping::{ColumnMapping, ColumnTarget, MappingWarning};
use crate::domain::sheet::{ParsedSheet, WorkbookState};
use crate::domain::submission::{ImportOutcome, SubmissionBundle, UploadedFile};
use crate::domain::types::{ImportType, UploadStep};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_discovery::{discover_material_columns, extend_schema};
use crate::importer::field_mapper::{
    apply_override, duplicate_header_warnings, revalidate_mapping, AutoMapper,
};
use crate::importer::import_trait::{FieldMapper, FileParser};
use crate::importer::mapping_validator::MappingValidator;
use crate::importer::schema_registry::static_schema;
use crate::importer::workbook::WorkbookLoader;
use std::sync::Arc;
use uuid::Uuid;

pub struct UploadSession {
    session_id: Uuid,
    import_type: ImportType,
    step: UploadStep,
    workbook: Option<WorkbookState>,
    sheet: Option<ParsedSheet>,
    schema: ImportTypeSchema,
    mapping: ColumnMapping,
    warnings: Vec<MappingWarning>,
    last_outcome: Option<ImportOutcome>,
    last_error: Option<String>,
    loader: WorkbookLoader,
    mapper: Arc<dyn FieldMapper>,
    auto_map_enabled: bool,
}

impl UploadSession {
    /// 按配置创建会话
    pub fn new(import_type: ImportType, config: &dyn ImportConfigReader) -> ImportResult<Self> {
        let loader = WorkbookLoader::with_extensions(
            config.get_allowed_extensions()?,
            config.get_preview_row_limit()?,
            config.get_max_file_bytes()?,
        );
        Ok(Self::with_loader(
            import_type,
            loader,
            config.get_auto_map_enabled()?,
        ))
    }

    /// 使用自定义解析器（其余配置照常读取）
    pub fn with_parser(
        import_type: ImportType,
        parser: Arc<dyn FileParser>,
        config: &dyn ImportConfigReader,
    ) -> ImportResult<Self> {
        let loader = WorkbookLoader::new(
            parser,
            config.get_preview_row_limit()?,
            config.get_max_file_bytes()?,
        );
        Ok(Self::with_loader(
            import_type,
            loader,
            config.get_auto_map_enabled()?,
        ))
    }

    pub fn with_loader(
        import_type: ImportType,
        loader: WorkbookLoader,
        auto_map_enabled: bool,
    ) -> Self {
        let session = Self {
            session_id: Uuid::new_v4(),
            import_type,
            step: UploadStep::Idle,
            workbook: None,
            sheet: None,
            schema: static_schema(import_type),
            mapping: ColumnMapping::new(),
            warnings: Vec::new(),
            last_outcome: None,
            last_error: None,
            loader,
            mapper: Arc::new(AutoMapper),
            auto_map_enabled,
        };
        tracing::info!(
            session_id = %session.session_id,
            import_type = %import_type,
            "上传会话已创建"
        );
        session
    }

    /// 替换自动映射实现（默认 AutoMapper）
    pub fn with_mapper(mut self, mapper: Arc<dyn FieldMapper>) -> Self {
        self.mapper = mapper;
        self
    }

    // ==========================================
    // 查询
    // ==========================================

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn import_type(&self) -> ImportType {
        self.import_type
    }

    pub fn step(&self) -> UploadStep {
        self.step
    }

    pub fn workbook(&self) -> Option<&WorkbookState> {
        self.workbook.as_ref()
    }

    pub fn sheet(&self) -> Option<&ParsedSheet> {
        self.sheet.as_ref()
    }

    pub fn sheet_names(&self) -> &[String] {
        self.workbook
            .as_ref()
            .map(|w| w.sheet_names.as_slice())
            .unwrap_or(&[])
    }

    pub fn selected_sheet(&self) -> Option<&str> {
        self.workbook.as_ref().map(|w| w.selected_sheet.as_str())
    }

    pub fn headers(&self) -> &[String] {
        self.sheet.as_ref().map(|s| s.headers()).unwrap_or(&[])
    }

    pub fn schema(&self) -> &ImportTypeSchema {
        &self.schema
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    pub fn warnings(&self) -> &[MappingWarning] {
        &self.warnings
    }

    pub fn last_outcome(&self) -> Option<&ImportOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // ==========================================
    // 状态转换
    // ==========================================

    fn ensure_step(&self, allowed: &[UploadStep], to: UploadStep) -> ImportResult<()> {
        if allowed.contains(&self.step) {
            return Ok(());
        }
        tracing::warn!(
            session_id = %self.session_id,
            from = %self.step,
            to = %to,
            "拒绝无效的状态转换"
        );
        Err(ImportError::InvalidStateTransition {
            from: self.step.to_string(),
            to: to.to_string(),
        })
    }

    fn transition(&mut self, to: UploadStep) {
        if self.step != to {
            tracing::debug!(
                session_id = %self.session_id,
                from = %self.step,
                to = %to,
                "状态转换"
            );
        }
        self.step = to;
    }

    /// 字段表 + 动态发现告警 + 重复表头告警
    fn build_schema(&self, sheet: &ParsedSheet) -> (ImportTypeSchema, Vec<MappingWarning>) {
        let base = static_schema(self.import_type);
        let mut warnings = Vec::new();

        let schema = if self.import_type.has_dynamic_fields() {
            let discovery = discover_material_columns(sheet.headers());
            warnings.extend(discovery.warnings);
            extend_schema(base, discovery.fields.into_iter().map(|f| f.spec).collect())
        } else {
            base
        };

        warnings.extend(duplicate_header_warnings(sheet));
        (schema, warnings)
    }

    fn run_auto_map(&mut self) {
        if !self.auto_map_enabled {
            return;
        }
        let Some(sheet) = self.sheet.as_ref() else {
            return;
        };
        self.mapper.auto_map(&self.schema, sheet.headers(), &mut self.mapping);
    }

    fn clear_workbook(&mut self) {
        self.workbook = None;
        self.sheet = None;
        self.mapping.clear();
        self.warnings.clear();
        self.last_outcome = None;
        self.last_error = None;
        self.schema = static_schema(self.import_type);
    }

    fn prepare_file_selection(&mut self) -> ImportResult<()> {
        self.ensure_step(
            &[UploadStep::Idle, UploadStep::FileSelected, UploadStep::Mapping],
            UploadStep::FileSelected,
        )?;
        self.clear_workbook();
        self.transition(UploadStep::FileSelected);
        Ok(())
    }

    fn finish_file_selection(
        &mut self,
        loaded: ImportResult<(WorkbookState, ParsedSheet)>,
    ) -> ImportResult<()> {
        let (workbook, sheet) = match loaded {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(
                    session_id = %self.session_id,
                    error = %e,
                    "文件解析失败，需重新选择文件"
                );
                self.last_error = Some(e.to_string());
                return Err(e);
            }
        };

        let (schema, warnings) = self.build_schema(&sheet);
        self.schema = schema;
        self.warnings = warnings;
        self.workbook = Some(workbook);
        self.sheet = Some(sheet);
        self.run_auto_map();
        self.transition(UploadStep::Mapping);

        tracing::info!(
            session_id = %self.session_id,
            import_type = %self.import_type,
            sheet = self.selected_sheet().unwrap_or_default(),
            fields = self.schema.len(),
            mapped = self.mapping.len(),
            warnings = self.warnings.len(),
            "文件已载入，进入映射"
        );
        Ok(())
    }

    /// 选择文件（同步解析）
    ///
    /// # 错误
    /// - 文件级错误: 停留在 FileSelected，无工作表
    pub fn select_file(&mut self, file: UploadedFile) -> ImportResult<()> {
        self.prepare_file_selection()?;
        let loaded = self.loader.load(file);
        self.finish_file_selection(loaded)
    }

    /// 选择文件（在阻塞线程池中解析，不占用调用方线程）
    pub async fn select_file_async(&mut self, file: UploadedFile) -> ImportResult<()> {
        self.prepare_file_selection()?;
        let loader = self.loader.clone();
        let loaded = tokio::task::spawn_blocking(move || loader.load(file))
            .await
            .map_err(|e| ImportError::InternalError(format!("解析任务异常: {}", e)))
            .and_then(|result| result);
        self.finish_file_selection(loaded)
    }

    /// 切换工作表；保留仍然有效的映射条目
    ///
    /// 失败时会话保持原工作表不变
    pub fn select_sheet(&mut self, sheet_name: &str) -> ImportResult<()> {
        self.ensure_step(&[UploadStep::Mapping], UploadStep::Mapping)?;
        let workbook = self
            .workbook
            .as_ref()
            .ok_or_else(|| ImportError::InternalError("映射阶段缺少工作簿".to_string()))?;

        let sheet = self.loader.load_sheet(workbook, sheet_name)?;

        let (schema, mut warnings) = self.build_schema(&sheet);
        let mut mapping = self.mapping.clone();
        warnings.extend(revalidate_mapping(&schema, sheet.headers(), &mut mapping));

        self.schema = schema;
        self.mapping = mapping;
        self.warnings = warnings;
        self.sheet = Some(sheet);
        if let Some(workbook) = self.workbook.as_mut() {
            workbook.selected_sheet = sheet_name.to_string();
        }
        self.run_auto_map();

        tracing::info!(
            session_id = %self.session_id,
            sheet = sheet_name,
            mapped = self.mapping.len(),
            warnings = self.warnings.len(),
            "工作表已切换"
        );
        Ok(())
    }

    /// 切换导入类型；映射清空后按新字段表重新自动映射
    pub fn set_import_type(&mut self, import_type: ImportType) -> ImportResult<()> {
        self.ensure_step(
            &[UploadStep::Idle, UploadStep::FileSelected, UploadStep::Mapping],
            self.step,
        )?;
        self.import_type = import_type;
        self.mapping.clear();

        match self.sheet.take() {
            Some(sheet) => {
                let (schema, warnings) = self.build_schema(&sheet);
                self.schema = schema;
                self.warnings = warnings;
                self.sheet = Some(sheet);
                self.run_auto_map();
            }
            None => {
                self.schema = static_schema(import_type);
                self.warnings.clear();
            }
        }

        tracing::info!(
            session_id = %self.session_id,
            import_type = %import_type,
            mapped = self.mapping.len(),
            "导入类型已切换"
        );
        Ok(())
    }

    /// 手工设置单个字段映射
    pub fn set_mapping(&mut self, field_key: &str, target: ColumnTarget) -> ImportResult<()> {
        self.ensure_step(&[UploadStep::Mapping], UploadStep::Mapping)?;
        let headers = self.sheet.as_ref().map(|s| s.headers()).unwrap_or(&[]);
        apply_override(&self.schema, headers, &mut self.mapping, field_key, target)
    }

    /// 清空全部映射（不会自动重新映射）
    pub fn clear_mapping(&mut self) -> ImportResult<()> {
        self.ensure_step(&[UploadStep::Mapping], UploadStep::Mapping)?;
        self.mapping.clear();
        tracing::debug!(session_id = %self.session_id, "映射已清空");
        Ok(())
    }

    // ==========================================
    // 校验与提交
    // ==========================================

    /// 校验必填字段（纯读取）
    pub fn validate(&self) -> ImportResult<()> {
        MappingValidator::validate(&self.schema, self.headers(), &self.mapping)
    }

    /// 缺失的必填字段展示名（按字段表顺序）
    pub fn missing_required_labels(&self) -> Vec<String> {
        MappingValidator::missing_required(&self.schema, self.headers(), &self.mapping)
            .into_iter()
            .map(|f| f.label.clone())
            .collect()
    }

    /// 组装提交包（纯读取，不改变会话状态）
    pub fn prepare_submission(&self) -> ImportResult<SubmissionBundle> {
        let (Some(workbook), Some(sheet)) = (self.workbook.as_ref(), self.sheet.as_ref()) else {
            return Err(ImportError::InvalidStateTransition {
                from: self.step.to_string(),
                to: UploadStep::Submitting.to_string(),
            });
        };
        self.validate()?;

        // 只提交当前字段表中、且指向真实表头的条目
        let mapping = self
            .mapping
            .to_submission_map()
            .into_iter()
            .filter(|(key, header)| {
                self.schema.contains_key(key) && sheet.contains_header(header)
            })
            .collect();

        Ok(SubmissionBundle {
            session_id: self.session_id,
            import_type: self.import_type,
            sheet_name: sheet.sheet_name.clone(),
            mapping,
            file: workbook.file.clone(),
        })
    }

    /// 校验并提交
    ///
    /// # 状态
    /// - 校验失败: 回到 Mapping
    /// - 成功: Completed
    /// - BackendRejected: Failed → Idle（会话重置）
    /// - 其他错误: Failed → FileSelected（保留文件、工作表与映射，可 resume_mapping 后重试）
    pub async fn submit(&mut self, backend: &dyn ImportBackend) -> ImportResult<ImportOutcome> {
        self.ensure_step(&[UploadStep::Mapping], UploadStep::Validating)?;
        self.transition(UploadStep::Validating);

        let bundle = match self.prepare_submission() {
            Ok(bundle) => bundle,
            Err(e) => {
                self.transition(UploadStep::Mapping);
                return Err(e);
            }
        };

        self.transition(UploadStep::Submitting);
        tracing::info!(
            session_id = %self.session_id,
            import_type = %bundle.import_type,
            sheet = %bundle.sheet_name,
            mapped = bundle.mapping.len(),
            file_size = bundle.file.size(),
            "提交导入"
        );

        match backend.submit(&bundle).await {
            Ok(outcome) => {
                tracing::info!(
                    session_id = %self.session_id,
                    processed = outcome.processed,
                    success = outcome.success,
                    errors = outcome.errors.len(),
                    "导入完成"
                );
                self.last_outcome = Some(outcome.clone());
                self.last_error = None;
                self.transition(UploadStep::Completed);
                Ok(outcome)
            }
            Err(e) => {
                self.transition(UploadStep::Failed);
                tracing::error!(session_id = %self.session_id, error = %e, "导入失败");

                match e {
                    ImportError::BackendRejected(_) => self.reset(),
                    _ => self.transition(UploadStep::FileSelected),
                }
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// 提交失败后回到映射阶段
    pub fn resume_mapping(&mut self) -> ImportResult<()> {
        self.ensure_step(&[UploadStep::FileSelected], UploadStep::Mapping)?;
        if self.sheet.is_none() {
            return Err(ImportError::InvalidStateTransition {
                from: self.step.to_string(),
                to: UploadStep::Mapping.to_string(),
            });
        }
        self.transition(UploadStep::Mapping);
        Ok(())
    }

    /// 任意状态 → Idle，清空文件与映射（保留导入类型）
    pub fn reset(&mut self) {
        self.clear_workbook();
        self.transition(UploadStep::Idle);
        tracing::info!(session_id = %self.session_id, "上传会话已重置");
    }
}
