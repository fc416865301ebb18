// ==========================================
// 仓储管理系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 来源优先级: 环境变量 WAREHOUSE_IMPORT_<KEY> > JSON 配置文件 > 内置默认值
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::DEFAULT_EXTENSIONS;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "WAREHOUSE_IMPORT_";

/// 默认值
pub const DEFAULT_PREVIEW_ROW_LIMIT: usize = 5;
pub const DEFAULT_MAX_FILE_BYTES: usize = 10 * 1024 * 1024;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Default)]
pub struct ConfigManager {
    values: RwLock<HashMap<String, String>>,
}

impl ConfigManager {
    /// 创建仅含默认值的 ConfigManager
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 JSON 文件加载（顶层对象，值可为字符串/数字/布尔/字符串数组）
    ///
    /// # 返回
    /// - Err(ConfigReadError): 文件无法读取或不是 JSON 对象
    pub fn from_json_file(path: impl AsRef<Path>) -> ImportResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ImportError::ConfigReadError {
            key: path.display().to_string(),
            message: e.to_string(),
        })?;
        let manager = Self::from_json_str(&raw).map_err(|e| match e {
            ImportError::ConfigReadError { message, .. } => ImportError::ConfigReadError {
                key: path.display().to_string(),
                message,
            },
            other => other,
        })?;

        tracing::info!(path = %path.display(), "配置文件已加载");
        Ok(manager)
    }

    /// 从 JSON 文本加载
    pub fn from_json_str(raw: &str) -> ImportResult<Self> {
        let value: Value = serde_json::from_str(raw).map_err(|e| ImportError::ConfigReadError {
            key: "<json>".to_string(),
            message: e.to_string(),
        })?;
        let Value::Object(object) = value else {
            return Err(ImportError::ConfigReadError {
                key: "<json>".to_string(),
                message: "顶层必须是对象".to_string(),
            });
        };

        let values = object
            .into_iter()
            .map(|(key, v)| (key, json_value_to_string(v)))
            .collect();
        Ok(Self {
            values: RwLock::new(values),
        })
    }

    /// 加载默认位置的配置文件（不存在时使用默认值），再叠加环境变量
    pub fn load_default() -> ImportResult<Self> {
        let manager = match default_config_path() {
            Some(path) if path.exists() => Self::from_json_file(&path)?,
            _ => Self::new(),
        };
        manager.apply_env_overrides(std::env::vars())?;
        Ok(manager)
    }

    /// 用环境变量覆写: WAREHOUSE_IMPORT_PREVIEW_ROW_LIMIT → preview_row_limit
    ///
    /// # 返回
    /// - 被覆写的配置项数量
    pub fn apply_env_overrides(
        &self,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> ImportResult<usize> {
        let mut count = 0;
        for (name, value) in vars {
            if let Some(key) = name.strip_prefix(ENV_PREFIX) {
                self.set(&key.to_lowercase(), value)?;
                count += 1;
            }
        }
        if count > 0 {
            tracing::debug!(count, "环境变量覆写配置");
        }
        Ok(count)
    }

    /// 写入单个配置值
    pub fn set(&self, key: &str, value: impl Into<String>) -> ImportResult<()> {
        let mut values = self.values.write().map_err(|e| ImportError::ConfigReadError {
            key: key.to_string(),
            message: format!("锁获取失败: {}", e),
        })?;
        values.insert(key.to_string(), value.into());
        Ok(())
    }

    /// 读取配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> ImportResult<Option<String>> {
        let values = self.values.read().map_err(|e| ImportError::ConfigReadError {
            key: key.to_string(),
            message: format!("锁获取失败: {}", e),
        })?;
        Ok(values.get(key).cloned())
    }

    /// 读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> ImportResult<String> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 获取所有配置的快照（JSON 格式，按 key 排序）
    pub fn get_config_snapshot(&self) -> ImportResult<String> {
        let values = self.values.read().map_err(|e| ImportError::ConfigReadError {
            key: "<snapshot>".to_string(),
            message: format!("锁获取失败: {}", e),
        })?;
        let sorted: std::collections::BTreeMap<_, _> = values.iter().collect();
        serde_json::to_string(&sorted).map_err(|e| ImportError::InternalError(e.to_string()))
    }
}

fn json_value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Array(items) => items
            .into_iter()
            .map(json_value_to_string)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

/// 默认配置文件位置: <用户配置目录>/warehouse-import/config.json
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("warehouse-import").join("config.json"))
}

// ==========================================
// ImportConfigReader Trait 实现
// ==========================================
impl ImportConfigReader for ConfigManager {
    // ===== 解析配置 =====

    fn get_preview_row_limit(&self) -> ImportResult<usize> {
        let default = DEFAULT_PREVIEW_ROW_LIMIT.to_string();
        let value = self.get_config_or_default(config_keys::PREVIEW_ROW_LIMIT, &default)?;
        Ok(value.trim().parse::<usize>().unwrap_or_else(|_| {
            tracing::warn!(
                config_key = config_keys::PREVIEW_ROW_LIMIT,
                raw_value = %value,
                "预览行数配置格式错误，使用默认值"
            );
            DEFAULT_PREVIEW_ROW_LIMIT
        }))
    }

    fn get_max_file_bytes(&self) -> ImportResult<usize> {
        let default = DEFAULT_MAX_FILE_BYTES.to_string();
        let value = self.get_config_or_default(config_keys::MAX_FILE_BYTES, &default)?;
        match value.trim().parse::<usize>() {
            Ok(limit) if limit > 0 => Ok(limit),
            _ => {
                tracing::warn!(
                    config_key = config_keys::MAX_FILE_BYTES,
                    raw_value = %value,
                    "文件大小上限配置格式错误，使用默认值"
                );
                Ok(DEFAULT_MAX_FILE_BYTES)
            }
        }
    }

    fn get_allowed_extensions(&self) -> ImportResult<Vec<String>> {
        let default = DEFAULT_EXTENSIONS.join(",");
        let value = self.get_config_or_default(config_keys::ALLOWED_EXTENSIONS, &default)?;

        let extensions: Vec<String> = value
            .split(',')
            .map(|s| s.trim().trim_start_matches('.').to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        if extensions.is_empty() {
            Ok(DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect())
        } else {
            Ok(extensions)
        }
    }

    // ===== 映射配置 =====

    fn get_auto_map_enabled(&self) -> ImportResult<bool> {
        let value = self.get_config_or_default(config_keys::AUTO_MAP_ENABLED, "true")?;
        match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => {
                tracing::warn!(
                    config_key = config_keys::AUTO_MAP_ENABLED,
                    raw_value = %value,
                    "自动映射开关配置格式错误，使用默认值"
                );
                Ok(true)
            }
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 解析
    pub const PREVIEW_ROW_LIMIT: &str = "preview_row_limit";
    pub const MAX_FILE_BYTES: &str = "max_file_bytes";
    pub const ALLOWED_EXTENSIONS: &str = "allowed_extensions";

    // 映射
    pub const AUTO_MAP_ENABLED: &str = "auto_map_enabled";
}
