// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: 验证配置文件加载、环境变量覆写与会话读取配置
// ==========================================

mod test_helpers;

use std::io::Write;
use tempfile::NamedTempFile;
use test_helpers::csv_file;
use warehouse_import::config::{config_keys, default_config_path, ConfigManager, ImportConfigReader};
use warehouse_import::{ImportError, ImportType, UploadSession};

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("创建临时文件失败");
    file.write_all(content.as_bytes()).expect("写入配置失败");
    file
}

#[test]
fn test_load_config_from_json_file() {
    let file = write_config(
        r#"{
            "preview_row_limit": 2,
            "max_file_bytes": "2048",
            "allowed_extensions": ["csv"],
            "auto_map_enabled": "false"
        }"#,
    );

    let config = ConfigManager::from_json_file(file.path()).unwrap();

    assert_eq!(config.get_preview_row_limit().unwrap(), 2);
    assert_eq!(config.get_max_file_bytes().unwrap(), 2048);
    assert_eq!(config.get_allowed_extensions().unwrap(), vec!["csv"]);
    assert!(!config.get_auto_map_enabled().unwrap());
}

#[test]
fn test_missing_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ConfigManager::from_json_file(dir.path().join("no-existe.json")).unwrap_err();
    assert!(matches!(err, ImportError::ConfigReadError { .. }));
}

#[test]
fn test_invalid_json_is_config_error() {
    let file = write_config("{ preview_row_limit: 2 ");
    let err = ConfigManager::from_json_file(file.path()).unwrap_err();
    match err {
        ImportError::ConfigReadError { key, .. } => {
            assert_eq!(key, file.path().display().to_string());
        }
        other => panic!("意外的错误: {:?}", other),
    }
}

#[test]
fn test_env_overrides_file_values() {
    let file = write_config(r#"{ "preview_row_limit": 2 }"#);
    let config = ConfigManager::from_json_file(file.path()).unwrap();

    config
        .apply_env_overrides(vec![(
            "WAREHOUSE_IMPORT_PREVIEW_ROW_LIMIT".to_string(),
            "7".to_string(),
        )])
        .unwrap();

    assert_eq!(config.get_preview_row_limit().unwrap(), 7);
    assert_eq!(
        config.get_config_value(config_keys::PREVIEW_ROW_LIMIT).unwrap(),
        Some("7".to_string())
    );
}

#[test]
fn test_default_config_path_location() {
    if let Some(path) = default_config_path() {
        assert!(path.ends_with("warehouse-import/config.json"));
    }
}

#[test]
fn test_session_uses_configured_limits() {
    let config = ConfigManager::new();
    config.set(config_keys::PREVIEW_ROW_LIMIT, "1").unwrap();
    config.set(config_keys::ALLOWED_EXTENSIONS, "csv").unwrap();
    config.set(config_keys::AUTO_MAP_ENABLED, "no").unwrap();

    let mut session = UploadSession::new(ImportType::Products, &config).unwrap();
    session
        .select_file(csv_file("p.csv", "SKU,Nombre\nA1,Manzana\nA2,Pera\n"))
        .unwrap();

    assert_eq!(session.sheet().unwrap().preview_rows.len(), 1);
    assert!(session.mapping().is_empty());

    let err = session
        .select_file(csv_file("p.xlsx", "SKU,Nombre\n"))
        .unwrap_err();
    assert!(matches!(
        err,
        ImportError::UnsupportedFormat(ref ext, ref allowed) if ext == "xlsx" && allowed == "csv"
    ));
}

#[test]
fn test_load_default_applies_env_overrides() {
    std::env::set_var("WAREHOUSE_IMPORT_MAX_FILE_BYTES", "4096");

    let config = ConfigManager::load_default().unwrap();

    assert_eq!(config.get_max_file_bytes().unwrap(), 4096);
    std::env::remove_var("WAREHOUSE_IMPORT_MAX_FILE_BYTES");
}
