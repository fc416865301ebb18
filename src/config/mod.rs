// ==========================================
// 仓储管理系统 - 配置层
// ==========================================
// 职责: 导入配置读取，支持文件与环境变量覆写
// 存储: 内存键值（JSON 文件 / WAREHOUSE_IMPORT_* 环境变量）
// ==========================================

pub mod config_manager;
pub mod import_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, default_config_path, ConfigManager};
pub use import_config_trait::ImportConfigReader;
