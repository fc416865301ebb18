// ==========================================
// 仓储管理系统 - 导入配置读取 Trait
// ==========================================
// 职责: 定义上传会话所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::importer::error::ImportResult;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 上传会话创建时读取一次
// 实现者: ConfigManager（内存键值 + JSON 文件 + 环境变量覆写）
pub trait ImportConfigReader: Send + Sync {
    // ===== 解析配置 =====

    /// 获取预览行数上限（表头之后）
    ///
    /// # 默认值
    /// - 5
    fn get_preview_row_limit(&self) -> ImportResult<usize>;

    /// 获取上传文件大小上限（字节）
    ///
    /// # 默认值
    /// - 10 MiB
    ///
    /// # 用途
    /// - 超限文件在解码前即被拒绝（FileTooLarge）
    fn get_max_file_bytes(&self) -> ImportResult<usize>;

    /// 获取允许的文件扩展名（小写、不含点）
    ///
    /// # 默认值
    /// - ["xlsx", "xls", "csv"]
    fn get_allowed_extensions(&self) -> ImportResult<Vec<String>>;

    // ===== 映射配置 =====

    /// 是否在加载工作表后自动映射
    ///
    /// # 默认值
    /// - true
    fn get_auto_map_enabled(&self) -> ImportResult<bool>;
}
