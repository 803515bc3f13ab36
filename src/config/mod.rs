// ==========================================
// 物料标签打印系统 - 配置层
// ==========================================
// 职责: 系统配置管理（打印节奏/超时/投递方式/分页/标签标题）
// 存储: config_kv 表
// ==========================================

pub mod config_manager;

// 重导出核心配置管理器
pub use config_manager::{config_keys, default_value, ConfigEntry, ConfigManager, TransportKind};
