// ==========================================
// 物料标签打印系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite + ZPL
// 系统定位: 物料导入/维护 + 网络标签打印
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入导出层 - 表格文件
pub mod importer;

// 标签层 - ZPL 生成
pub mod label;

// 打印层 - 打印机投递
pub mod printer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域
pub use domain::{
    ImportRow, ItemStatus, LockKind, Material, MaterialPatch, NewMaterial, NewPrinterConfig,
    PrinterConfig, PrinterConfigPatch, PrinterEndpoint,
};

// 标签与打印
pub use label::{LabelGenerator, LabelLayout};
pub use printer::{BatchPrintReport, DispatchError, PrintDispatcher, PrintTransport};

// API
pub use api::{ApiError, ApiResult, ConfigApi, ImportApi, MaterialApi, PrintApi, PrinterConfigApi};

// 应用
pub use app::{AppState, Notice, ViewState};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "物料标签打印系统";
