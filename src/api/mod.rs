// ==========================================
// 物料标签打印系统 - API 层
// ==========================================
// 职责: 对外业务接口，校验输入并统一错误类型
// 红线: API 层不直接操作 SQL
// ==========================================

pub mod config_api;
pub mod error;
pub mod import_api;
pub mod material_api;
pub mod print_api;
pub mod printer_config_api;
pub mod validator;

pub use config_api::ConfigApi;
pub use error::{ApiError, ApiResult, FieldViolation};
pub use import_api::ImportApi;
pub use material_api::{MaterialApi, MaterialEditForm};
pub use print_api::PrintApi;
pub use printer_config_api::PrinterConfigApi;
