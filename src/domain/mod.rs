// ==========================================
// 物料标签打印系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑
// ==========================================

pub mod material;
pub mod printer;
pub mod types;

// 重导出核心类型
pub use material::{
    generate_material_code, ImportRow, Material, MaterialPage, MaterialPatch, NewMaterial,
};
pub use printer::{NewPrinterConfig, PrinterConfig, PrinterConfigPatch, PrinterEndpoint};
pub use types::{ItemStatus, LockKind};
