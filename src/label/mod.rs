// ==========================================
// 物料标签打印系统 - 标签层
// ==========================================
// 职责: 物料 → 打印机指令文档（ZPL）
// ==========================================

pub mod generator;
pub mod layout;
pub mod zpl;

pub use generator::{label_fields, qr_payload, LabelField, LabelGenerator, LabelPreview};
pub use layout::{FieldSlot, LabelLayout};
pub use zpl::ZplBuilder;
