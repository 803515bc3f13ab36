// ==========================================
// 物料标签打印系统 - 表格桥接层
// ==========================================
// 职责: 表格文件 ⇄ 物料记录
// 导入: 解析 → 映射 → 转换 → 落库
// 导出: Excel / 导入模板 / ZPL 文本
// ==========================================

pub mod error;
pub mod exporter;
pub mod field_mapper;
pub mod file_parser;
pub mod material_importer;

pub use error::{ImportError, ImportResult};
pub use exporter::{export_materials, import_template, zpl_download, ExportFile};
pub use field_mapper::{FieldMapper, IMPORT_HEADERS};
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRecord, UniversalFileParser};
pub use material_importer::{read_import_rows, rows_to_new_materials, ImportSummary, MaterialImporter};
