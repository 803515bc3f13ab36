// ==========================================
// 物料标签打印系统 - 字段映射器
// ==========================================
// 职责: 原始行（中文表头） → ImportRow
// 约束: 缺失表头 → 字段缺失；空单元格 → 字段缺失
// ==========================================

use crate::domain::material::{normalize_optional, ImportRow};
use crate::importer::file_parser::RawRecord;
use std::collections::HashMap;

// 导入模板表头
pub const HEADER_BUCKET_CODE: &str = "料桶码";
pub const HEADER_BATCH_NUMBER: &str = "料品批次";
pub const HEADER_PALLET_CODE: &str = "托盘码";
pub const HEADER_ITEM_CODE: &str = "料品编码";
pub const HEADER_SPECIFICATION: &str = "规格型号";
pub const HEADER_BATCH_RULE: &str = "料品批次编码规则";

/// 导入模板列（固定顺序）
pub const IMPORT_HEADERS: [&str; 6] = [
    HEADER_BUCKET_CODE,
    HEADER_BATCH_NUMBER,
    HEADER_PALLET_CODE,
    HEADER_ITEM_CODE,
    HEADER_SPECIFICATION,
    HEADER_BATCH_RULE,
];

pub struct FieldMapper;

impl FieldMapper {
    pub fn map_to_import_row(&self, record: &RawRecord) -> ImportRow {
        let row = &record.cells;
        ImportRow {
            bucket_code: self.get_string(row, HEADER_BUCKET_CODE),
            batch_number: self.get_string(row, HEADER_BATCH_NUMBER),
            pallet_code: self.get_string(row, HEADER_PALLET_CODE),
            item_code: self.get_string(row, HEADER_ITEM_CODE),
            specification: self.get_string(row, HEADER_SPECIFICATION),
            batch_rule: self.get_string(row, HEADER_BATCH_RULE),
            row_number: record.row_number,
        }
    }

    pub fn map_all(&self, records: &[RawRecord]) -> Vec<ImportRow> {
        records.iter().map(|r| self.map_to_import_row(r)).collect()
    }

    /// 提取字符串字段，支持导出文件中的列名（别名）
    fn get_string(&self, row: &HashMap<String, String>, key: &str) -> Option<String> {
        let aliases: &[&str] = match key {
            HEADER_BATCH_NUMBER => &["来料批次"],
            HEADER_ITEM_CODE => &["物料编号"],
            _ => &[],
        };

        std::iter::once(key)
            .chain(aliases.iter().copied())
            .find_map(|alias| normalize_optional(row.get(alias).cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> RawRecord {
        RawRecord {
            row_number: 2,
            cells: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_maps_template_headers() {
        let row = FieldMapper.map_to_import_row(&record(&[
            ("料桶码", "B1"),
            ("料品批次", "L1"),
            ("料品编码", "I1"),
            ("规格型号", ""),
        ]));

        assert_eq!(row.bucket_code.as_deref(), Some("B1"));
        assert_eq!(row.batch_number.as_deref(), Some("L1"));
        assert_eq!(row.item_code.as_deref(), Some("I1"));
        assert_eq!(row.specification, None);
        assert_eq!(row.pallet_code, None);
        assert_eq!(row.row_number, 2);
    }

    #[test]
    fn test_export_headers_are_accepted() {
        let row = FieldMapper.map_to_import_row(&record(&[("来料批次", "L9"), ("物料编号", "I9")]));

        assert_eq!(row.batch_number.as_deref(), Some("L9"));
        assert_eq!(row.item_code.as_deref(), Some("I9"));
    }

    #[test]
    fn test_unrecognized_headers_yield_empty_row() {
        let row = FieldMapper.map_to_import_row(&record(&[("备注", "x")]));

        assert_eq!(
            row,
            ImportRow {
                row_number: 2,
                ..ImportRow::default()
            }
        );
    }
}
