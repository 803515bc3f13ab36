// ==========================================
// 物料标签打印系统 - 文件导出
// ==========================================
// 产物: 内存中的下载文件（无需服务端往返）
// - 物料数据导出 .xlsx（固定列序 + 日期文件名）
// - 物料导入模板 .xlsx
// - 批量 ZPL 文本 .zpl
// ==========================================

use crate::domain::material::Material;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::IMPORT_HEADERS;
use chrono::NaiveDate;
use rust_xlsxwriter::{Workbook, Worksheet};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const ZPL_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

pub const EXPORT_SHEET_NAME: &str = "物料数据";
pub const TEMPLATE_SHEET_NAME: &str = "物料数据模板";
pub const TEMPLATE_FILE_NAME: &str = "物料数据导入模板.xlsx";
pub const TEMPLATE_SAMPLE_BATCH_RULE: &str = "供应商字母编号+批次号+流水号";

/// 导出列（固定顺序）与列宽
pub const EXPORT_COLUMNS: [(&str, f64); 14] = [
    ("序号", 6.0),
    ("原材来料编号", 20.0),
    ("物料编号", 15.0),
    ("物料名称", 15.0),
    ("打印顺序", 10.0),
    ("规格型号", 15.0),
    ("托盘码", 20.0),
    ("料桶码", 20.0),
    ("料品状态", 10.0),
    ("来料批次", 15.0),
    ("供应商名", 15.0),
    ("料品批次编码规则", 30.0),
    ("批次锁定", 10.0),
    ("料桶锁定", 10.0),
];

const TEMPLATE_COLUMN_WIDTHS: [f64; 6] = [20.0, 15.0, 20.0, 15.0, 15.0, 30.0];

/// 下载文件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    /// 写入目录，返回完整路径
    pub fn save_to_dir<P: AsRef<Path>>(&self, dir: P) -> ImportResult<PathBuf> {
        let path = dir.as_ref().join(&self.filename);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("物料数据导出_{}.xlsx", date.format("%Y-%m-%d"))
}

pub fn zpl_file_name(date: NaiveDate) -> String {
    format!("标签打印_{}.zpl", date.format("%Y-%m-%d"))
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "是"
    } else {
        "否"
    }
}

fn write_headers(worksheet: &mut Worksheet, headers: &[&str]) -> ImportResult<()> {
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }
    Ok(())
}

/// 物料数据导出为 Excel
pub fn export_materials(materials: &[Material], date: NaiveDate) -> ImportResult<ExportFile> {
    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();
    worksheet.set_name(EXPORT_SHEET_NAME)?;

    let headers: Vec<&str> = EXPORT_COLUMNS.iter().map(|(h, _)| *h).collect();
    write_headers(&mut worksheet, &headers)?;
    for (col, (_, width)) in EXPORT_COLUMNS.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width)?;
    }

    for (idx, m) in materials.iter().enumerate() {
        let row = idx as u32 + 1;
        let text = |v: &Option<String>| v.clone().unwrap_or_default();

        worksheet.write_number(row, 0, (idx + 1) as f64)?;
        worksheet.write_string(row, 1, &m.material_code)?;
        worksheet.write_string(row, 2, &text(&m.item_code))?;
        worksheet.write_string(row, 3, &text(&m.item_name))?;
        // 打印顺序为 0 时留空
        if m.print_order != 0 {
            worksheet.write_number(row, 4, m.print_order as f64)?;
        }
        worksheet.write_string(row, 5, &text(&m.specification))?;
        worksheet.write_string(row, 6, &text(&m.pallet_code))?;
        worksheet.write_string(row, 7, &text(&m.bucket_code))?;
        worksheet.write_string(row, 8, m.item_status.as_str())?;
        worksheet.write_string(row, 9, &text(&m.batch_number))?;
        worksheet.write_string(row, 10, &text(&m.supplier_name))?;
        worksheet.write_string(row, 11, &text(&m.batch_rule))?;
        worksheet.write_string(row, 12, yes_no(m.is_batch_locked))?;
        worksheet.write_string(row, 13, yes_no(m.is_bucket_locked))?;
    }

    workbook.push_worksheet(worksheet);
    let bytes = workbook.save_to_buffer()?;

    Ok(ExportFile {
        filename: export_file_name(date),
        content_type: XLSX_CONTENT_TYPE.to_string(),
        bytes,
    })
}

/// 导入模板（表头 + 一行示例）
pub fn import_template() -> ImportResult<ExportFile> {
    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();
    worksheet.set_name(TEMPLATE_SHEET_NAME)?;

    write_headers(&mut worksheet, &IMPORT_HEADERS)?;
    for (col, width) in TEMPLATE_COLUMN_WIDTHS.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width)?;
    }
    worksheet.write_string(1, (IMPORT_HEADERS.len() - 1) as u16, TEMPLATE_SAMPLE_BATCH_RULE)?;

    workbook.push_worksheet(worksheet);
    let bytes = workbook.save_to_buffer()?;

    Ok(ExportFile {
        filename: TEMPLATE_FILE_NAME.to_string(),
        content_type: XLSX_CONTENT_TYPE.to_string(),
        bytes,
    })
}

/// 批量 ZPL 文本下载
pub fn zpl_download(documents: String, date: NaiveDate) -> ExportFile {
    ExportFile {
        filename: zpl_file_name(date),
        content_type: ZPL_CONTENT_TYPE.to_string(),
        bytes: documents.into_bytes(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(export_file_name(date), "物料数据导出_2024-03-09.xlsx");
        assert_eq!(zpl_file_name(date), "标签打印_2024-03-09.zpl");
    }

    #[test]
    fn test_export_produces_xlsx_bytes() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let file = export_materials(&[], date).unwrap();

        assert_eq!(file.content_type, XLSX_CONTENT_TYPE);
        // xlsx 为 zip 容器
        assert!(file.bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_template_file() {
        let file = import_template().unwrap();
        assert_eq!(file.filename, "物料数据导入模板.xlsx");
        assert!(file.bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_zpl_download() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let file = zpl_download("^XA\n^XZ\n\n".to_string(), date);
        assert_eq!(file.bytes, b"^XA\n^XZ\n\n".to_vec());
        assert_eq!(file.content_type, ZPL_CONTENT_TYPE);
    }
}
