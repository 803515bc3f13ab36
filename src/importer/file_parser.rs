// ==========================================
// 物料标签打印系统 - 文件解析器
// ==========================================
// 阶段: 文件读取 → 原始行（表头 → 单元格文本）
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 约束: 只读第一个工作表；首行为表头；完全空白的行跳过
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// 原始行
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    /// 表格中的行号（表头为第 1 行）
    pub row_number: usize,
    /// 表头 → 单元格文本（已 trim）
    pub cells: HashMap<String, String>,
}

impl RawRecord {
    fn is_blank(&self) -> bool {
        self.cells.values().all(|v| v.is_empty())
    }
}

/// 文件解析接口
pub trait FileParser: Send + Sync {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>>;
}

/// 表头 + 数据行 → 原始行
fn collect_records<I, R>(headers: &[String], rows: I) -> Vec<RawRecord>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = String>,
{
    let mut records = Vec::new();
    for (idx, row) in rows.into_iter().enumerate() {
        let mut record = RawRecord {
            row_number: idx + 2,
            cells: HashMap::new(),
        };

        for (col_idx, value) in row.into_iter().enumerate() {
            match headers.get(col_idx) {
                Some(header) if !header.is_empty() => {
                    record.cells.insert(header.clone(), value.trim().to_string());
                }
                _ => {}
            }
        }

        // 跳过完全空白的行
        if record.is_blank() {
            continue;
        }
        records.push(record);
    }
    records
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

// ==========================================
// CSV Parser
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }

        Ok(collect_records(&headers, rows))
    }
}

// ==========================================
// Excel Parser
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        let mut rows = range
            .rows()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<_>>());

        // 无表头即无数据
        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row.iter().map(|h| h.trim().to_string()).collect(),
            None => return Ok(Vec::new()),
        };

        Ok(collect_records(&headers, rows))
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<RawRecord>> {
        let path = file_path.as_ref();
        match extension_of(path).as_str() {
            "csv" => CsvParser.parse_to_raw_records(path),
            "xlsx" | "xls" => ExcelParser.parse_to_raw_records(path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}
