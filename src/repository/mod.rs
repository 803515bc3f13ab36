// ==========================================
// 物料标签打印系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod material_repo;
pub mod printer_config_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use material_repo::MaterialRepository;
pub use printer_config_repo::PrinterConfigRepository;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;

/// 时间戳统一存储为定宽 RFC3339（微秒 + Z），保证字符串序即时间序
pub(crate) fn to_db_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_db_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}
