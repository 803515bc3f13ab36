// ==========================================
// 物料标签打印系统 - 打印机配置仓储
// ==========================================
// 红线: 至多一条默认打印机
// 实现: "清除其他默认 + 设置默认" 在同一事务内完成，
//       表上另有 is_default = 1 的部分唯一索引兜底
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::printer::{NewPrinterConfig, PrinterConfig, PrinterConfigPatch};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::{parse_db_timestamp, to_db_timestamp};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;
use uuid::Uuid;

const PRINTER_COLUMNS: &str = r#"
    id, printer_name, printer_type, printer_ip, printer_port,
    is_default, created_at, updated_at
"#;

pub struct PrinterConfigRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PrinterConfigRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 全部配置（新建在前）
    pub fn list_all(&self) -> RepositoryResult<Vec<PrinterConfig>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM printer_config ORDER BY created_at DESC, rowid DESC",
            PRINTER_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let configs = stmt
            .query_map([], map_printer_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(configs)
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<PrinterConfig>> {
        let conn = self.get_conn()?;
        find_by_id_with(&conn, id)
    }

    /// 当前默认打印机
    pub fn find_default(&self) -> RepositoryResult<Option<PrinterConfig>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM printer_config WHERE is_default = 1 LIMIT 1",
            PRINTER_COLUMNS
        );
        Ok(conn.query_row(&sql, [], map_printer_row).optional()?)
    }

    /// 默认打印机数量（校验用）
    pub fn count_defaults(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        Ok(conn.query_row(
            "SELECT COUNT(*) FROM printer_config WHERE is_default = 1",
            [],
            |row| row.get(0),
        )?)
    }

    /// 新建配置
    ///
    /// # 说明
    /// - is_default = true 时，同一事务内先清除其他默认
    pub fn insert(&self, config: NewPrinterConfig) -> RepositoryResult<PrinterConfig> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        if config.is_default {
            tx.execute(
                "UPDATE printer_config SET is_default = 0, updated_at = ?1 WHERE is_default = 1",
                params![to_db_timestamp(&Utc::now())],
            )?;
        }

        let now = Utc::now();
        let record = PrinterConfig {
            id: Uuid::new_v4().to_string(),
            printer_name: config.printer_name,
            printer_type: config.printer_type,
            printer_ip: config.printer_ip,
            printer_port: config.printer_port,
            is_default: config.is_default,
            created_at: now,
            updated_at: now,
        };

        let sql = format!(
            "INSERT INTO printer_config ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            PRINTER_COLUMNS
        );
        tx.execute(
            &sql,
            params![
                record.id,
                record.printer_name,
                record.printer_type,
                record.printer_ip,
                record.printer_port,
                record.is_default,
                to_db_timestamp(&record.created_at),
                to_db_timestamp(&record.updated_at),
            ],
        )?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(record)
    }

    /// 部分更新（不涉及默认标记）
    pub fn update(&self, id: &str, patch: &PrinterConfigPatch) -> RepositoryResult<PrinterConfig> {
        let conn = self.get_conn()?;

        let mut config = find_by_id_with(&conn, id)?
            .ok_or_else(|| RepositoryError::not_found("PrinterConfig", id))?;

        if let Some(name) = &patch.printer_name {
            config.printer_name = name.clone();
        }
        if let Some(kind) = &patch.printer_type {
            config.printer_type = kind.clone();
        }
        if let Some(ip) = &patch.printer_ip {
            config.printer_ip = ip.clone();
        }
        if let Some(port) = patch.printer_port {
            config.printer_port = port;
        }
        config.updated_at = Utc::now();

        conn.execute(
            r#"
            UPDATE printer_config SET
                printer_name = ?2, printer_type = ?3, printer_ip = ?4,
                printer_port = ?5, updated_at = ?6
            WHERE id = ?1
            "#,
            params![
                config.id,
                config.printer_name,
                config.printer_type,
                config.printer_ip,
                config.printer_port,
                to_db_timestamp(&config.updated_at),
            ],
        )?;

        Ok(config)
    }

    /// 设为默认打印机（单事务：清除其他默认 → 设置目标）
    pub fn set_default(&self, id: &str) -> RepositoryResult<PrinterConfig> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        if find_by_id_with(&tx, id)?.is_none() {
            return Err(RepositoryError::not_found("PrinterConfig", id));
        }

        let now = to_db_timestamp(&Utc::now());
        let cleared = tx.execute(
            "UPDATE printer_config SET is_default = 0, updated_at = ?1 WHERE id != ?2 AND is_default = 1",
            params![now, id],
        )?;
        tx.execute(
            "UPDATE printer_config SET is_default = 1, updated_at = ?1 WHERE id = ?2",
            params![now, id],
        )?;

        let config = find_by_id_with(&tx, id)?
            .ok_or_else(|| RepositoryError::not_found("PrinterConfig", id))?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        info!(printer_id = %id, cleared, "默认打印机已切换");
        Ok(config)
    }

    pub fn delete(&self, id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        Ok(conn.execute("DELETE FROM printer_config WHERE id = ?1", params![id])?)
    }
}

fn find_by_id_with(conn: &Connection, id: &str) -> RepositoryResult<Option<PrinterConfig>> {
    let sql = format!("SELECT {} FROM printer_config WHERE id = ?1", PRINTER_COLUMNS);
    Ok(conn.query_row(&sql, params![id], map_printer_row).optional()?)
}

fn map_printer_row(row: &Row<'_>) -> rusqlite::Result<PrinterConfig> {
    let port_raw: i64 = row.get(4)?;
    let printer_port = u16::try_from(port_raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Integer, Box::new(e))
    })?;

    Ok(PrinterConfig {
        id: row.get(0)?,
        printer_name: row.get(1)?,
        printer_type: row.get(2)?,
        printer_ip: row.get(3)?,
        printer_port,
        is_default: row.get(5)?,
        created_at: parse_db_timestamp(row, 6)?,
        updated_at: parse_db_timestamp(row, 7)?,
    })
}
