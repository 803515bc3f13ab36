// ==========================================
// 物料标签打印系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value)
// ==========================================

use crate::db::open_sqlite_connection;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// 配置键
pub mod config_keys {
    /// 批量打印相邻两次投递之间的间隔（毫秒）
    pub const PRINT_BATCH_DELAY_MS: &str = "print.batch_delay_ms";
    /// 单次投递超时（毫秒）
    pub const PRINT_REQUEST_TIMEOUT_MS: &str = "print.request_timeout_ms";
    /// 投递方式: http | raw_tcp
    pub const PRINT_TRANSPORT: &str = "print.transport";
    /// 列表默认每页条数
    pub const MATERIAL_PAGE_SIZE: &str = "material.page_size";
    /// 标签标题
    pub const LABEL_TITLE: &str = "label.title";

    pub const ALL: [&str; 5] = [
        PRINT_BATCH_DELAY_MS,
        PRINT_REQUEST_TIMEOUT_MS,
        PRINT_TRANSPORT,
        MATERIAL_PAGE_SIZE,
        LABEL_TITLE,
    ];
}

pub const DEFAULT_BATCH_DELAY_MS: u64 = 500;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const DEFAULT_LABEL_TITLE: &str = "圣宝鸿料桶标签";

/// 投递方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    Http,
    RawTcp,
}

impl TransportKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "http" => Some(TransportKind::Http),
            "raw_tcp" | "tcp" | "raw" => Some(TransportKind::RawTcp),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Http => "http",
            TransportKind::RawTcp => "raw_tcp",
        }
    }
}

/// 配置项（列表展示用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    /// 是否来自默认值（config_kv 中无记录）
    pub is_default: bool,
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取配置原值
    pub fn get_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        Ok(conn
            .query_row(
                "SELECT value FROM config_kv WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?)
    }

    /// 写入配置（upsert）
    pub fn set_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO config_kv (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// 删除配置（回退为默认值）
    pub fn reset_value(&self, key: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        Ok(conn.execute("DELETE FROM config_kv WHERE key = ?1", params![key])? > 0)
    }

    fn get_u64_or(&self, key: &str, default: u64) -> RepositoryResult<u64> {
        match self.get_value(key)? {
            None => Ok(default),
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| RepositoryError::FieldValueError {
                field: key.to_string(),
                message: format!("无法解析为非负整数: {}", raw),
            }),
        }
    }

    // ==========================================
    // 类型化读取
    // ==========================================

    pub fn batch_delay(&self) -> RepositoryResult<Duration> {
        Ok(Duration::from_millis(
            self.get_u64_or(config_keys::PRINT_BATCH_DELAY_MS, DEFAULT_BATCH_DELAY_MS)?,
        ))
    }

    pub fn request_timeout(&self) -> RepositoryResult<Duration> {
        Ok(Duration::from_millis(self.get_u64_or(
            config_keys::PRINT_REQUEST_TIMEOUT_MS,
            DEFAULT_REQUEST_TIMEOUT_MS,
        )?))
    }

    pub fn transport(&self) -> RepositoryResult<TransportKind> {
        match self.get_value(config_keys::PRINT_TRANSPORT)? {
            None => Ok(TransportKind::Http),
            Some(raw) => TransportKind::parse(&raw).ok_or_else(|| RepositoryError::FieldValueError {
                field: config_keys::PRINT_TRANSPORT.to_string(),
                message: format!("未知的投递方式: {}", raw),
            }),
        }
    }

    pub fn page_size(&self) -> RepositoryResult<u32> {
        let size = self.get_u64_or(config_keys::MATERIAL_PAGE_SIZE, DEFAULT_PAGE_SIZE as u64)?;
        Ok(size.clamp(1, 1000) as u32)
    }

    pub fn label_title(&self) -> RepositoryResult<String> {
        Ok(self
            .get_value(config_keys::LABEL_TITLE)?
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LABEL_TITLE.to_string()))
    }

    /// 已知配置项（含默认值）
    pub fn list_entries(&self) -> RepositoryResult<Vec<ConfigEntry>> {
        let mut entries = Vec::with_capacity(config_keys::ALL.len());
        for key in config_keys::ALL {
            let stored = self.get_value(key)?;
            let is_default = stored.is_none();
            let value = match stored {
                Some(v) => v,
                None => default_value(key).unwrap_or_default(),
            };
            entries.push(ConfigEntry {
                key: key.to_string(),
                value,
                is_default,
            });
        }
        Ok(entries)
    }

    /// 全部已存储配置的快照（JSON）
    pub fn get_config_snapshot(&self) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT key, value FROM config_kv ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        serde_json::to_string(&json!(config_map))
            .map_err(|e| RepositoryError::InternalError(e.to_string()))
    }
}

/// 配置项默认值
pub fn default_value(key: &str) -> Option<String> {
    match key {
        config_keys::PRINT_BATCH_DELAY_MS => Some(DEFAULT_BATCH_DELAY_MS.to_string()),
        config_keys::PRINT_REQUEST_TIMEOUT_MS => Some(DEFAULT_REQUEST_TIMEOUT_MS.to_string()),
        config_keys::PRINT_TRANSPORT => Some(TransportKind::Http.as_str().to_string()),
        config_keys::MATERIAL_PAGE_SIZE => Some(DEFAULT_PAGE_SIZE.to_string()),
        config_keys::LABEL_TITLE => Some(DEFAULT_LABEL_TITLE.to_string()),
        _ => None,
    }
}
