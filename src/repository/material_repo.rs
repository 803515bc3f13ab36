// ==========================================
// 物料标签打印系统 - 物料数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::material::{Material, MaterialPatch, NewMaterial};
use crate::domain::types::{ItemStatus, LockKind};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::{parse_db_timestamp, to_db_timestamp};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;
use uuid::Uuid;

const MATERIAL_COLUMNS: &str = r#"
    id, material_code, item_code, item_name, specification,
    pallet_code, bucket_code, batch_number, supplier_name, batch_rule,
    print_order, item_status, is_batch_locked, is_bucket_locked,
    created_at, updated_at
"#;

/// 列表统一排序：打印顺序升序，创建时间降序
const MATERIAL_ORDER: &str = "ORDER BY print_order ASC, created_at DESC, rowid DESC";

/// 搜索覆盖的文本列
const SEARCH_WHERE: &str = r#"
    material_code LIKE ?1 ESCAPE '\'
    OR item_code LIKE ?1 ESCAPE '\'
    OR item_name LIKE ?1 ESCAPE '\'
    OR bucket_code LIKE ?1 ESCAPE '\'
    OR pallet_code LIKE ?1 ESCAPE '\'
"#;

// ==========================================
// MaterialRepository - 物料仓储
// ==========================================
/// 物料仓储
/// 职责: 管理 materials 表的 CRUD 操作
pub struct MaterialRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MaterialRepository {
    /// 创建新的 MaterialRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 分页查询
    ///
    /// # 参数
    /// - limit/offset: 由调用方按页码换算
    ///
    /// # 返回
    /// - (当前页记录, 总记录数)
    pub fn list_page(&self, limit: i64, offset: i64) -> RepositoryResult<(Vec<Material>, i64)> {
        let conn = self.get_conn()?;

        let total: i64 = conn.query_row("SELECT COUNT(*) FROM materials", [], |row| row.get(0))?;

        let sql = format!(
            "SELECT {} FROM materials {} LIMIT ?1 OFFSET ?2",
            MATERIAL_COLUMNS, MATERIAL_ORDER
        );
        let mut stmt = conn.prepare(&sql)?;
        let items = stmt
            .query_map(params![limit, offset], map_material_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok((items, total))
    }

    /// 关键字搜索（物料编号/料品编码/料品名称/料桶码/托盘码，任一包含即命中）
    ///
    /// # 说明
    /// - 大小写不敏感（ASCII）
    /// - 关键字中的 % _ \ 按字面匹配
    pub fn search(
        &self,
        keyword: &str,
        limit: i64,
        offset: i64,
    ) -> RepositoryResult<(Vec<Material>, i64)> {
        let pattern = format!("%{}%", escape_like(keyword));
        let conn = self.get_conn()?;

        let count_sql = format!("SELECT COUNT(*) FROM materials WHERE {}", SEARCH_WHERE);
        let total: i64 = conn.query_row(&count_sql, params![pattern], |row| row.get(0))?;

        let sql = format!(
            "SELECT {} FROM materials WHERE {} {} LIMIT ?2 OFFSET ?3",
            MATERIAL_COLUMNS, SEARCH_WHERE, MATERIAL_ORDER
        );
        let mut stmt = conn.prepare(&sql)?;
        let items = stmt
            .query_map(params![pattern, limit, offset], map_material_row)?
            .collect::<Result<Vec<_>, _>>()?;

        debug!(keyword, total, returned = items.len(), "物料搜索");
        Ok((items, total))
    }

    /// 按 id 查询
    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Material>> {
        let conn = self.get_conn()?;
        find_by_id_with(&conn, id)
    }

    /// 按 id 列表查询，保持入参顺序，不存在的 id 被跳过
    pub fn find_by_ids(&self, ids: &[String]) -> RepositoryResult<Vec<Material>> {
        let conn = self.get_conn()?;
        let mut result = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(material) = find_by_id_with(&conn, id)? {
                result.push(material);
            }
        }
        Ok(result)
    }

    /// 物料总数
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        Ok(conn.query_row("SELECT COUNT(*) FROM materials", [], |row| row.get(0))?)
    }

    // ==========================================
    // 写入
    // ==========================================

    /// 插入单条物料
    pub fn insert(&self, material: NewMaterial) -> RepositoryResult<Material> {
        let conn = self.get_conn()?;
        insert_with(&conn, material)
    }

    /// 批量插入物料（单事务，任一失败整体回滚）
    pub fn insert_batch(&self, materials: Vec<NewMaterial>) -> RepositoryResult<Vec<Material>> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut inserted = Vec::with_capacity(materials.len());
        for material in materials {
            inserted.push(insert_with(&tx, material)?);
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(inserted)
    }

    /// 按 id 部分更新
    ///
    /// # 返回
    /// - Ok(Material): 更新后的记录
    /// - Err(NotFound): id 不存在
    pub fn update(&self, id: &str, patch: &MaterialPatch) -> RepositoryResult<Material> {
        let conn = self.get_conn()?;

        let mut material = find_by_id_with(&conn, id)?
            .ok_or_else(|| RepositoryError::not_found("Material", id))?;
        patch.apply_to(&mut material);
        material.updated_at = Utc::now();

        conn.execute(
            r#"
            UPDATE materials SET
                item_code = ?2, item_name = ?3, specification = ?4,
                pallet_code = ?5, bucket_code = ?6, batch_number = ?7,
                supplier_name = ?8, batch_rule = ?9, print_order = ?10,
                item_status = ?11, is_batch_locked = ?12, is_bucket_locked = ?13,
                updated_at = ?14
            WHERE id = ?1
            "#,
            params![
                material.id,
                material.item_code,
                material.item_name,
                material.specification,
                material.pallet_code,
                material.bucket_code,
                material.batch_number,
                material.supplier_name,
                material.batch_rule,
                material.print_order,
                material.item_status.as_str(),
                material.is_batch_locked,
                material.is_bucket_locked,
                to_db_timestamp(&material.updated_at),
            ],
        )?;

        Ok(material)
    }

    /// 设置批次锁定/料桶锁定
    pub fn set_lock(&self, id: &str, kind: LockKind, locked: bool) -> RepositoryResult<Material> {
        let conn = self.get_conn()?;

        let sql = format!(
            "UPDATE materials SET {} = ?1, updated_at = ?2 WHERE id = ?3",
            kind.column()
        );
        let affected = conn.execute(&sql, params![locked, to_db_timestamp(&Utc::now()), id])?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Material", id));
        }

        find_by_id_with(&conn, id)?.ok_or_else(|| RepositoryError::not_found("Material", id))
    }

    /// 删除单条物料
    ///
    /// # 返回
    /// - 实际删除的行数（0 表示 id 不存在）
    pub fn delete(&self, id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        Ok(conn.execute("DELETE FROM materials WHERE id = ?1", params![id])?)
    }

    /// 批量删除（单事务）
    pub fn delete_batch(&self, ids: &[String]) -> RepositoryResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut deleted = 0;
        for id in ids {
            deleted += tx.execute("DELETE FROM materials WHERE id = ?1", params![id])?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(deleted)
    }
}

// ==========================================
// 行映射与内部工具
// ==========================================

fn find_by_id_with(conn: &Connection, id: &str) -> RepositoryResult<Option<Material>> {
    let sql = format!("SELECT {} FROM materials WHERE id = ?1", MATERIAL_COLUMNS);
    Ok(conn.query_row(&sql, params![id], map_material_row).optional()?)
}

fn insert_with(conn: &Connection, material: NewMaterial) -> RepositoryResult<Material> {
    let now = Utc::now();
    let record = Material {
        id: Uuid::new_v4().to_string(),
        material_code: material.material_code,
        item_code: material.item_code,
        item_name: material.item_name,
        specification: material.specification,
        pallet_code: material.pallet_code,
        bucket_code: material.bucket_code,
        batch_number: material.batch_number,
        supplier_name: material.supplier_name,
        batch_rule: material.batch_rule,
        print_order: material.print_order,
        item_status: material.item_status,
        is_batch_locked: material.is_batch_locked,
        is_bucket_locked: material.is_bucket_locked,
        created_at: now,
        updated_at: now,
    };

    let sql = format!(
        "INSERT INTO materials ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        MATERIAL_COLUMNS
    );
    conn.execute(
        &sql,
        params![
            record.id,
            record.material_code,
            record.item_code,
            record.item_name,
            record.specification,
            record.pallet_code,
            record.bucket_code,
            record.batch_number,
            record.supplier_name,
            record.batch_rule,
            record.print_order,
            record.item_status.as_str(),
            record.is_batch_locked,
            record.is_bucket_locked,
            to_db_timestamp(&record.created_at),
            to_db_timestamp(&record.updated_at),
        ],
    )?;

    Ok(record)
}

fn map_material_row(row: &Row<'_>) -> rusqlite::Result<Material> {
    let status_raw: String = row.get(11)?;
    let item_status = status_raw.parse::<ItemStatus>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(11, rusqlite::types::Type::Text, e.into())
    })?;

    Ok(Material {
        id: row.get(0)?,
        material_code: row.get(1)?,
        item_code: row.get(2)?,
        item_name: row.get(3)?,
        specification: row.get(4)?,
        pallet_code: row.get(5)?,
        bucket_code: row.get(6)?,
        batch_number: row.get(7)?,
        supplier_name: row.get(8)?,
        batch_rule: row.get(9)?,
        print_order: row.get(10)?,
        item_status,
        is_batch_locked: row.get(12)?,
        is_bucket_locked: row.get(13)?,
        created_at: parse_db_timestamp(row, 14)?,
        updated_at: parse_db_timestamp(row, 15)?,
    })
}

/// LIKE 模式转义（配合 ESCAPE '\'）
fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for ch in keyword.trim().chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
