// ==========================================
// 物料标签打印系统 - 物料 API
// ==========================================
// 职责: 物料分页/搜索/编辑/删除/锁定
// 红线: 原材来料编号一经生成不可修改
// ==========================================

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{
    ensure_code_unchanged, validate_material_patch, validate_new_materials, validate_paging,
};
use crate::domain::material::{Material, MaterialPage, MaterialPatch, NewMaterial};
use crate::domain::types::{ItemStatus, LockKind};
use crate::repository::material_repo::MaterialRepository;

// ==========================================
// MaterialEditForm - 物料编辑表单
// ==========================================
/// 编辑对话框提交的完整表单（文本字段为空串表示清空）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialEditForm {
    pub material_code: String,
    pub item_code: String,
    pub item_name: String,
    pub print_order: i32,
    pub specification: String,
    pub pallet_code: String,
    pub bucket_code: String,
    pub item_status: String,
    pub batch_number: String,
    pub supplier_name: String,
    pub batch_rule: String,
}

impl MaterialEditForm {
    /// 以现有记录回填表单
    pub fn from_material(material: &Material) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            material_code: material.material_code.clone(),
            item_code: text(&material.item_code),
            item_name: text(&material.item_name),
            print_order: material.print_order,
            specification: text(&material.specification),
            pallet_code: text(&material.pallet_code),
            bucket_code: text(&material.bucket_code),
            item_status: material.item_status.as_str().to_string(),
            batch_number: text(&material.batch_number),
            supplier_name: text(&material.supplier_name),
            batch_rule: text(&material.batch_rule),
        }
    }

    /// 表单 → 补丁（锁定状态不经表单修改）
    fn into_patch(self) -> ApiResult<MaterialPatch> {
        let status = ItemStatus::from_str(&self.item_status)
            .map_err(|msg| ApiError::field("item_status", msg))?;

        Ok(MaterialPatch {
            item_code: Some(Some(self.item_code)),
            item_name: Some(Some(self.item_name)),
            specification: Some(Some(self.specification)),
            pallet_code: Some(Some(self.pallet_code)),
            bucket_code: Some(Some(self.bucket_code)),
            batch_number: Some(Some(self.batch_number)),
            supplier_name: Some(Some(self.supplier_name)),
            batch_rule: Some(Some(self.batch_rule)),
            print_order: Some(self.print_order),
            item_status: Some(status),
            is_batch_locked: None,
            is_bucket_locked: None,
        })
    }
}

// ==========================================
// MaterialApi - 物料 API
// ==========================================
pub struct MaterialApi {
    material_repo: Arc<MaterialRepository>,
}

impl MaterialApi {
    pub fn new(material_repo: Arc<MaterialRepository>) -> Self {
        Self { material_repo }
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 分页查询（打印顺序升序，创建时间降序）
    pub fn list(&self, page: u32, page_size: u32) -> ApiResult<MaterialPage> {
        validate_paging(page, page_size)?;
        let (limit, offset) = to_limit_offset(page, page_size);
        let (items, total) = self.material_repo.list_page(limit, offset)?;
        Ok(MaterialPage {
            items,
            total,
            page,
            page_size,
        })
    }

    /// 关键字搜索；空白关键字等同于分页查询
    pub fn search(&self, keyword: &str, page: u32, page_size: u32) -> ApiResult<MaterialPage> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return self.list(page, page_size);
        }

        validate_paging(page, page_size)?;
        let (limit, offset) = to_limit_offset(page, page_size);
        let (items, total) = self.material_repo.search(keyword, limit, offset)?;
        Ok(MaterialPage {
            items,
            total,
            page,
            page_size,
        })
    }

    /// 按 id 查询
    pub fn get(&self, id: &str) -> ApiResult<Material> {
        self.material_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("物料(id={})不存在", id)))
    }

    /// 按 id 列表查询（保持顺序，跳过不存在的 id）
    pub fn get_many(&self, ids: &[String]) -> ApiResult<Vec<Material>> {
        Ok(self.material_repo.find_by_ids(ids)?)
    }

    // ==========================================
    // 写入接口
    // ==========================================

    /// 新增空白物料（生成新的物料编号）
    #[instrument(skip(self))]
    pub fn create_blank(&self, print_order: i32) -> ApiResult<Material> {
        if print_order < 0 {
            return Err(ApiError::field("print_order", "打印顺序不能为负数"));
        }
        let material = self.material_repo.insert(NewMaterial::blank(print_order))?;
        info!(material_code = %material.material_code, "新增物料");
        Ok(material)
    }

    /// 批量新增（整批校验通过才落库）
    #[instrument(skip(self, materials), fields(count = materials.len()))]
    pub fn create_many(&self, materials: Vec<NewMaterial>) -> ApiResult<Vec<Material>> {
        let materials: Vec<NewMaterial> =
            materials.into_iter().map(NewMaterial::normalized).collect();
        validate_new_materials(&materials)?;

        let created = self.material_repo.insert_batch(materials)?;
        info!(created = created.len(), "批量新增物料");
        Ok(created)
    }

    /// 部分更新
    #[instrument(skip(self, patch))]
    pub fn update(&self, id: &str, patch: MaterialPatch) -> ApiResult<Material> {
        validate_material_patch(&patch)?;
        Ok(self.material_repo.update(id, &patch)?)
    }

    /// 提交编辑表单
    #[instrument(skip(self, form))]
    pub fn update_from_form(&self, id: &str, form: MaterialEditForm) -> ApiResult<Material> {
        let current = self.get(id)?;
        ensure_code_unchanged(&current.material_code, Some(form.material_code.as_str()))?;

        let patch = form.into_patch()?;
        validate_material_patch(&patch)?;
        let updated = self.material_repo.update(id, &patch)?;
        info!(material_code = %updated.material_code, "物料信息已更新");
        Ok(updated)
    }

    /// 删除单条
    pub fn delete(&self, id: &str) -> ApiResult<()> {
        let deleted = self.material_repo.delete(id)?;
        if deleted == 0 {
            return Err(ApiError::NotFound(format!("物料(id={})不存在", id)));
        }
        Ok(())
    }

    /// 批量删除，返回实际删除条数
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub fn delete_many(&self, ids: &[String]) -> ApiResult<usize> {
        if ids.is_empty() {
            return Err(ApiError::InvalidInput("请先选择要删除的数据".to_string()));
        }
        let deleted = self.material_repo.delete_batch(ids)?;
        info!(deleted, "批量删除物料");
        Ok(deleted)
    }

    /// 切换批次锁定
    pub fn toggle_batch_lock(&self, id: &str) -> ApiResult<Material> {
        let current = self.get(id)?;
        self.set_lock(id, LockKind::Batch, !current.is_batch_locked)
    }

    /// 切换料桶锁定
    pub fn toggle_bucket_lock(&self, id: &str) -> ApiResult<Material> {
        let current = self.get(id)?;
        self.set_lock(id, LockKind::Bucket, !current.is_bucket_locked)
    }

    /// 设置锁定状态
    pub fn set_lock(&self, id: &str, kind: LockKind, locked: bool) -> ApiResult<Material> {
        let material = self.material_repo.set_lock(id, kind, locked)?;
        info!(material_code = %material.material_code, lock = %kind, locked, "锁定状态变更");
        Ok(material)
    }
}

fn to_limit_offset(page: u32, page_size: u32) -> (i64, i64) {
    let limit = page_size as i64;
    (limit, (page as i64 - 1) * limit)
}
