// ==========================================
// 物料标签打印系统 - 物料领域模型
// ==========================================
// 对齐: materials 表
// 红线: material_code 一经生成不可修改
// ==========================================

use crate::domain::types::ItemStatus;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// 物料编号前缀（原材来料）
pub const MATERIAL_CODE_PREFIX: &str = "YCL";

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const CODE_SUFFIX_LEN: usize = 9;

// ==========================================
// Material - 物料记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    // ===== 主键 =====
    pub id: String,
    pub material_code: String, // 原材来料编号（业务唯一键）

    // ===== 料品信息 =====
    pub item_code: Option<String>,     // 料品编码
    pub item_name: Option<String>,     // 料品名称
    pub specification: Option<String>, // 规格型号
    pub pallet_code: Option<String>,   // 托盘码
    pub bucket_code: Option<String>,   // 料桶码
    pub batch_number: Option<String>,  // 料品批次
    pub supplier_name: Option<String>, // 供应商名
    pub batch_rule: Option<String>,    // 料品批次编码规则

    // ===== 状态 =====
    pub print_order: i32,
    pub item_status: ItemStatus,
    pub is_batch_locked: bool,
    pub is_bucket_locked: bool,

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==========================================
// NewMaterial - 待插入物料
// ==========================================
// 不含 id 与时间戳，由仓储层落库时生成
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMaterial {
    pub material_code: String,
    pub item_code: Option<String>,
    pub item_name: Option<String>,
    pub specification: Option<String>,
    pub pallet_code: Option<String>,
    pub bucket_code: Option<String>,
    pub batch_number: Option<String>,
    pub supplier_name: Option<String>,
    pub batch_rule: Option<String>,
    pub print_order: i32,
    pub item_status: ItemStatus,
    pub is_batch_locked: bool,
    pub is_bucket_locked: bool,
}

impl NewMaterial {
    /// 以新生成的物料编号创建空白物料
    pub fn blank(print_order: i32) -> Self {
        Self {
            material_code: generate_material_code(),
            item_code: None,
            item_name: None,
            specification: None,
            pallet_code: None,
            bucket_code: None,
            batch_number: None,
            supplier_name: None,
            batch_rule: None,
            print_order,
            item_status: ItemStatus::Normal,
            is_batch_locked: false,
            is_bucket_locked: false,
        }
    }

    /// 去除首尾空白，空白文本视为未填写
    pub fn normalized(self) -> Self {
        Self {
            material_code: self.material_code.trim().to_string(),
            item_code: normalize_optional(self.item_code),
            item_name: normalize_optional(self.item_name),
            specification: normalize_optional(self.specification),
            pallet_code: normalize_optional(self.pallet_code),
            bucket_code: normalize_optional(self.bucket_code),
            batch_number: normalize_optional(self.batch_number),
            supplier_name: normalize_optional(self.supplier_name),
            batch_rule: normalize_optional(self.batch_rule),
            ..self
        }
    }
}

// ==========================================
// MaterialPatch - 部分更新
// ==========================================
// 外层 None = 不修改；Some(None) = 清空该字段
// material_code 不在此结构中（不可变）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialPatch {
    pub item_code: Option<Option<String>>,
    pub item_name: Option<Option<String>>,
    pub specification: Option<Option<String>>,
    pub pallet_code: Option<Option<String>>,
    pub bucket_code: Option<Option<String>>,
    pub batch_number: Option<Option<String>>,
    pub supplier_name: Option<Option<String>>,
    pub batch_rule: Option<Option<String>>,
    pub print_order: Option<i32>,
    pub item_status: Option<ItemStatus>,
    pub is_batch_locked: Option<bool>,
    pub is_bucket_locked: Option<bool>,
}

impl MaterialPatch {
    pub fn is_empty(&self) -> bool {
        self == &MaterialPatch::default()
    }

    /// 将补丁应用到物料快照（不修改 id/material_code/created_at）
    pub fn apply_to(&self, material: &mut Material) {
        fn set(target: &mut Option<String>, value: &Option<Option<String>>) {
            if let Some(v) = value {
                *target = normalize_optional(v.clone());
            }
        }

        set(&mut material.item_code, &self.item_code);
        set(&mut material.item_name, &self.item_name);
        set(&mut material.specification, &self.specification);
        set(&mut material.pallet_code, &self.pallet_code);
        set(&mut material.bucket_code, &self.bucket_code);
        set(&mut material.batch_number, &self.batch_number);
        set(&mut material.supplier_name, &self.supplier_name);
        set(&mut material.batch_rule, &self.batch_rule);

        if let Some(order) = self.print_order {
            material.print_order = order;
        }
        if let Some(status) = self.item_status {
            material.item_status = status;
        }
        if let Some(locked) = self.is_batch_locked {
            material.is_batch_locked = locked;
        }
        if let Some(locked) = self.is_bucket_locked {
            material.is_bucket_locked = locked;
        }
    }
}

// ==========================================
// MaterialPage - 分页结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialPage {
    pub items: Vec<Material>,
    /// 满足条件的总记录数（精确计数）
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
}

// ==========================================
// ImportRow - 导入中间结构体
// ==========================================
// 用途: 表格行 → 字段映射 → 此结构 → NewMaterial
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportRow {
    pub bucket_code: Option<String>,  // 料桶码
    pub batch_number: Option<String>, // 料品批次
    pub pallet_code: Option<String>,  // 托盘码
    pub item_code: Option<String>,    // 料品编码
    pub specification: Option<String>, // 规格型号
    pub batch_rule: Option<String>,   // 料品批次编码规则

    // 元信息
    pub row_number: usize,
}

impl ImportRow {
    /// 转换为待插入物料
    ///
    /// # 说明
    /// - print_order 由调用方按行序传入（从 1 开始）
    /// - 料品名称/供应商名不在导入模板中，保持为空
    pub fn into_new_material(self, print_order: i32) -> NewMaterial {
        NewMaterial {
            item_code: self.item_code,
            specification: self.specification,
            pallet_code: self.pallet_code,
            bucket_code: self.bucket_code,
            batch_number: self.batch_number,
            batch_rule: self.batch_rule,
            ..NewMaterial::blank(print_order)
        }
    }
}

/// 生成物料编号: YCL-<毫秒时间戳>-<9位base36随机串>
pub fn generate_material_code() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..CODE_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();

    format!(
        "{}-{}-{}",
        MATERIAL_CODE_PREFIX,
        Utc::now().timestamp_millis(),
        suffix
    )
}

/// 空白字符串视为缺失
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
