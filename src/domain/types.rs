// ==========================================
// 物料标签打印系统 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 料品状态 (Item Status)
// ==========================================
// 存储与界面一致使用中文值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ItemStatus {
    #[default]
    #[serde(rename = "正常")]
    Normal, // 正常
    #[serde(rename = "待检")]
    Pending, // 待检
    #[serde(rename = "异常")]
    Abnormal, // 异常
}

impl ItemStatus {
    pub const ALL: [ItemStatus; 3] = [ItemStatus::Normal, ItemStatus::Pending, ItemStatus::Abnormal];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Normal => "正常",
            ItemStatus::Pending => "待检",
            ItemStatus::Abnormal => "异常",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "正常" | "NORMAL" | "normal" => Ok(ItemStatus::Normal),
            "待检" | "PENDING" | "pending" => Ok(ItemStatus::Pending),
            "异常" | "ABNORMAL" | "abnormal" => Ok(ItemStatus::Abnormal),
            other => Err(format!("未知的料品状态: {}", other)),
        }
    }
}

// ==========================================
// 锁定类型 (Lock Kind)
// ==========================================
// 批次锁定与料桶锁定相互独立
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LockKind {
    Batch,
    Bucket,
}

impl LockKind {
    /// materials 表中对应的列名
    pub fn column(&self) -> &'static str {
        match self {
            LockKind::Batch => "is_batch_locked",
            LockKind::Bucket => "is_bucket_locked",
        }
    }
}

impl fmt::Display for LockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockKind::Batch => write!(f, "BATCH"),
            LockKind::Bucket => write!(f, "BUCKET"),
        }
    }
}
