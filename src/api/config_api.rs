// ==========================================
// 物料标签打印系统 - 配置管理 API
// ==========================================
// 职责: 配置查询、更新、重置、快照
// ==========================================

use std::sync::Arc;

use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::validate_config_value;
use crate::config::{config_keys, default_value, ConfigEntry, ConfigManager};

pub struct ConfigApi {
    config_manager: Arc<ConfigManager>,
}

impl ConfigApi {
    pub fn new(config_manager: Arc<ConfigManager>) -> Self {
        Self { config_manager }
    }

    /// 全部已知配置（含默认值）
    pub fn list_configs(&self) -> ApiResult<Vec<ConfigEntry>> {
        Ok(self.config_manager.list_entries()?)
    }

    /// 单个配置
    pub fn get_config(&self, key: &str) -> ApiResult<ConfigEntry> {
        ensure_known(key)?;
        let stored = self.config_manager.get_value(key)?;
        Ok(ConfigEntry {
            key: key.to_string(),
            is_default: stored.is_none(),
            value: stored.or_else(|| default_value(key)).unwrap_or_default(),
        })
    }

    /// 更新配置（先校验）
    pub fn update_config(&self, key: &str, value: &str) -> ApiResult<ConfigEntry> {
        validate_config_value(key, value)?;
        self.config_manager.set_value(key, value.trim())?;
        info!(key, value = value.trim(), "配置已更新");
        self.get_config(key)
    }

    /// 恢复默认值
    pub fn reset_config(&self, key: &str) -> ApiResult<ConfigEntry> {
        ensure_known(key)?;
        self.config_manager.reset_value(key)?;
        info!(key, "配置已恢复默认");
        self.get_config(key)
    }

    /// 已存储配置快照（JSON）
    pub fn get_config_snapshot(&self) -> ApiResult<String> {
        Ok(self.config_manager.get_config_snapshot()?)
    }
}

fn ensure_known(key: &str) -> ApiResult<()> {
    if config_keys::ALL.contains(&key) {
        Ok(())
    } else {
        Err(ApiError::InvalidInput(format!("未知配置项: {}", key)))
    }
}
