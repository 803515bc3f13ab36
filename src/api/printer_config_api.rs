// ==========================================
// 物料标签打印系统 - 打印机配置 API
// ==========================================
// 职责: 打印机配置的增删改查、默认打印机切换、连接测试
// 红线: 任一时刻至多一台默认打印机
// ==========================================

use std::sync::Arc;

use tracing::{info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{validate_printer_form, validate_printer_patch};
use crate::config::ConfigManager;
use crate::domain::printer::{NewPrinterConfig, PrinterConfig, PrinterConfigPatch, PrinterEndpoint};
use crate::printer::probe;
use crate::repository::printer_config_repo::PrinterConfigRepository;

pub struct PrinterConfigApi {
    printer_repo: Arc<PrinterConfigRepository>,
    config_manager: Arc<ConfigManager>,
}

impl PrinterConfigApi {
    pub fn new(printer_repo: Arc<PrinterConfigRepository>, config_manager: Arc<ConfigManager>) -> Self {
        Self {
            printer_repo,
            config_manager,
        }
    }

    /// 全部配置（新建在前）
    pub fn list(&self) -> ApiResult<Vec<PrinterConfig>> {
        Ok(self.printer_repo.list_all()?)
    }

    /// 默认打印机（可能未配置）
    pub fn get_default(&self) -> ApiResult<Option<PrinterConfig>> {
        Ok(self.printer_repo.find_default()?)
    }

    pub fn get(&self, id: &str) -> ApiResult<PrinterConfig> {
        self.printer_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("打印机配置(id={})不存在", id)))
    }

    /// 新建配置；is_default 为真时同时成为唯一默认
    #[instrument(skip(self, form), fields(printer_name = %form.printer_name))]
    pub fn create(&self, form: NewPrinterConfig) -> ApiResult<PrinterConfig> {
        validate_printer_form(&form)?;
        let config = self.printer_repo.insert(normalize_form(form))?;
        info!(printer_id = %config.id, "打印机配置已保存");
        Ok(config)
    }

    /// 部分更新
    #[instrument(skip(self, patch))]
    pub fn update(&self, id: &str, patch: PrinterConfigPatch) -> ApiResult<PrinterConfig> {
        validate_printer_patch(&patch)?;
        let trim = |v: Option<String>| v.map(|s| s.trim().to_string());
        let patch = PrinterConfigPatch {
            printer_name: trim(patch.printer_name),
            printer_type: trim(patch.printer_type),
            printer_ip: trim(patch.printer_ip),
            printer_port: patch.printer_port,
        };
        let config = self.printer_repo.update(id, &patch)?;
        info!(printer_id = %config.id, "打印机配置已更新");
        Ok(config)
    }

    /// 设置对话框的保存：已有默认打印机则覆盖其内容，否则新建为默认
    pub fn save(&self, form: NewPrinterConfig) -> ApiResult<PrinterConfig> {
        validate_printer_form(&form)?;
        match self.printer_repo.find_default()? {
            Some(existing) => self.update(&existing.id, PrinterConfigPatch::from(form)),
            None => self.create(NewPrinterConfig {
                is_default: true,
                ..form
            }),
        }
    }

    /// 设为默认打印机
    pub fn set_default(&self, id: &str) -> ApiResult<PrinterConfig> {
        Ok(self.printer_repo.set_default(id)?)
    }

    pub fn delete(&self, id: &str) -> ApiResult<()> {
        if self.printer_repo.delete(id)? == 0 {
            return Err(ApiError::NotFound(format!("打印机配置(id={})不存在", id)));
        }
        Ok(())
    }

    /// 连接测试：表单校验通过后探测 TCP 连通性
    #[instrument(skip(self, form), fields(ip = %form.printer_ip, port = form.printer_port))]
    pub async fn test_connection(&self, form: &NewPrinterConfig) -> ApiResult<()> {
        validate_printer_form(form)?;
        let timeout = self.config_manager.request_timeout()?;
        let endpoint = PrinterEndpoint::new(form.printer_ip.trim(), form.printer_port);
        probe(&endpoint, timeout).await?;
        Ok(())
    }
}

fn normalize_form(form: NewPrinterConfig) -> NewPrinterConfig {
    NewPrinterConfig {
        printer_name: form.printer_name.trim().to_string(),
        printer_type: form.printer_type.trim().to_string(),
        printer_ip: form.printer_ip.trim().to_string(),
        ..form
    }
}
