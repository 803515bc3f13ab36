// ==========================================
// 物料标签打印系统 - 打印机配置领域模型
// ==========================================
// 对齐: printer_config 表
// 红线: 同一时刻至多一条 is_default = true
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 打印机默认端口（Zebra RAW 端口）
pub const DEFAULT_PRINTER_PORT: u16 = 9100;

// ==========================================
// PrinterConfig - 打印机配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrinterConfig {
    pub id: String,
    pub printer_name: String, // 显示名称
    pub printer_type: String, // 类型标签（如"斑马打印机"）
    pub printer_ip: String,   // IPv4 地址
    pub printer_port: u16,    // TCP 端口 1-65535
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PrinterConfig {
    /// 打印目标地址
    pub fn endpoint(&self) -> PrinterEndpoint {
        PrinterEndpoint {
            address: self.printer_ip.clone(),
            port: self.printer_port,
        }
    }
}

// ==========================================
// NewPrinterConfig - 打印机配置表单
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPrinterConfig {
    pub printer_name: String,
    pub printer_type: String,
    pub printer_ip: String,
    pub printer_port: u16,
    pub is_default: bool,
}

impl Default for NewPrinterConfig {
    /// 设置对话框的初始值
    fn default() -> Self {
        Self {
            printer_name: "ZDesigner ZD888-203dpi ZPL".to_string(),
            printer_type: "斑马打印机".to_string(),
            printer_ip: "172.16.5.199".to_string(),
            printer_port: DEFAULT_PRINTER_PORT,
            is_default: true,
        }
    }
}

// ==========================================
// PrinterConfigPatch - 部分更新
// ==========================================
// is_default 不在补丁中：默认打印机只能通过 set_default 切换
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrinterConfigPatch {
    pub printer_name: Option<String>,
    pub printer_type: Option<String>,
    pub printer_ip: Option<String>,
    pub printer_port: Option<u16>,
}

impl PrinterConfigPatch {
    pub fn is_empty(&self) -> bool {
        self == &PrinterConfigPatch::default()
    }
}

impl From<NewPrinterConfig> for PrinterConfigPatch {
    fn from(form: NewPrinterConfig) -> Self {
        Self {
            printer_name: Some(form.printer_name),
            printer_type: Some(form.printer_type),
            printer_ip: Some(form.printer_ip),
            printer_port: Some(form.printer_port),
        }
    }
}

// ==========================================
// PrinterEndpoint - 打印目标
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrinterEndpoint {
    pub address: String,
    pub port: u16,
}

impl PrinterEndpoint {
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
        }
    }

    /// HTTP 投递地址
    pub fn http_url(&self) -> String {
        format!("http://{}:{}/", self.address, self.port)
    }
}

impl fmt::Display for PrinterEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url() {
        let endpoint = PrinterEndpoint::new("172.16.5.199", 9100);
        assert_eq!(endpoint.http_url(), "http://172.16.5.199:9100/");
        assert_eq!(endpoint.to_string(), "172.16.5.199:9100");
    }

    #[test]
    fn test_form_into_patch() {
        let patch: PrinterConfigPatch = NewPrinterConfig::default().into();
        assert_eq!(patch.printer_port, Some(9100));
        assert!(!patch.is_empty());
    }
}
