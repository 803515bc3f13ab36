// ==========================================
// 物料标签打印系统 - 打印投递错误类型
// ==========================================
// 工具: thiserror 派生宏
// 约束: 每次失败必须归入一个确定的类别，不做自动重试
// ==========================================

use crate::domain::printer::PrinterEndpoint;
use serde::Serialize;
use std::io;
use thiserror::Error;

/// 投递失败分类
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DispatchError {
    #[error("打印机响应超时: {endpoint}")]
    Timeout { endpoint: String },

    #[error("打印机拒绝连接: {endpoint}")]
    Refused { endpoint: String },

    #[error("打印机不可达: {endpoint} ({message})")]
    Unreachable { endpoint: String, message: String },

    #[error("打印机返回非成功状态: HTTP {status}")]
    Rejected { status: u16 },

    #[error("打印机响应异常: {message}")]
    MalformedResponse { message: String },

    #[error("打印机地址无效: {message}")]
    InvalidEndpoint { message: String },

    #[error("打印客户端初始化失败: {message}")]
    Client { message: String },
}

impl DispatchError {
    /// 是否为连接层失败（拒绝/不可达/超时）
    pub fn is_connection_failure(&self) -> bool {
        matches!(
            self,
            DispatchError::Timeout { .. }
                | DispatchError::Refused { .. }
                | DispatchError::Unreachable { .. }
        )
    }

    /// 按 IO 错误类别归类
    pub fn from_io(err: &io::Error, endpoint: &PrinterEndpoint) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionRefused => DispatchError::Refused {
                endpoint: endpoint.to_string(),
            },
            io::ErrorKind::TimedOut => DispatchError::Timeout {
                endpoint: endpoint.to_string(),
            },
            _ => DispatchError::Unreachable {
                endpoint: endpoint.to_string(),
                message: err.to_string(),
            },
        }
    }

    /// 按 reqwest 错误归类
    pub fn from_reqwest(err: &reqwest::Error, endpoint: &PrinterEndpoint) -> Self {
        if err.is_timeout() {
            DispatchError::Timeout {
                endpoint: endpoint.to_string(),
            }
        } else if err.is_connect() {
            match io_error_kind(err) {
                Some(io::ErrorKind::ConnectionRefused) => DispatchError::Refused {
                    endpoint: endpoint.to_string(),
                },
                Some(io::ErrorKind::TimedOut) => DispatchError::Timeout {
                    endpoint: endpoint.to_string(),
                },
                _ => DispatchError::Unreachable {
                    endpoint: endpoint.to_string(),
                    message: err.to_string(),
                },
            }
        } else if err.is_builder() {
            DispatchError::InvalidEndpoint {
                message: err.to_string(),
            }
        } else {
            DispatchError::MalformedResponse {
                message: err.to_string(),
            }
        }
    }
}

/// 沿错误链查找底层 IO 错误
fn io_error_kind(err: &(dyn std::error::Error + 'static)) -> Option<io::ErrorKind> {
    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            return Some(io_err.kind());
        }
        source = cause.source();
    }
    None
}

/// Result 类型别名
pub type DispatchResult<T> = Result<T, DispatchError>;
