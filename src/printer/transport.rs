// ==========================================
// 物料标签打印系统 - 打印投递通道
// ==========================================
// 职责: 把一份 ZPL 文档送达打印机
// 实现: HttpTransport (HTTP POST) / RawTcpTransport (9100 RAW)
// 约束: 单次投递，不重试；超时只作用于单次请求
// ==========================================

use crate::config::TransportKind;
use crate::domain::printer::PrinterEndpoint;
use crate::printer::error::{DispatchError, DispatchResult};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, instrument, warn};

/// 投递通道
#[async_trait]
pub trait PrintTransport: Send + Sync {
    /// 通道名称（日志用）
    fn name(&self) -> &'static str;

    /// 投递一份文档，成功即打印机已确认接收
    async fn send(&self, document: &str, endpoint: &PrinterEndpoint) -> DispatchResult<()>;
}

/// 按配置构造投递通道
pub fn build_transport(
    kind: TransportKind,
    timeout: Duration,
) -> DispatchResult<Arc<dyn PrintTransport>> {
    let transport: Arc<dyn PrintTransport> = match kind {
        TransportKind::Http => Arc::new(HttpTransport::new(timeout)?),
        TransportKind::RawTcp => Arc::new(RawTcpTransport::new(timeout)),
    };
    Ok(transport)
}

/// 解析打印目标为套接字地址
pub fn resolve_endpoint(endpoint: &PrinterEndpoint) -> DispatchResult<SocketAddr> {
    if endpoint.port == 0 {
        return Err(DispatchError::InvalidEndpoint {
            message: format!("端口无效: {}", endpoint),
        });
    }
    let ip: IpAddr = endpoint
        .address
        .trim()
        .parse()
        .map_err(|_| DispatchError::InvalidEndpoint {
            message: format!("IP 地址无效: {}", endpoint.address),
        })?;
    Ok(SocketAddr::new(ip, endpoint.port))
}

// ==========================================
// HttpTransport - HTTP POST 投递
// ==========================================
/// 以 text/plain 请求体 POST 到 http://<ip>:<port>/
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> DispatchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| DispatchError::Client {
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PrintTransport for HttpTransport {
    fn name(&self) -> &'static str {
        "http"
    }

    #[instrument(skip(self, document), fields(endpoint = %endpoint, bytes = document.len()))]
    async fn send(&self, document: &str, endpoint: &PrinterEndpoint) -> DispatchResult<()> {
        resolve_endpoint(endpoint)?;

        let response = self
            .client
            .post(endpoint.http_url())
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(document.to_string())
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "HTTP 投递失败");
                DispatchError::from_reqwest(&e, endpoint)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "打印机返回非成功状态");
            return Err(DispatchError::Rejected {
                status: status.as_u16(),
            });
        }

        debug!(status = status.as_u16(), "打印机已确认接收");
        Ok(())
    }
}

// ==========================================
// RawTcpTransport - RAW 端口投递
// ==========================================
/// 直接写入打印机 RAW 端口（Zebra 默认 9100）
///
/// RAW 端口不回应答，写入并关闭写端即视为成功。
#[derive(Debug, Clone)]
pub struct RawTcpTransport {
    timeout: Duration,
}

impl RawTcpTransport {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl PrintTransport for RawTcpTransport {
    fn name(&self) -> &'static str {
        "raw_tcp"
    }

    #[instrument(skip(self, document), fields(endpoint = %endpoint, bytes = document.len()))]
    async fn send(&self, document: &str, endpoint: &PrinterEndpoint) -> DispatchResult<()> {
        let addr = resolve_endpoint(endpoint)?;
        let timed_out = || DispatchError::Timeout {
            endpoint: endpoint.to_string(),
        };

        let mut stream = tokio::time::timeout(self.timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| timed_out())?
            .map_err(|e| DispatchError::from_io(&e, endpoint))?;

        let write = async {
            stream.write_all(document.as_bytes()).await?;
            stream.flush().await?;
            stream.shutdown().await
        };
        tokio::time::timeout(self.timeout, write)
            .await
            .map_err(|_| timed_out())?
            .map_err(|e| DispatchError::from_io(&e, endpoint))?;

        debug!("文档已写入 RAW 端口");
        Ok(())
    }
}
