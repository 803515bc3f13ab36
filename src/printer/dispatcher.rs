// ==========================================
// 物料标签打印系统 - 打印调度器
// ==========================================
// 职责: 单张投递 / 批量顺序投递 / 连接探测
// 红线: 批量严格按输入顺序逐张等待，N 条输入恰好 N 次投递
// 红线: 失败不中断批次，success + failed == total
// ==========================================

use crate::domain::printer::PrinterEndpoint;
use crate::printer::error::{DispatchError, DispatchResult};
use crate::printer::transport::{resolve_endpoint, PrintTransport};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::{info, instrument, warn};

/// 单个打印任务
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintJob {
    /// 物料编号（报告用）
    pub material_code: String,
    pub document: String,
}

/// 批量中的一次失败
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    /// 在批次中的位置（从 0 开始）
    pub index: usize,
    pub material_code: String,
    pub error: DispatchError,
}

/// 批量打印结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchPrintReport {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub failures: Vec<BatchFailure>,
}

impl BatchPrintReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

// ==========================================
// PrintDispatcher - 打印调度器
// ==========================================
#[derive(Clone)]
pub struct PrintDispatcher {
    transport: Arc<dyn PrintTransport>,
    batch_delay: Duration,
}

impl PrintDispatcher {
    pub fn new(transport: Arc<dyn PrintTransport>, batch_delay: Duration) -> Self {
        Self {
            transport,
            batch_delay,
        }
    }

    pub fn batch_delay(&self) -> Duration {
        self.batch_delay
    }

    /// 投递单份文档
    pub async fn send(&self, document: &str, endpoint: &PrinterEndpoint) -> DispatchResult<()> {
        self.transport.send(document, endpoint).await
    }

    /// 批量投递
    ///
    /// # 说明
    /// - 每次投递前回调 on_progress(当前序号从 1 开始, 总数)
    /// - 相邻两次投递之间等待 batch_delay，最后一张之后不等待
    /// - 无取消；单次失败记入报告后继续
    #[instrument(skip(self, jobs, on_progress), fields(endpoint = %endpoint, total = jobs.len(), transport = self.transport.name()))]
    pub async fn send_batch<F>(
        &self,
        jobs: &[PrintJob],
        endpoint: &PrinterEndpoint,
        mut on_progress: F,
    ) -> BatchPrintReport
    where
        F: FnMut(usize, usize) + Send,
    {
        let total = jobs.len();
        let mut report = BatchPrintReport {
            total,
            ..BatchPrintReport::default()
        };

        for (index, job) in jobs.iter().enumerate() {
            if index > 0 && !self.batch_delay.is_zero() {
                tokio::time::sleep(self.batch_delay).await;
            }

            on_progress(index + 1, total);

            match self.transport.send(&job.document, endpoint).await {
                Ok(()) => report.success += 1,
                Err(error) => {
                    warn!(index, material_code = %job.material_code, error = %error, "标签投递失败");
                    report.failed += 1;
                    report.failures.push(BatchFailure {
                        index,
                        material_code: job.material_code.clone(),
                        error,
                    });
                }
            }
        }

        info!(
            success = report.success,
            failed = report.failed,
            "批量打印完成"
        );
        report
    }
}

/// 连接探测：在超时内能建立 TCP 连接即视为在线
#[instrument(fields(endpoint = %endpoint))]
pub async fn probe(endpoint: &PrinterEndpoint, timeout: Duration) -> DispatchResult<()> {
    let addr = resolve_endpoint(endpoint)?;

    match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
        Ok(Ok(_)) => {
            info!("打印机在线");
            Ok(())
        }
        Ok(Err(e)) => {
            warn!(error = %e, "打印机离线");
            Err(DispatchError::from_io(&e, endpoint))
        }
        Err(_) => {
            warn!("打印机探测超时");
            Err(DispatchError::Timeout {
                endpoint: endpoint.to_string(),
            })
        }
    }
}
