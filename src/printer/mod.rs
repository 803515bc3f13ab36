// ==========================================
// 物料标签打印系统 - 打印投递层
// ==========================================
// 职责: ZPL 文档 → 网络打印机
// 约束: 批量顺序执行，失败分类上报，不做重试
// ==========================================

pub mod dispatcher;
pub mod error;
pub mod transport;

pub use dispatcher::{probe, BatchFailure, BatchPrintReport, PrintDispatcher, PrintJob};
pub use error::{DispatchError, DispatchResult};
pub use transport::{build_transport, resolve_endpoint, HttpTransport, PrintTransport, RawTcpTransport};
