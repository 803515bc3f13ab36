// ==========================================
// 模拟打印机
// ==========================================
// 职责: 进程内 HTTP / RAW TCP 接收端、记录型投递通道
// ==========================================

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use material_label::domain::PrinterEndpoint;
use material_label::printer::{DispatchError, DispatchResult, PrintTransport};

/// 已接收的打印文档
pub type Received = Arc<Mutex<Vec<String>>>;

// ==========================================
// HTTP 接收端
// ==========================================

/// 启动 HTTP 模拟打印机，对每个请求返回指定状态码
pub async fn start_http_printer(status: u16) -> (SocketAddr, Received) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("绑定端口失败");
    let addr = listener.local_addr().expect("读取端口失败");
    let received: Received = Arc::new(Mutex::new(Vec::new()));

    let sink = received.clone();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let sink = sink.clone();
            tokio::spawn(async move {
                if let Some(body) = read_http_body(stream, status).await {
                    sink.lock().unwrap().push(body);
                }
            });
        }
    });

    (addr, received)
}

async fn read_http_body(mut stream: TcpStream, status: u16) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_header_end(&buf) {
            break pos;
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let body_start = header_end + 4;
    while buf.len() < body_start + content_length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let response = format!(
        "HTTP/1.1 {} Mock\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        status
    );
    stream.write_all(response.as_bytes()).await.ok()?;
    stream.shutdown().await.ok()?;

    let end = (body_start + content_length).min(buf.len());
    Some(String::from_utf8_lossy(&buf[body_start..end]).to_string())
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

/// 接受连接但从不应答（用于超时）
pub async fn start_silent_listener() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("绑定端口失败");
    let addr = listener.local_addr().expect("读取端口失败");
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    addr
}

/// 一个当前无人监听的本地端口（连接会被拒绝）
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("绑定端口失败");
    let port = listener.local_addr().expect("读取端口失败").port();
    drop(listener);
    port
}

// ==========================================
// RAW TCP 接收端
// ==========================================

/// 启动 RAW 模拟打印机（读到 EOF 为一份文档）
pub async fn start_raw_printer() -> (SocketAddr, Received) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("绑定端口失败");
    let addr = listener.local_addr().expect("读取端口失败");
    let received: Received = Arc::new(Mutex::new(Vec::new()));

    let sink = received.clone();
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let mut buf = Vec::new();
            if stream.read_to_end(&mut buf).await.is_ok() {
                sink.lock().unwrap().push(String::from_utf8_lossy(&buf).to_string());
            }
        }
    });

    (addr, received)
}

/// 等待接收端记录到指定数量的文档
pub async fn wait_for(received: &Received, count: usize) {
    for _ in 0..100 {
        if received.lock().unwrap().len() >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

// ==========================================
// 记录型投递通道
// ==========================================

/// 记录每次投递；第 n 次（从 1 起）在 fail_on 中时返回拒绝
pub struct RecordingTransport {
    pub sent: Mutex<Vec<(String, PrinterEndpoint)>>,
    fail_on: Vec<usize>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::failing_on(Vec::new())
    }

    pub fn failing_on(fail_on: Vec<usize>) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_on,
        }
    }

    pub fn documents(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(doc, _)| doc.clone())
            .collect()
    }
}

#[async_trait]
impl PrintTransport for RecordingTransport {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn send(&self, document: &str, endpoint: &PrinterEndpoint) -> DispatchResult<()> {
        let attempt = {
            let mut sent = self.sent.lock().unwrap();
            sent.push((document.to_string(), endpoint.clone()));
            sent.len()
        };
        if self.fail_on.contains(&attempt) {
            return Err(DispatchError::Rejected { status: 503 });
        }
        Ok(())
    }
}
