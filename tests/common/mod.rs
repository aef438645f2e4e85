//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use sideshift_client::config::{ClientConfig, RetryConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// What the backend does with one connection.
pub enum Reply {
    /// Answer with a status and JSON body.
    Json(u16, String),
    /// Read the request, then close without answering.
    Drop,
}

/// A raw TCP backend; every request is recorded as text.
pub struct Backend {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl Backend {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

/// Start a programmable backend on an ephemeral port. `f` receives the
/// 0-based connection index.
pub async fn start_programmable_backend<F, Fut>(f: F) -> Backend
where
    F: Fn(usize) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Reply> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = requests.clone();
    let f = Arc::new(f);

    tokio::spawn(async move {
        let mut index = 0;
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            let recorded = recorded.clone();
            let current = index;
            index += 1;

            tokio::spawn(async move {
                let raw = match read_request(&mut socket).await {
                    Ok(raw) => raw,
                    Err(_) => return,
                };
                recorded.lock().unwrap().push(raw);

                match f(current).await {
                    Reply::Json(status, body) => {
                        let response = format!(
                            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status,
                            reason(status),
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    }
                    Reply::Drop => drop(socket),
                }
            });
        }
    });

    Backend { addr, requests }
}

/// Backend that always answers with the same status and body.
pub async fn start_mock_backend(status: u16, body: &'static str) -> Backend {
    start_programmable_backend(move |_| async move { Reply::Json(status, body.to_string()) }).await
}

/// An address nothing listens on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Client config pointing at `base_url` with millisecond backoff.
pub fn fast_config(base_url: String, max_retries: u32) -> ClientConfig {
    ClientConfig::new("test-secret", "test-id")
        .with_base_url(base_url)
        .with_retries(RetryConfig {
            max_retries,
            base_delay_ms: 10,
            backoff_multiplier: 2.0,
            cap_delay_ms: 100,
        })
}

async fn read_request(socket: &mut TcpStream) -> std::io::Result<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                break;
            }
        }
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
