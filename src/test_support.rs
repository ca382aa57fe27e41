//! Throwaway HTTP backend for adapter and dashboard tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Canned reply served to every connection.
#[derive(Clone)]
pub struct Reply {
    pub status: &'static str,
    pub body: &'static str,
    pub delay: Duration,
}

impl Reply {
    pub fn ok(body: &'static str) -> Self {
        Self { status: "200 OK", body, delay: Duration::ZERO }
    }

    pub fn status(status: &'static str) -> Self {
        Self { status, body: "", delay: Duration::ZERO }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Request lines seen by a [`serve`] backend, in arrival order.
pub type RequestLog = Arc<Mutex<Vec<String>>>;

/// Serve `reply` on an ephemeral port. Returns the `/api` base URL.
pub async fn serve(reply: Reply) -> (String, RequestLog) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen: RequestLog = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else { return };
            let reply = reply.clone();
            let log = Arc::clone(&log);
            tokio::spawn(async move {
                let mut buf = vec![0u8; 4096];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let head = String::from_utf8_lossy(&buf[..n]);
                if let Some(line) = head.lines().next() {
                    log.lock().unwrap().push(line.to_string());
                }
                tokio::time::sleep(reply.delay).await;
                let response = format!(
                    "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    reply.status,
                    reply.body.len(),
                    reply.body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });
    (format!("http://{addr}/api"), seen)
}
