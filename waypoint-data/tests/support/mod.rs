//! A one-shot HTTP responder for exercising the adapters without a network.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::runtime::{Builder, Runtime};

/// Build the runtime a behaviour world drives its async calls on.
pub fn runtime() -> Runtime {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("test runtime should build")
}

/// Serves one canned response on a loopback port and records the request
/// line it received.
#[derive(Debug)]
pub struct CannedServer {
    pub base_url: String,
    request_line: Arc<Mutex<Option<String>>>,
}

impl CannedServer {
    /// Bind to an ephemeral port and answer the first connection with
    /// `status` and `body`. Must be called inside a runtime.
    pub async fn start(status: u16, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind loopback listener");
        let address = listener.local_addr().expect("listener address");
        let request_line = Arc::new(Mutex::new(None));
        let captured = Arc::clone(&request_line);
        let reply = format!(
            "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut received = Vec::new();
            let mut buffer = [0_u8; 1024];
            while !received.windows(4).any(|window| window == b"\r\n\r\n") {
                match socket.read(&mut buffer).await {
                    Ok(0) | Err(_) => break,
                    Ok(read) => received.extend_from_slice(buffer.get(..read).unwrap_or_default()),
                }
            }
            let text = String::from_utf8_lossy(&received);
            let line = text.lines().next().unwrap_or_default().to_owned();
            *captured.lock().unwrap_or_else(PoisonError::into_inner) = Some(line);

            if socket.write_all(reply.as_bytes()).await.is_ok() {
                let _shutdown = socket.shutdown().await;
            }
        });
        Self {
            base_url: format!("http://{address}"),
            request_line,
        }
    }

    /// The request line of the served request, e.g. `GET /api?q=x HTTP/1.1`.
    pub fn request_line(&self) -> Option<String> {
        self.request_line
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
