//! Test server harness for integration tests.
//!
//! Spins up the real relay router on a random port.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use flow_server::{build_router, AppState, CodeGenerator, RelayConfig};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A test server instance with control handles.
pub struct TestServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start the relay on a random available port.
    ///
    /// # Panics
    ///
    /// Panics if no port is available or server fails to bind.
    pub async fn start(mut config: RelayConfig, generator: Arc<dyn CodeGenerator>) -> Self {
        let port = portpicker::pick_unused_port().expect("no available port");
        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        config.port = port;

        let app = build_router(AppState::new(config, generator));

        let listener = TcpListener::bind(addr).await.expect("failed to bind");
        let actual_addr = listener.local_addr().expect("failed to get local addr");

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("server error");
        });

        // Give the server a moment to start
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        Self {
            addr: actual_addr,
            shutdown_tx: Some(shutdown_tx),
            handle,
        }
    }

    /// Full URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Shut down the server gracefully.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        let _ = tokio::time::timeout(tokio::time::Duration::from_secs(1), self.handle).await;
    }
}

/// Relay configuration staging uploads in `upload_dir`.
pub fn test_config(upload_dir: &Path, api_base_url: &str) -> RelayConfig {
    RelayConfig {
        api_key: Some("sk-test".to_string()),
        api_base_url: api_base_url.trim_end_matches('/').to_string(),
        upload_dir: upload_dir.to_path_buf(),
        ..RelayConfig::default()
    }
}

/// A tiny but well-formed PNG header, enough for MIME sniffing.
pub fn png_bytes() -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&[0u8; 24]);
    bytes
}

/// Number of entries in `dir`.
pub fn entries_in(dir: &Path) -> usize {
    std::fs::read_dir(dir).expect("read upload dir").count()
}
