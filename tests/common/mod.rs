//! Shared setup for the integration tests: a real server on a random port
//! backed by the in-memory store.

#![allow(dead_code)]

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use widgets_rs::api::routes::create_router;
use widgets_rs::config::{ServerConfig, Settings, StorageBackend};
use widgets_rs::server::Server;
use widgets_rs::AppState;

pub struct TestServer {
    pub base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<anyhow::Result<()>>>,
}

impl TestServer {
    /// Runs the full [`Server`] lifecycle on `127.0.0.1:0`.
    pub async fn start() -> Self {
        let mut settings = Settings::default();
        settings.database.backend = StorageBackend::Memory;
        settings.application.version = "0.0.0-test".to_string();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let (tx, rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(Server::new(settings).serve(listener, async move {
            let _ = rx.await;
        }));

        Self {
            base_url,
            shutdown: Some(tx),
            handle: Some(handle),
        }
    }

    /// Only the router, with custom server settings (timeouts, CORS).
    pub async fn with_router(server: ServerConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let router = create_router(AppState::in_memory("0.0.0-test"), &server);

        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await?;
            Ok(())
        });

        Self {
            base_url,
            shutdown: None,
            handle: Some(handle),
        }
    }

    pub fn api(&self, path: &str) -> String {
        format!("{}/api/widgets{path}", self.base_url)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Stops the server and waits for it to finish.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
            if let Some(handle) = self.handle.take() {
                handle.await.unwrap().unwrap();
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
