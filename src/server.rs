//! HTTP server lifecycle: storage setup, binding and graceful shutdown.

use std::future::Future;

use tokio::net::TcpListener;
use tokio::signal;

use crate::api::routes::create_router;
use crate::config::{Environment, Settings, StorageBackend};
use crate::db::{establish_async_connection_pool, run_pending_migrations};
use crate::logger::LogLevelHandle;
use crate::state::AppState;

pub struct Server {
    settings: Settings,
    log_handle: Option<LogLevelHandle>,
}

impl Server {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            log_handle: None,
        }
    }

    /// Exposes the subscriber's filter through `/api/logging/level`.
    pub fn with_log_handle(mut self, handle: Option<LogLevelHandle>) -> Self {
        self.log_handle = handle;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Binds the configured address and serves until Ctrl+C / SIGTERM.
    pub async fn run(self) -> anyhow::Result<()> {
        let address = self.settings.server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind to {address}: {e}")
        })?;

        self.serve(listener, shutdown_signal()).await
    }

    /// Serves on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.log_configuration();

        let state = self.build_state().await?;
        let router = create_router(state, &self.settings.server);

        tracing::info!(address = %listener.local_addr()?, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Opens the configured storage backend, migrating first when asked to.
    pub async fn build_state(&self) -> anyhow::Result<AppState> {
        let state = self.open_storage().await?;
        Ok(match &self.log_handle {
            Some(handle) => state.with_log_level(handle.clone()),
            None => state,
        })
    }

    async fn open_storage(&self) -> anyhow::Result<AppState> {
        let version = self.settings.application.version.clone();
        let database = &self.settings.database;

        match database.backend {
            StorageBackend::Memory => {
                tracing::warn!("Using the in-memory backend; data is lost on shutdown");
                Ok(AppState::in_memory(version))
            }
            StorageBackend::Postgres => {
                if database.auto_migrate {
                    let applied = run_pending_migrations(&database.url).await?;
                    tracing::info!(count = applied.len(), migrations = ?applied, "Migrations applied");
                }

                tracing::info!("Initializing database connection pool...");
                let pool = establish_async_connection_pool(database).await?;
                tracing::info!(
                    max_connections = database.max_connections,
                    "Database connection pool initialized"
                );

                Ok(AppState::new(pool, version))
            }
        }
    }

    fn log_configuration(&self) {
        let settings = &self.settings;

        tracing::info!(
            app_name = %settings.application.name,
            app_version = %settings.application.version,
            environment = %Environment::from_env().as_str(),
            "Application starting"
        );

        tracing::info!(
            host = %settings.server.host,
            port = settings.server.port,
            request_timeout = settings.server.request_timeout,
            cors_origins = ?settings.server.cors_origins,
            "Server configuration loaded"
        );

        // The URL may carry credentials
        tracing::info!(
            backend = settings.database.backend.as_str(),
            max_connections = settings.database.max_connections,
            min_connections = settings.database.min_connections,
            connection_timeout = settings.database.connection_timeout,
            auto_migrate = settings.database.auto_migrate,
            "Database configuration loaded"
        );

        tracing::info!(
            level = %settings.logger.level,
            console_enabled = settings.logger.console.enabled,
            file_enabled = settings.logger.file.enabled,
            "Logger configuration loaded"
        );
    }
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_settings() -> Settings {
        let mut settings = Settings::default();
        settings.database.backend = StorageBackend::Memory;
        settings
    }

    #[tokio::test]
    async fn test_memory_backend_state_has_no_pool() {
        let state = Server::new(memory_settings()).build_state().await.unwrap();
        assert!(state.db_pool.is_none());
        assert_eq!(state.storage_backend(), "memory");
    }

    #[tokio::test]
    async fn test_log_handle_reaches_state() {
        let (handle, _subscriber) = crate::logger::detached_handle("warn");
        let state = Server::new(memory_settings())
            .with_log_handle(Some(handle))
            .build_state()
            .await
            .unwrap();

        let attached = state.log_level.expect("handle should be attached");
        assert_eq!(attached.current_level().as_deref(), Some("warn"));
    }

    #[tokio::test]
    async fn test_serve_stops_on_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let handle = tokio::spawn(Server::new(memory_settings()).serve(listener, async move {
            let _ = rx.await;
        }));

        tx.send(()).unwrap();
        assert!(handle.await.unwrap().is_ok());
    }
}
