//! Shared state handed to every Axum handler.

use crate::db::AsyncDbPool;
use crate::logger::LogLevelHandle;
use crate::repositories::Repositories;
use crate::services::Services;

/// Cheap to clone: services and the pool are reference counted.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    /// Present only with the postgres backend; used by the health checks
    pub db_pool: Option<AsyncDbPool>,
    /// Reported by `/health`
    pub version: String,
    /// Filter of the installed subscriber, absent when none was installed
    pub log_level: Option<LogLevelHandle>,
}

impl AppState {
    /// State backed by PostgreSQL.
    pub fn new(pool: AsyncDbPool, version: impl Into<String>) -> Self {
        let repos = Repositories::postgres(pool.clone());
        Self {
            services: Services::new(repos),
            db_pool: Some(pool),
            version: version.into(),
            log_level: None,
        }
    }

    /// State backed by the process-local store.
    pub fn in_memory(version: impl Into<String>) -> Self {
        Self {
            services: Services::new(Repositories::in_memory()),
            db_pool: None,
            version: version.into(),
            log_level: None,
        }
    }

    pub fn with_log_level(mut self, handle: LogLevelHandle) -> Self {
        self.log_level = Some(handle);
        self
    }

    pub fn storage_backend(&self) -> &'static str {
        if self.db_pool.is_some() {
            "postgres"
        } else {
            "memory"
        }
    }
}
