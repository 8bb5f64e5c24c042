//! `serve`: run the HTTP server, or only check its configuration.

use crate::config::{Settings, StorageBackend};
use crate::error::AppResult;
use crate::logger::LogLevelHandle;
use crate::server::Server;

pub struct ServeCommandHandler {
    config: Settings,
    log_handle: Option<LogLevelHandle>,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self {
            config,
            log_handle: None,
        }
    }

    pub fn with_log_handle(mut self, handle: Option<LogLevelHandle>) -> Self {
        self.log_handle = handle;
        self
    }

    /// Starts the server and blocks until shutdown, unless `dry_run` is set.
    pub async fn execute(self, dry_run: bool) -> AppResult<()> {
        if dry_run {
            return self.validate_only();
        }

        Server::new(self.config)
            .with_log_handle(self.log_handle)
            .run()
            .await?;
        Ok(())
    }

    /// Prints what the server would do with the current configuration.
    pub fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;

        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());
        match self.config.database.backend {
            StorageBackend::Postgres => {
                println!(
                    "✓ PostgreSQL pool of up to {} connections",
                    self.config.database.max_connections
                );
                if self.config.database.auto_migrate {
                    println!("✓ Pending migrations would be applied at startup");
                }
            }
            StorageBackend::Memory => {
                println!("! In-memory storage: data is lost on shutdown");
            }
        }
        println!("✓ Log level: {}", self.config.logger.level);

        println!("Dry run completed successfully");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
