//! `migrate`: apply, preview or revert the embedded schema migrations.

use crate::config::{Settings, StorageBackend};
use crate::db::{pending_migrations, revert_migrations, run_pending_migrations};
use crate::error::{AppError, AppResult};

pub struct MigrateCommandHandler {
    config: Settings,
}

impl MigrateCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    pub async fn execute(&self, dry_run: bool, rollback: Option<u32>) -> AppResult<()> {
        self.check_backend()?;
        self.config.database.validate()?;

        match (dry_run, rollback) {
            (true, _) => self.show_pending_migrations().await,
            (false, Some(steps)) => self.rollback_migrations(steps).await,
            (false, None) => self.run_migrations().await,
        }
    }

    fn check_backend(&self) -> AppResult<()> {
        if self.config.database.backend == StorageBackend::Memory {
            return Err(AppError::Validation {
                field: "database.backend".to_string(),
                reason: "Migrations only apply to the postgres backend".to_string(),
            });
        }
        Ok(())
    }

    async fn show_pending_migrations(&self) -> AppResult<()> {
        println!("Checking for pending migrations...");

        let pending = pending_migrations(&self.config.database.url).await?;
        if pending.is_empty() {
            println!("✓ No pending migrations - database is up to date");
            return Ok(());
        }

        println!("Found {} pending migration(s):", pending.len());
        for name in &pending {
            println!("  - {name}");
        }
        println!("\nRun without --dry-run to apply them");
        Ok(())
    }

    async fn run_migrations(&self) -> AppResult<()> {
        println!("Running database migrations...");

        let applied = run_pending_migrations(&self.config.database.url).await?;
        tracing::info!(count = applied.len(), migrations = ?applied, "Migrations applied");

        if applied.is_empty() {
            println!("✓ No migrations to apply - database is already up to date");
        } else {
            println!("✓ Applied {} migration(s):", applied.len());
            for version in &applied {
                println!("  - {version}");
            }
        }
        Ok(())
    }

    async fn rollback_migrations(&self, steps: u32) -> AppResult<()> {
        if steps == 0 {
            return Err(AppError::Validation {
                field: "rollback_steps".to_string(),
                reason: "Number of rollback steps must be greater than 0".to_string(),
            });
        }

        println!("Rolling back {steps} migration(s)...");

        let reverted = revert_migrations(&self.config.database.url, steps).await?;
        tracing::info!(count = reverted.len(), migrations = ?reverted, "Migrations reverted");

        println!("✓ Rolled back {} migration(s):", reverted.len());
        for version in &reverted {
            println!("  - {version}");
        }
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
