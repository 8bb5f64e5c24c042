//! Embedded schema migrations.
//!
//! diesel_migrations needs a synchronous connection, so every helper opens a
//! `PgConnection` on the blocking thread pool.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::error::{AppError, AppResult};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Names of migrations not yet applied.
pub async fn pending_migrations(database_url: &str) -> AppResult<Vec<String>> {
    with_connection(database_url, "check pending migrations", |conn| {
        conn.pending_migrations(MIGRATIONS)
            .map(|pending| pending.iter().map(|m| m.name().to_string()).collect())
    })
    .await
}

/// Applies everything pending and returns the applied versions.
pub async fn run_pending_migrations(database_url: &str) -> AppResult<Vec<String>> {
    with_connection(database_url, "run pending migrations", |conn| {
        conn.run_pending_migrations(MIGRATIONS)
            .map(|applied| applied.iter().map(|v| v.to_string()).collect())
    })
    .await
}

/// Reverts the last `steps` migrations, newest first.
///
/// A failure partway still reports which versions were already reverted.
pub async fn revert_migrations(database_url: &str, steps: u32) -> AppResult<Vec<String>> {
    with_connection(database_url, "revert migrations", move |conn| {
        revert_steps(steps, || {
            conn.revert_last_migration(MIGRATIONS)
                .map(|version| version.to_string())
        })
    })
    .await
}

fn revert_steps<F>(steps: u32, mut revert_one: F) -> HarnessResult<Vec<String>>
where
    F: FnMut() -> HarnessResult<String>,
{
    let mut reverted = Vec::with_capacity(steps as usize);
    for _ in 0..steps {
        match revert_one() {
            Ok(version) => reverted.push(version),
            Err(e) if reverted.is_empty() => return Err(e),
            Err(e) => {
                tracing::error!(
                    reverted = ?reverted,
                    requested = steps,
                    error = %e,
                    "Rollback stopped partway"
                );
                return Err(format!(
                    "{e} (already reverted: {})",
                    reverted.join(", ")
                )
                .into());
            }
        }
    }
    Ok(reverted)
}

type HarnessResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

async fn with_connection<T, F>(database_url: &str, operation: &'static str, f: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce(&mut PgConnection) -> HarnessResult<T> + Send + 'static,
{
    let database_url = database_url.to_string();

    tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&database_url).map_err(|e| AppError::Database {
            operation: "establish connection for migrations".to_string(),
            source: anyhow::anyhow!("Connection error: {e}"),
        })?;

        f(&mut conn).map_err(|e| AppError::Database {
            operation: operation.to_string(),
            source: anyhow::anyhow!("Migration error: {e}"),
        })
    })
    .await
    .map_err(|e| AppError::Internal {
        source: anyhow::Error::from(e),
    })?
}
