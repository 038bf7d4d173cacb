//! Embedded migration utilities.
//!
//! Migrations run once at service start-up, before the listener binds. A
//! missing or failed migration is a deployment precondition failure; no
//! request-time code probes the schema.

use std::{error::Error as StdError, fmt, time::Duration};

use diesel::result::Error as DieselError;
use diesel_migrations::MigrationHarness;
use thiserror::Error;
use tokio::time::timeout;
use tracing::info;

use super::connection::{DbConnection, MIGRATIONS};

const MIGRATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Failure to bring the schema up to date at start-up.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The migration harness rejected a migration.
    #[error("schema mismatch: {0}")]
    Mismatch(DieselError),
    /// Migrations did not complete within the allowed window.
    #[error("migration execution exceeded {0:?}")]
    Timeout(Duration),
}

#[derive(Debug)]
struct MigrationHarnessError(Box<dyn StdError + Send + Sync>);

impl fmt::Display for MigrationHarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "migration harness error: {}", self.0)
    }
}

impl StdError for MigrationHarnessError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> { Some(&*self.0) }
}

/// Run embedded database migrations.
///
/// # Errors
/// Returns a [`SchemaError`] if migrations fail or time out.
#[must_use = "handle the result"]
pub async fn run_migrations(conn: &mut DbConnection) -> Result<(), SchemaError> {
    timeout(
        MIGRATION_TIMEOUT,
        conn.spawn_blocking(|c| {
            if let Ok(false) = c.has_pending_migration(MIGRATIONS) {
                info!("no pending migrations; skipping apply");
                return Ok(());
            }
            info!("applying pending migrations");
            c.run_pending_migrations(MIGRATIONS)
                .map(|_| ())
                .map_err(|e: Box<dyn StdError + Send + Sync>| {
                    DieselError::SerializationError(Box::new(MigrationHarnessError(e)))
                })
        }),
    )
    .await
    .map_err(|_| SchemaError::Timeout(MIGRATION_TIMEOUT))?
    .map_err(SchemaError::Mismatch)
}
