//! Connection and pool helpers for database access.

use diesel::sqlite::{Sqlite, SqliteConnection};
use diesel_async::{
    pooled_connection::{AsyncDieselConnectionManager, PoolError, bb8::Pool},
    sync_connection_wrapper::SyncConnectionWrapper,
};
use diesel_migrations::{EmbeddedMigrations, embed_migrations};

/// Database backend type.
pub type Backend = Sqlite;
/// Embedded database migrations.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/sqlite");
/// Connection type for database access.
pub type DbConnection = SyncConnectionWrapper<SqliteConnection>;
/// Connection pool type.
pub type DbPool = Pool<DbConnection>;

/// Create a pooled connection to the configured database.
///
/// # Errors
/// Returns any error reported by the underlying connection pool builder.
pub async fn establish_pool(database_url: &str) -> Result<DbPool, PoolError> {
    let config = AsyncDieselConnectionManager::<DbConnection>::new(database_url);
    Pool::builder().build(config).await
}
