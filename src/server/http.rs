//! Tokio-based HTTP runtime for the portal.
//!
//! Start-up seeds the connection pool and applies migrations before the
//! listener binds; a schema failure aborts the process instead of
//! surfacing per-request.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::{admin::argon2_from_config, cli::AppConfig};
use crate::{
    db::{DbPool, establish_pool, run_migrations},
    routes::{AppState, router},
};

/// Run the HTTP server using the supplied configuration.
///
/// # Errors
///
/// Returns any failure reported while seeding the database pool, binding
/// the socket, or serving inbound connections.
pub async fn serve(cfg: AppConfig) -> Result<()> {
    let argon2 = Arc::new(argon2_from_config(&cfg)?);
    let pool = setup_database(&cfg.database).await?;
    let state = Arc::new(AppState::new(pool, argon2));
    let app = router(state);

    let listener = TcpListener::bind(&cfg.bind).await?;
    info!(bind = %cfg.bind, "grantes listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Sets up the database connection pool and runs migrations.
///
/// # Errors
///
/// Returns an error when the pool cannot be built or the schema cannot be
/// brought up to date.
async fn setup_database(database: &str) -> Result<DbPool> {
    let pool = establish_pool(database).await?;
    {
        let mut conn = pool.get().await.context("failed to get db connection")?;
        run_migrations(&mut conn)
            .await
            .context("database schema is not up to date")?;
    }
    Ok(pool)
}

/// Waits for a shutdown signal, completing when termination is requested.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    res = tokio::signal::ctrl_c() => {
                        if let Err(err) = res {
                            warn!(%err, "failed to listen for Ctrl-C");
                        }
                    },
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                warn!(%err, "failed to install SIGTERM handler");
                wait_for_ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        wait_for_ctrl_c().await;
    }
    info!("shutdown signal received");
}

async fn wait_for_ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(%err, "failed to listen for Ctrl-C");
    }
}
