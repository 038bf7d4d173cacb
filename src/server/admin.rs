//! Administrative command handlers.
//!
//! These run once and exit; they share the configuration surface and
//! password-hashing parameters with the HTTP runtime so an account
//! created here verifies identically at login.

use anyhow::{Context, Result, anyhow};
use argon2::{Algorithm, Argon2, ParamsBuilder, Version};
use chrono::Utc;
use diesel_async::AsyncConnection;

use super::cli::{AppConfig, Commands, CreateAdminArgs};
use crate::{
    db::{DbConnection, create_admin, run_migrations},
    models::NewAdmin,
    passwords::hash_password,
};

/// Execute an administrative command.
///
/// # Errors
///
/// Propagates failures from configuration or database operations.
pub async fn run_command(command: Commands, cfg: &AppConfig) -> Result<()> {
    match command {
        Commands::CreateAdmin(args) => run_create_admin(args, cfg).await,
    }
}

/// Build an Argon2 instance using the supplied configuration parameters.
///
/// # Errors
///
/// Returns any error emitted while constructing the Argon2 parameter set.
pub fn argon2_from_config(cfg: &AppConfig) -> Result<Argon2<'static>> {
    let params = ParamsBuilder::new()
        .m_cost(cfg.argon2_m_cost)
        .t_cost(cfg.argon2_t_cost)
        .p_cost(cfg.argon2_p_cost)
        .build()
        .with_context(|| {
            format!(
                "invalid Argon2 params derived from config: m_cost={}, t_cost={}, p_cost={}",
                cfg.argon2_m_cost, cfg.argon2_t_cost, cfg.argon2_p_cost
            )
        })?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

async fn run_create_admin(args: CreateAdminArgs, cfg: &AppConfig) -> Result<()> {
    let email = args.email.ok_or_else(|| anyhow!("missing email"))?;
    let password = args.password.ok_or_else(|| anyhow!("missing password"))?;

    let argon2 = argon2_from_config(cfg)?;
    let hashed = hash_password(&argon2, &password)?;
    let new_admin = NewAdmin {
        email: &email,
        password: &hashed,
        created_at: Utc::now().naive_utc(),
    };
    let mut conn = DbConnection::establish(&cfg.database).await?;
    run_migrations(&mut conn)
        .await
        .context("database schema is not up to date")?;
    create_admin(&mut conn, &new_admin)
        .await
        .with_context(|| format!("failed to create administrator '{email}'"))?;
    println!("Administrator {email} created");
    Ok(())
}
