//! Command-line interface and configuration for the portal server.
//!
//! Configuration layers in the usual order: built-in defaults, then a
//! `grantes.toml` file, then `GRANTES_`-prefixed environment variables,
//! with explicit CLI flags winning over everything.

use argon2::Params;
use clap::{Args, Parser, Subcommand};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

/// Arguments for the `create-admin` administrative subcommand.
#[derive(Args, Default, Debug, Clone)]
pub struct CreateAdminArgs {
    /// Email address for the new administrator account.
    pub email: Option<String>,
    /// Password for the new administrator account.
    pub password: Option<String>,
}

/// CLI subcommands exposed by `grantes`.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create a new administrator account.
    #[command(name = "create-admin")]
    CreateAdmin(CreateAdminArgs),
}

/// Runtime configuration shared by the server and admin commands.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Server bind address.
    pub bind: String,
    /// Database connection string or path.
    pub database: String,
    /// Argon2 memory cost parameter.
    pub argon2_m_cost: u32,
    /// Argon2 time cost parameter.
    pub argon2_t_cost: u32,
    /// Argon2 parallelism cost parameter.
    pub argon2_p_cost: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_owned(),
            database: "grantes.db".to_owned(),
            argon2_m_cost: Params::DEFAULT_M_COST,
            argon2_t_cost: Params::DEFAULT_T_COST,
            argon2_p_cost: Params::DEFAULT_P_COST,
        }
    }
}

impl AppConfig {
    /// Resolve the effective configuration beneath the parsed CLI.
    ///
    /// # Errors
    /// Returns any error reported while reading or merging the file and
    /// environment layers.
    pub fn load(cli: &Cli) -> Result<Self, figment::Error> {
        let mut cfg: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file("grantes.toml"))
            .merge(Env::prefixed("GRANTES_"))
            .extract()?;
        if let Some(bind) = &cli.bind {
            cfg.bind = bind.clone();
        }
        if let Some(database) = &cli.database {
            cfg.database = database.clone();
        }
        if let Some(m_cost) = cli.argon2_m_cost {
            cfg.argon2_m_cost = m_cost;
        }
        if let Some(t_cost) = cli.argon2_t_cost {
            cfg.argon2_t_cost = t_cost;
        }
        if let Some(p_cost) = cli.argon2_p_cost {
            cfg.argon2_p_cost = p_cost;
        }
        Ok(cfg)
    }
}

/// Top-level CLI entry point consumed by the binary.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Cli {
    /// Server bind address.
    #[arg(long)]
    pub bind: Option<String>,
    /// Database connection string or path.
    #[arg(long)]
    pub database: Option<String>,
    /// Argon2 memory cost parameter.
    #[arg(long)]
    pub argon2_m_cost: Option<u32>,
    /// Argon2 time cost parameter.
    #[arg(long)]
    pub argon2_t_cost: Option<u32>,
    /// Argon2 parallelism cost parameter.
    #[arg(long)]
    pub argon2_p_cost: Option<u32>,
    /// Optional subcommand.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use figment::Jail;
    use rstest::rstest;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(args)
    }

    #[rstest]
    fn env_config_loading() {
        Jail::expect_with(|j| {
            j.set_env("GRANTES_BIND", "127.0.0.1:8000");
            j.set_env("GRANTES_DATABASE", "env.db");
            let cfg = AppConfig::load(&parse(&["grantes"])).expect("load");
            assert_eq!(cfg.bind, "127.0.0.1:8000");
            assert_eq!(cfg.database, "env.db");
            Ok(())
        });
    }

    #[rstest]
    fn cli_overrides_env() {
        Jail::expect_with(|j| {
            j.set_env("GRANTES_BIND", "127.0.0.1:8000");
            let cfg = AppConfig::load(&parse(&["grantes", "--bind", "0.0.0.0:9000"])).expect("load");
            assert_eq!(cfg.bind, "0.0.0.0:9000");
            Ok(())
        });
    }

    #[rstest]
    fn loads_from_config_file() {
        Jail::expect_with(|j| {
            j.create_file("grantes.toml", "bind = \"1.2.3.4:1111\"")?;
            let cfg = AppConfig::load(&parse(&["grantes"])).expect("load");
            assert_eq!(cfg.bind, "1.2.3.4:1111");
            Ok(())
        });
    }

    #[rstest]
    fn env_overrides_config_file() {
        Jail::expect_with(|j| {
            j.create_file("grantes.toml", "database = \"file.db\"")?;
            j.set_env("GRANTES_DATABASE", "env.db");
            let cfg = AppConfig::load(&parse(&["grantes"])).expect("load");
            assert_eq!(cfg.database, "env.db");
            Ok(())
        });
    }

    #[rstest]
    fn argon2_cli_override() {
        Jail::expect_with(|_j| {
            let cfg = AppConfig::load(&parse(&["grantes", "--argon2-m-cost", "1024"])).expect("load");
            assert_eq!(cfg.argon2_m_cost, 1024);
            Ok(())
        });
    }
}
