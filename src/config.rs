use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;
use strum_macros::{Display, EnumString};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Which record kind this deployment serves at `/`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Variant {
    #[strum(to_string = "attendance", serialize = "aanwezigheid")]
    Attendance,
    #[strum(to_string = "leave", serialize = "verlof")]
    Leave,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Environment {
    Development,
    Production,
}

/// Process flags. Each one overrides its environment counterpart.
#[derive(Debug, Parser)]
#[command(name = "hrm-approvals", about = "Attendance and leave approval service")]
pub struct Cli {
    /// Interface to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind
    #[arg(long)]
    pub port: Option<u16>,

    /// Development mode: debug logging, CSRF checks off
    #[arg(long)]
    pub debug: bool,

    /// Print an argon2 hash for PASSWORD and exit
    #[arg(long, value_name = "PASSWORD")]
    pub hash_password: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub environment: Environment,
    pub variant: Variant,
    pub debug: bool,

    // Sessions
    pub session_ttl: Duration,
    pub session_cookie_name: String,
    pub session_cookie_secure: bool,

    pub enforce_leave_date_order: bool,
    pub run_migrations: bool,
    pub template_dir: String,
    pub db_max_connections: u32,
}

impl Config {
    /// Defaults for everything except the database location.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            server_host: "0.0.0.0".to_string(),
            server_port: 5000,
            environment: Environment::Production,
            variant: Variant::Attendance,
            debug: false,
            session_ttl: Duration::from_secs(24 * 60 * 60),
            session_cookie_name: "aanwezigheid_session".to_string(),
            session_cookie_secure: false,
            enforce_leave_date_order: false,
            run_migrations: true,
            template_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/templates").to_string(),
            db_max_connections: 10,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let defaults = Self::new(database_url);

        Ok(Self {
            server_host: env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_var("SERVER_PORT", defaults.server_port)?,
            environment: parse_var("APP_ENV", defaults.environment)?,
            variant: parse_var("APP_VARIANT", defaults.variant)?,
            session_ttl: session_ttl(parse_var(
                "SESSION_TTL_SECS",
                defaults.session_ttl.as_secs(),
            )?)?,
            session_cookie_name: env::var("SESSION_COOKIE_NAME")
                .unwrap_or(defaults.session_cookie_name),
            session_cookie_secure: parse_var(
                "SESSION_COOKIE_SECURE",
                defaults.session_cookie_secure,
            )?,
            enforce_leave_date_order: parse_var(
                "ENFORCE_LEAVE_DATE_ORDER",
                defaults.enforce_leave_date_order,
            )?,
            run_migrations: parse_var("RUN_MIGRATIONS", defaults.run_migrations)?,
            template_dir: env::var("TEMPLATE_DIR").unwrap_or(defaults.template_dir),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
            ..defaults
        })
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.server_host = host.clone();
        }
        if let Some(port) = cli.port {
            self.server_port = port;
        }
        if cli.debug {
            self.debug = true;
            self.environment = Environment::Development;
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// CSRF protection is off only in development.
    pub fn csrf_enabled(&self) -> bool {
        self.environment != Environment::Development
    }
}

/// Upper bound for `SESSION_TTL_SECS`: one year.
const MAX_SESSION_TTL_SECS: u64 = 366 * 24 * 60 * 60;

fn session_ttl(secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 || secs > MAX_SESSION_TTL_SECS {
        return Err(ConfigError::Invalid {
            key: "SESSION_TTL_SECS",
            value: secs.to_string(),
            reason: format!("must be between 1 and {MAX_SESSION_TTL_SECS} seconds"),
        });
    }
    Ok(Duration::from_secs(secs))
}

fn parse_var<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => {
            value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                key,
                value,
                reason: e.to_string(),
            })
        }
        _ => Ok(default),
    }
}
