//! Runtime configuration read from the environment.
//!
//! The binary loads a `.env` file with `dotenvy` first, so every key below can
//! live there during development.
//!
//! | Variable                      | Default          |
//! |-------------------------------|------------------|
//! | `DATABASE_URL`                | required         |
//! | `BIND_ADDR`                   | `127.0.0.1:3000` |
//! | `API_PREFIX`                  | `/api`           |
//! | `TOKEN_TTL_HOURS`             | `24`             |
//! | `TOKEN_CLEANUP_INTERVAL_SECS` | `3600`           |
//! | `DB_MAX_CONNECTIONS`          | `10`             |
//! | `DB_MIN_CONNECTIONS`          | `2`              |
//! | `DB_CONNECT_TIMEOUT_SECS`     | `10`             |

use std::{env, net::SocketAddr, str::FromStr, time::Duration};

use sea_orm::ConnectOptions;
use thiserror::Error;

/// Invalid or missing configuration value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key}={value:?} is invalid: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Server and database settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Path the API routes are nested under. Empty means the root.
    pub api_prefix: String,
    pub token_ttl: time::Duration,
    pub cleanup_interval: Duration,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
}

impl Config {
    /// Reads the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which returns the raw value
    /// of a variable if it is set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let bind_addr = parse_or(&lookup, "BIND_ADDR", SocketAddr::from(([127, 0, 0, 1], 3000)))?;
        let api_prefix = normalize_prefix(lookup("API_PREFIX").unwrap_or_else(|| "/api".into()))?;

        let ttl_hours: u32 = parse_or(&lookup, "TOKEN_TTL_HOURS", 24)?;
        if ttl_hours == 0 {
            return Err(invalid("TOKEN_TTL_HOURS", "0", "must be at least 1"));
        }

        let cleanup_secs: u64 = parse_or(&lookup, "TOKEN_CLEANUP_INTERVAL_SECS", 3600)?;
        if cleanup_secs == 0 {
            return Err(invalid("TOKEN_CLEANUP_INTERVAL_SECS", "0", "must be at least 1"));
        }

        let max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?;
        let min_connections = parse_or(&lookup, "DB_MIN_CONNECTIONS", 2)?;
        if min_connections > max_connections {
            return Err(invalid(
                "DB_MIN_CONNECTIONS",
                &min_connections.to_string(),
                "exceeds DB_MAX_CONNECTIONS",
            ));
        }

        let connect_timeout_secs = parse_or(&lookup, "DB_CONNECT_TIMEOUT_SECS", 10)?;

        Ok(Self {
            database_url,
            bind_addr,
            api_prefix,
            token_ttl: time::Duration::hours(i64::from(ttl_hours)),
            cleanup_interval: Duration::from_secs(cleanup_secs),
            max_connections,
            min_connections,
            connect_timeout: Duration::from_secs(connect_timeout_secs),
        })
    }

    /// Builds Sea-ORM connection options for the configured database.
    pub fn connect_options(&self) -> ConnectOptions {
        let mut opt = ConnectOptions::new(self.database_url.clone());
        opt.max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(self.connect_timeout)
            .acquire_timeout(self.connect_timeout)
            .idle_timeout(Duration::from_secs(10 * 60))
            .max_lifetime(Duration::from_secs(30 * 60));
        opt
    }
}

fn parse_or<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| invalid(key, &raw, &e.to_string())),
        None => Ok(default),
    }
}

fn normalize_prefix(raw: String) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    if !trimmed.starts_with('/') {
        return Err(invalid("API_PREFIX", &raw, "must start with '/'"));
    }
    Ok(trimmed.to_owned())
}

fn invalid(key: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_owned(),
        reason: reason.to_owned(),
    }
}
