//! Centralized configuration (environment variables + defaults).
//!
//! Loaded once at process start into [`Config`] and passed down explicitly.

use axum::http::HeaderValue;
use sqlx::postgres::PgConnectOptions;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration: {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub connect_options: PgConnectOptions,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl fmt::Debug for DatabaseConfig {
    // PgConnectOptions carries the password.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("connect_options", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum StoreBackend {
    Postgres(DatabaseConfig),
    Memory,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CorsOrigins {
    Any,
    List(Vec<HeaderValue>),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreBackend,
    pub bind_addr: SocketAddr,
    pub cors_origins: CorsOrigins,
    pub seed_sample_products: bool,
}

impl Config {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let store = match get("STORE").as_deref().map(str::trim) {
            None | Some("postgres") => StoreBackend::Postgres(database_config(&get)?),
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "STORE",
                    value: other.to_string(),
                })
            }
        };

        let bind_addr: SocketAddr = parse_or(
            "BIND_ADDR",
            get("BIND_ADDR"),
            DEFAULT_BIND_ADDR.parse().ok(),
        )?;
        let cors_origins = cors_origins(get("CORS_ALLOWED_ORIGINS"))?;
        let seed_sample_products = match get("SEED_SAMPLE_PRODUCTS") {
            None => true,
            Some(v) => parse_bool("SEED_SAMPLE_PRODUCTS", &v)?,
        };

        Ok(Self {
            store,
            bind_addr,
            cors_origins,
            seed_sample_products,
        })
    }
}

fn database_config<F>(get: &F) -> Result<DatabaseConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    // A full URL wins over the individual parts.
    let connect_options = match get("DATABASE_URL") {
        Some(url) => PgConnectOptions::from_str(&url).map_err(|_| ConfigError::Invalid {
            var: "DATABASE_URL",
            value: "<unparseable url>".to_string(),
        })?,
        None => {
            let host = get("DB_HOST").ok_or(ConfigError::Missing("DB_HOST"))?;
            let user = get("DB_USER").ok_or(ConfigError::Missing("DB_USER"))?;
            let name = get("DB_NAME").ok_or(ConfigError::Missing("DB_NAME"))?;
            let port: u16 = parse_or("DB_PORT", get("DB_PORT"), Some(DEFAULT_DB_PORT))?;
            let password = get("DB_PASSWORD").unwrap_or_default();

            PgConnectOptions::new()
                .host(&host)
                .port(port)
                .username(&user)
                .password(&password)
                .database(&name)
        }
    };

    let max_connections = parse_or::<u32>(
        "DB_MAX_CONNECTIONS",
        get("DB_MAX_CONNECTIONS"),
        Some(DEFAULT_MAX_CONNECTIONS),
    )?
    .max(1);
    let acquire_timeout_secs: u64 = parse_or(
        "DB_ACQUIRE_TIMEOUT_SECS",
        get("DB_ACQUIRE_TIMEOUT_SECS"),
        Some(DEFAULT_ACQUIRE_TIMEOUT_SECS),
    )?;

    Ok(DatabaseConfig {
        connect_options,
        max_connections,
        acquire_timeout: Duration::from_secs(acquire_timeout_secs),
    })
}

fn parse_or<T: FromStr>(
    var: &'static str,
    raw: Option<String>,
    default: Option<T>,
) -> Result<T, ConfigError> {
    match raw {
        Some(v) => v.trim().parse::<T>().map_err(|_| ConfigError::Invalid { var, value: v }),
        None => default.ok_or(ConfigError::Missing(var)),
    }
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: raw.to_string(),
        }),
    }
}

fn cors_origins(raw: Option<String>) -> Result<CorsOrigins, ConfigError> {
    let raw = raw.unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string());
    let entries: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if entries.iter().any(|s| *s == "*") {
        return Ok(CorsOrigins::Any);
    }

    let origins = entries
        .into_iter()
        .map(|s| {
            HeaderValue::from_str(s).map_err(|_| ConfigError::Invalid {
                var: "CORS_ALLOWED_ORIGINS",
                value: s.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CorsOrigins::List(origins))
}
