//! Console configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CONSOLE_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `CONSOLE_HOST` - Bind address (default: 127.0.0.1)
//! - `CONSOLE_PORT` - Listen port (default: 3002)
//! - `CONSOLE_DB_MAX_CONNECTIONS` - Connection pool size (default: 10)
//! - `CONSOLE_RAW_QUERY_ENABLED` - Enable the query console (default: true)
//! - `CONSOLE_RAW_QUERY_TIMEOUT_SECS` - Abort console queries after this many seconds
//! - `CONSOLE_SEED_ON_START` - Clear and regenerate sample data at startup (default: false)
//! - `CONSOLE_SEED_COUNT` - Records per collection when seeding (default: 100)
//! - `CONSOLE_LOG_JSON` - Emit JSON logs instead of text (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 1.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

use crate::seed::DEFAULT_SEED_COUNT;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Console application configuration.
///
/// Implements `Debug` manually to redact the database URL.
#[derive(Clone)]
pub struct ConsoleConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Maximum pooled database connections
    pub db_max_connections: u32,
    /// Query console settings
    pub raw_query: RawQueryConfig,
    /// Sample data seeding at startup
    pub seed: SeedConfig,
    /// Emit JSON logs
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl std::fmt::Debug for ConsoleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleConfig")
            .field("database_url", &"[REDACTED]")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("db_max_connections", &self.db_max_connections)
            .field("raw_query", &self.raw_query)
            .field("seed", &self.seed)
            .field("log_json", &self.log_json)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .field("sentry_environment", &self.sentry_environment)
            .finish_non_exhaustive()
    }
}

/// Query console configuration.
///
/// The console runs arbitrary store-native statements, reads and writes alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawQueryConfig {
    /// Whether `POST /` executes queries at all
    pub enabled: bool,
    /// Optional upper bound on a single query
    pub timeout: Option<Duration>,
}

impl Default for RawQueryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout: None,
        }
    }
}

/// Startup seeding configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedConfig {
    /// Clear and regenerate every collection at startup (destructive)
    pub on_start: bool,
    /// Records generated per collection
    pub count: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            on_start: false,
            count: DEFAULT_SEED_COUNT,
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("CONSOLE_DATABASE_URL")?;
        let host = parse_env("CONSOLE_HOST", "127.0.0.1")?;
        let port = parse_env("CONSOLE_PORT", "3002")?;
        let db_max_connections = parse_env("CONSOLE_DB_MAX_CONNECTIONS", "10")?;
        if db_max_connections == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "CONSOLE_DB_MAX_CONNECTIONS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let raw_query = RawQueryConfig::from_env()?;
        let seed = SeedConfig::from_env()?;
        let log_json = parse_bool_env("CONSOLE_LOG_JSON", false)?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            database_url,
            host,
            port,
            db_max_connections,
            raw_query,
            seed,
            log_json,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl RawQueryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let enabled = parse_bool_env("CONSOLE_RAW_QUERY_ENABLED", true)?;
        let timeout = get_optional_env("CONSOLE_RAW_QUERY_TIMEOUT_SECS")
            .map(|raw| {
                raw.parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .map(Duration::from_secs)
                    .ok_or_else(|| {
                        ConfigError::InvalidEnvVar(
                            "CONSOLE_RAW_QUERY_TIMEOUT_SECS".to_string(),
                            format!("expected a positive number of seconds, got '{raw}'"),
                        )
                    })
            })
            .transpose()?;

        Ok(Self { enabled, timeout })
    }
}

impl SeedConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            on_start: parse_bool_env("CONSOLE_SEED_ON_START", false)?,
            count: parse_env("CONSOLE_SEED_COUNT", &DEFAULT_SEED_COUNT.to_string())?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a boolean environment variable (`true`/`false`/`1`/`0`/`yes`/`no`).
fn parse_bool_env(key: &str, default: bool) -> Result<bool, ConfigError> {
    get_optional_env(key).map_or(Ok(default), |raw| parse_bool(key, &raw))
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}
