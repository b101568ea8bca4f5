//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CART_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `CART_HOST` - Bind address (default: 127.0.0.1)
//! - `CART_PORT` - Listen port (default: 5120)
//! - `CART_ACCESS_KEYS` - Comma-separated `key:user_id` pairs (default: development keys)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)
//! - `LOG_FORMAT` - `json` for JSON log lines (read by the binary; default: text)
//! - `RUST_LOG` - Log filter (default: `cart_server=info,tower_http=debug`)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

use cart_core::UserId;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// A configured access key and the user it resolves to.
///
/// Implements `Debug` manually to redact the key.
#[derive(Clone)]
pub struct AccessKeyConfig {
    /// The opaque key presented by clients.
    pub key: SecretString,
    /// User the key belongs to.
    pub user_id: UserId,
}

impl std::fmt::Debug for AccessKeyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessKeyConfig")
            .field("key", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .finish()
    }
}

/// Cart server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Access keys accepted by the API; `None` means the development set
    pub access_keys: Option<Vec<AccessKeyConfig>>,
    /// Sentry error tracking configuration
    pub sentry: SentryConfig,
}

/// Sentry error tracking configuration.
#[derive(Debug, Clone)]
pub struct SentryConfig {
    /// Sentry DSN; tracking is disabled when absent
    pub dsn: Option<String>,
    /// Environment tag (e.g. "production")
    pub environment: Option<String>,
    /// Fraction of errors to send
    pub sample_rate: f32,
    /// Fraction of transactions to trace
    pub traces_sample_rate: f32,
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            dsn: None,
            environment: None,
            sample_rate: 1.0,
            traces_sample_rate: 0.0,
        }
    }
}

impl ServerConfig {
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

        let database_url = get_database_url("CART_DATABASE_URL")?;
        let host = get_env_or_default("CART_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("CART_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("CART_PORT", "5120")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("CART_PORT".to_string(), e.to_string()))?;
        let access_keys = get_optional_env("CART_ACCESS_KEYS")
            .map(|raw| parse_access_keys(&raw))
            .transpose()?;
        let sentry = SentryConfig::from_env()?;

        Ok(Self {
            database_url,
            host,
            port,
            access_keys,
            sentry,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl SentryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            dsn: get_optional_env("SENTRY_DSN"),
            environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sample_rate: get_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            traces_sample_rate: get_rate("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse `key:user_id` pairs separated by commas.
///
/// Whitespace around entries is ignored; empty entries are skipped.
fn parse_access_keys(raw: &str) -> Result<Vec<AccessKeyConfig>, ConfigError> {
    let invalid = |msg: String| ConfigError::InvalidEnvVar("CART_ACCESS_KEYS".to_string(), msg);

    let mut keys = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (key, user) = entry
            .split_once(':')
            .ok_or_else(|| invalid("expected entries of the form key:user_id".to_string()))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(invalid("access key cannot be empty".to_string()));
        }
        let user_id: UserId = user
            .trim()
            .parse()
            .map_err(|e| invalid(format!("invalid user id for key: {e}")))?;
        if user_id.is_zero() {
            return Err(invalid("user id cannot be zero".to_string()));
        }
        keys.push(AccessKeyConfig {
            key: SecretString::from(key.to_string()),
            user_id,
        });
    }

    if keys.is_empty() {
        return Err(invalid("no access keys configured".to_string()));
    }
    Ok(keys)
}

/// Parse a sample rate in `[0.0, 1.0]`.
fn get_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    let Some(raw) = get_optional_env(key) else {
        return Ok(default);
    };
    let rate = raw
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ));
    }
    Ok(rate)
}

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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_parse_access_keys() {
        let keys = parse_access_keys("abc:1, def:12 ,").unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].key.expose_secret(), "abc");
        assert_eq!(keys[0].user_id, UserId::new(1));
        assert_eq!(keys[1].key.expose_secret(), "def");
        assert_eq!(keys[1].user_id, UserId::new(12));
    }

    #[test]
    fn test_parse_access_keys_missing_separator() {
        let err = parse_access_keys("abc").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_parse_access_keys_bad_user() {
        assert!(parse_access_keys("abc:one").is_err());
        assert!(parse_access_keys("abc:0").is_err());
        assert!(parse_access_keys(":5").is_err());
    }

    #[test]
    fn test_parse_access_keys_empty() {
        assert!(parse_access_keys(" , ").is_err());
    }

    #[test]
    fn test_access_key_debug_redacts_key() {
        let keys = parse_access_keys("super_secret_key:3").unwrap();
        let debug_output = format!("{keys:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_key"));
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 5120,
            access_keys: None,
            sentry: SentryConfig::default(),
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 5120);
    }
}
