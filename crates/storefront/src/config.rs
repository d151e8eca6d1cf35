//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_API_URL` - Base URL of the CircuitFab backend API
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: http://localhost:3000)
//! - `STOREFRONT_CLEAR_CART_ON_LOGOUT` - Clear cart/wishlist on logout (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Backend API configuration
    pub backend: BackendConfig,
    /// Session behavior policy
    pub session: SessionPolicy,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Backend API configuration.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the backend API (e.g., <http://localhost:8000>).
    ///
    /// Stored without a trailing slash so endpoint paths concatenate cleanly.
    pub base_url: String,
}

/// Session behavior policy.
///
/// Cart and wishlist are independent of the authenticated session; whether
/// logout also empties them is deliberately configurable rather than
/// hardcoded either way.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionPolicy {
    /// Clear the cart and wishlist collections when the user logs out.
    pub clear_cart_on_logout: bool,
}

impl StorefrontConfig {
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

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = validate_url(
            "STOREFRONT_BASE_URL",
            get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000"),
        )?;

        let backend = BackendConfig::from_env()?;
        let session = SessionPolicy::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            host,
            port,
            base_url,
            backend,
            session,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl BackendConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = validate_url("STOREFRONT_API_URL", get_required_env("STOREFRONT_API_URL")?)?;
        Ok(Self { base_url })
    }
}

impl SessionPolicy {
    fn from_env() -> Result<Self, ConfigError> {
        let clear_cart_on_logout = parse_bool(
            "STOREFRONT_CLEAR_CART_ON_LOGOUT",
            &get_env_or_default("STOREFRONT_CLEAR_CART_ON_LOGOUT", "false"),
        )?;
        Ok(Self {
            clear_cart_on_logout,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate a URL-valued variable and strip any trailing slash.
fn validate_url(key: &str, value: String) -> Result<String, ConfigError> {
    Url::parse(&value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    Ok(value.trim_end_matches('/').to_string())
}

/// Parse a boolean-valued variable.
///
/// Accepts `true`/`false`, `1`/`0`, `yes`/`no` (case-insensitive).
fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_accepts_common_spellings() {
        assert!(parse_bool("X", "true").unwrap());
        assert!(parse_bool("X", "TRUE").unwrap());
        assert!(parse_bool("X", "1").unwrap());
        assert!(parse_bool("X", "yes").unwrap());
        assert!(!parse_bool("X", "false").unwrap());
        assert!(!parse_bool("X", "0").unwrap());
        assert!(!parse_bool("X", "no").unwrap());
    }

    #[test]
    fn test_parse_bool_rejects_garbage() {
        let err = parse_bool("STOREFRONT_CLEAR_CART_ON_LOGOUT", "maybe").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_validate_url_strips_trailing_slash() {
        let url = validate_url("X", "http://localhost:8000/".to_string()).unwrap();
        assert_eq!(url, "http://localhost:8000");
    }

    #[test]
    fn test_validate_url_rejects_garbage() {
        assert!(validate_url("X", "not a url".to_string()).is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            backend: BackendConfig {
                base_url: "http://localhost:8000".to_string(),
            },
            session: SessionPolicy::default(),
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }
}
