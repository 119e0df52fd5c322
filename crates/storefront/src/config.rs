//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_STORAGE_DIR` - Directory holding persisted client state (default: .shopfront)
//! - `STOREFRONT_CATALOG_PATH` - Product catalog JSON (default: crates/storefront/data/products.json)
//! - `STOREFRONT_CHECKOUT_DELAY_MS` - Simulated payment delay (default: 2000)
//! - `STOREFRONT_CATALOG_LATENCY_MIN_MS` - Lower bound of catalog latency (default: 200)
//! - `STOREFRONT_CATALOG_LATENCY_MAX_MS` - Upper bound of catalog latency (default: 400)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::catalog::Latency;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory for [`FileStorage`](crate::cart::FileStorage)
    pub storage_dir: PathBuf,
    /// Product catalog file
    pub catalog_path: PathBuf,
    /// Simulated payment round trip
    pub checkout_delay: Duration,
    /// Random delay applied to catalog queries
    pub catalog_latency: Latency,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let host: IpAddr = env.parse_or("STOREFRONT_HOST", "127.0.0.1")?;
        let port: u16 = env.parse_or("STOREFRONT_PORT", "3000")?;
        let storage_dir = PathBuf::from(env.get_or_default("STOREFRONT_STORAGE_DIR", ".shopfront"));
        let catalog_path = PathBuf::from(env.get_or_default(
            "STOREFRONT_CATALOG_PATH",
            "crates/storefront/data/products.json",
        ));

        let checkout_delay_ms: u64 = env.parse_or("STOREFRONT_CHECKOUT_DELAY_MS", "2000")?;
        let latency_min_ms: u64 = env.parse_or("STOREFRONT_CATALOG_LATENCY_MIN_MS", "200")?;
        let latency_max_ms: u64 = env.parse_or("STOREFRONT_CATALOG_LATENCY_MAX_MS", "400")?;

        Ok(Self {
            host,
            port,
            storage_dir,
            catalog_path,
            checkout_delay: Duration::from_millis(checkout_delay_ms),
            catalog_latency: Latency::from_millis(latency_min_ms, latency_max_ms),
            sentry_dsn: env.get_optional("SENTRY_DSN"),
            sentry_environment: env.get_optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a, F>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    /// Get an optional variable; empty values count as unset.
    fn get_optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.get_optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get_or_default(key, default)
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.storage_dir, PathBuf::from(".shopfront"));
        assert_eq!(config.checkout_delay, Duration::from_secs(2));
        assert_eq!(config.catalog_latency, Latency::default());
        assert_eq!(config.sentry_dsn, None);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("STOREFRONT_HOST", "0.0.0.0"),
            ("STOREFRONT_PORT", "8080"),
            ("STOREFRONT_CHECKOUT_DELAY_MS", "0"),
            ("STOREFRONT_CATALOG_LATENCY_MIN_MS", "0"),
            ("STOREFRONT_CATALOG_LATENCY_MAX_MS", "0"),
            ("SENTRY_ENVIRONMENT", "staging"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.checkout_delay, Duration::ZERO);
        assert_eq!(config.catalog_latency, Latency::NONE);
        assert_eq!(config.sentry_environment.as_deref(), Some("staging"));
    }

    #[test]
    fn test_empty_value_uses_default() {
        let config = load(&[("STOREFRONT_PORT", ""), ("SENTRY_DSN", "  ")]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.sentry_dsn, None);
    }

    #[test]
    fn test_invalid_number() {
        let err = load(&[("STOREFRONT_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "STOREFRONT_PORT"));

        let err = load(&[("STOREFRONT_CHECKOUT_DELAY_MS", "-5")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(..)));
    }

    #[test]
    fn test_invalid_host() {
        assert!(load(&[("STOREFRONT_HOST", "localhost:80")]).is_err());
    }
}
