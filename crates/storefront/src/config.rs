//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `CART_STORAGE_PATH` - JSON file backing the cart (default: .imprenta/storage.json)
//! - `CART_STORAGE_KEY` - Key the cart is stored under (default: imprenta-avatar-cart)
//! - `CART_QUANTITY_DELAY_MS` - Pause before a quantity change lands (default: 300)
//! - `CART_REMOVE_DELAY_MS` - Pause before a removal lands (default: 400)
//! - `CART_CLEAR_DELAY_MS` - Pause before the cart is cleared (default: 500)
//! - `CART_CHECKOUT_NOTICE_DELAY_MS` - Pause before the checkout notice (default: 1000)
//! - `SLIDER_SIMULATE_LATENCY` - Add 300-500 ms to slider calls (default: true)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::cart::DEFAULT_STORAGE_KEY;
use crate::components::UiDelays;
use crate::services::slider::Latency;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
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
    /// File holding the persisted cart
    pub storage_path: PathBuf,
    /// Key the cart line items are stored under
    pub storage_key: String,
    /// UI pauses applied by cart components
    pub delays: UiDelays,
    /// Whether slider calls get simulated network latency
    pub simulate_slider_latency: bool,
    /// Sentry error tracking configuration
    pub sentry: SentryConfig,
}

/// Sentry client settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SentryConfig {
    pub dsn: Option<String>,
    pub environment: Option<String>,
    pub sample_rate: f32,
    pub traces_sample_rate: f32,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to a value that does not
    /// parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);

        let delays = UiDelays {
            quantity: env.millis_or("CART_QUANTITY_DELAY_MS", 300)?,
            remove: env.millis_or("CART_REMOVE_DELAY_MS", 400)?,
            clear: env.millis_or("CART_CLEAR_DELAY_MS", 500)?,
            checkout_notice: env.millis_or("CART_CHECKOUT_NOTICE_DELAY_MS", 1000)?,
        };

        Ok(Self {
            host: env.parse_or("STOREFRONT_HOST", "127.0.0.1")?,
            port: env.parse_or("STOREFRONT_PORT", "3000")?,
            storage_path: PathBuf::from(env.or_default("CART_STORAGE_PATH", ".imprenta/storage.json")),
            storage_key: env.or_default("CART_STORAGE_KEY", DEFAULT_STORAGE_KEY),
            delays,
            simulate_slider_latency: env.parse_or("SLIDER_SIMULATE_LATENCY", "true")?,
            sentry: SentryConfig {
                dsn: env.optional("SENTRY_DSN"),
                environment: env.optional("SENTRY_ENVIRONMENT"),
                sample_rate: env.parse_or("SENTRY_SAMPLE_RATE", "1.0")?,
                traces_sample_rate: env.parse_or("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
            },
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Latency applied by the simulated slider service.
    #[must_use]
    pub const fn slider_latency(&self) -> Latency {
        if self.simulate_slider_latency {
            Latency::NETWORK
        } else {
            Latency::None
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get an optional variable. Blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(key, default)
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    fn millis_or(&self, key: &str, default: u64) -> Result<Duration, ConfigError> {
        self.parse_or::<u64>(key, &default.to_string())
            .map(Duration::from_millis)
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
        assert_eq!(config.storage_path, PathBuf::from(".imprenta/storage.json"));
        assert_eq!(config.storage_key, "imprenta-avatar-cart");
        assert_eq!(config.delays, UiDelays::default());
        assert_eq!(config.slider_latency(), Latency::NETWORK);
        assert!(config.sentry.dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("STOREFRONT_PORT", "8080"),
            ("CART_CLEAR_DELAY_MS", "0"),
            ("SLIDER_SIMULATE_LATENCY", "false"),
            ("SENTRY_DSN", "https://key@sentry.example/1"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.delays.clear, Duration::ZERO);
        assert_eq!(config.slider_latency(), Latency::None);
        assert!(config.sentry.dsn.is_some());
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = load(&[("SENTRY_DSN", "  "), ("STOREFRONT_PORT", "")]).unwrap();
        assert!(config.sentry.dsn.is_none());
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("STOREFRONT_PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "STOREFRONT_PORT"));
    }

    #[test]
    fn test_invalid_delay() {
        let err = load(&[("CART_REMOVE_DELAY_MS", "-1")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "CART_REMOVE_DELAY_MS"));
    }
}
