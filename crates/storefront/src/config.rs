//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `EMBERWICK_GUEST_CART_KEY` - Local-store key for the guest cart
//!   (default: `guest_cart`)

use thiserror::Error;

/// Default local-store key under which the guest cart blob is saved.
pub const DEFAULT_GUEST_CART_KEY: &str = "guest_cart";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Local-store key for the guest cart blob.
    pub guest_cart_key: String,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            guest_cart_key: DEFAULT_GUEST_CART_KEY.to_owned(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a set variable has an invalid value (blank
    /// guest cart key).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let guest_cart_key =
            get_env_or_default("EMBERWICK_GUEST_CART_KEY", DEFAULT_GUEST_CART_KEY);
        if guest_cart_key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "EMBERWICK_GUEST_CART_KEY".to_owned(),
                "must not be blank".to_owned(),
            ));
        }

        Ok(Self { guest_cart_key })
    }
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_guest_cart_key() {
        let config = StorefrontConfig::default();
        assert_eq!(config.guest_cart_key, "guest_cart");
    }

    #[test]
    fn test_get_env_or_default_falls_back() {
        assert_eq!(
            get_env_or_default("EMBERWICK_TEST_UNSET_VAR", "fallback"),
            "fallback"
        );
    }
}
