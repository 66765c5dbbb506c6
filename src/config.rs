//! Client configuration management.
//!
//! This module handles loading gateway credentials from environment variables.
//! It uses the `envy` crate to deserialize `BRAINTREE_*` variables into a type-safe struct.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Braintree environment the client talks to.
///
/// Each environment has a fixed gateway host. Test-only operations
/// (see [`crate::services::testing_service`]) are rejected in [`Environment::Production`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local gateway, used when running Braintree's own stack
    Development,

    /// Sandbox gateway for integration testing
    #[default]
    Sandbox,

    /// Live gateway
    Production,
}

impl Environment {
    /// Gateway base URL for this environment.
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Development => "http://localhost:3000",
            Environment::Sandbox => "https://api.sandbox.braintreegateway.com:443",
            Environment::Production => "https://api.braintreegateway.com:443",
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "development" => Ok(Environment::Development),
            "sandbox" => Ok(Environment::Sandbox),
            "production" => Ok(Environment::Production),
            other => Err(format!("unknown environment: {other}")),
        }
    }
}

/// Gateway configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `BRAINTREE_MERCHANT_ID` (required): merchant identifier used in every request path
/// - `BRAINTREE_PUBLIC_KEY` (required): API public key
/// - `BRAINTREE_PRIVATE_KEY` (required): API private key
/// - `BRAINTREE_ENVIRONMENT` (optional): `development`, `sandbox` or `production`, defaults to `sandbox`
/// - `BRAINTREE_BASE_URL` (optional): overrides the environment's gateway URL
/// - `BRAINTREE_TIMEOUT_SECS` (optional): request timeout, defaults to 60
#[derive(Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub environment: Environment,

    pub merchant_id: String,

    pub public_key: String,

    pub private_key: String,

    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Default request timeout if BRAINTREE_TIMEOUT_SECS is not set.
fn default_timeout_secs() -> u64 {
    60
}

impl Config {
    /// Build a configuration for the given environment and credentials.
    pub fn new(
        environment: Environment,
        merchant_id: impl Into<String>,
        public_key: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Self {
        Self {
            environment,
            merchant_id: merchant_id.into(),
            public_key: public_key.into(),
            private_key: private_key.into(),
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Point the client at a custom gateway URL instead of the environment default.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads `BRAINTREE_*` environment variables into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., BRAINTREE_MERCHANT_ID)
    /// - Environment variable values cannot be parsed into expected types
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Field names are converted with the prefix: merchant_id -> BRAINTREE_MERCHANT_ID
        envy::prefixed("BRAINTREE_").from_env::<Config>()
    }

    /// Gateway URL requests are sent to.
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("environment", &self.environment)
            .field("merchant_id", &self.merchant_id)
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
