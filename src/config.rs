//! Configuration management for the daemon core
//!
//! Settings are read from a TOML file and overridden by `NTP_`-prefixed
//! environment variables (e.g. `NTP_SIGNING_KEY`).

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use serde::Deserialize;

/// Default lifetime of a session token, in days
pub const DEFAULT_TOKEN_VALIDITY_DAYS: u64 = 31;

/// Upper bound on the configurable token lifetime, in days
pub const MAX_TOKEN_VALIDITY_DAYS: u64 = 3650;

/// Settings shared by the token issuer and verifier
#[derive(Debug, Deserialize, Clone)]
pub struct DaemonConfig {
    /// Symmetric key used to sign and verify session tokens
    pub signing_key: String,

    /// Lifetime of issued session tokens
    /// Environment: NTP_TOKEN_VALIDITY_DAYS
    #[serde(default = "default_token_validity_days")]
    pub token_validity_days: u64,
}

fn default_token_validity_days() -> u64 {
    DEFAULT_TOKEN_VALIDITY_DAYS
}

impl DaemonConfig {
    /// Build a configuration directly from a signing key, with the default token lifetime
    pub fn new(signing_key: impl Into<String>) -> Self {
        Self {
            signing_key: signing_key.into(),
            token_validity_days: DEFAULT_TOKEN_VALIDITY_DAYS,
        }
    }

    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        // Try the installed path first, then the development path
        let config_paths = ["ntp-daemon/config", "config"];

        let mut last_error = None;

        for config_path in config_paths {
            match Self::load_from(config_path) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    last_error = Some(e);
                    continue;
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            config::ConfigError::Message(format!(
                "Failed to load configuration. Tried: {config_paths:?}"
            ))
        }))
    }

    /// Load configuration from a specific file (extension optional) with environment overrides
    pub fn load_from(path: &str) -> Result<Self, config::ConfigError> {
        Self::build(Config::builder().add_source(File::with_name(path)))
    }

    /// Parse configuration from TOML text with environment overrides
    pub fn from_toml(contents: &str) -> Result<Self, config::ConfigError> {
        Self::build(Config::builder().add_source(File::from_str(contents, FileFormat::Toml)))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, config::ConfigError> {
        let settings = builder
            .add_source(Environment::with_prefix("NTP"))
            .build()?;

        let config: DaemonConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.signing_key.is_empty() {
            return Err(config::ConfigError::Message(
                "signing_key cannot be empty".into(),
            ));
        }

        if self.token_validity_days == 0 {
            return Err(config::ConfigError::Message(
                "token_validity_days must be greater than 0".into(),
            ));
        }

        if self.token_validity_days > MAX_TOKEN_VALIDITY_DAYS {
            return Err(config::ConfigError::Message(format!(
                "token_validity_days must be at most {MAX_TOKEN_VALIDITY_DAYS}"
            )));
        }

        Ok(())
    }

    /// Get the token lifetime as a Duration.
    ///
    /// Values too large to represent saturate to `Duration::MAX`.
    pub fn token_validity(&self) -> chrono::Duration {
        i64::try_from(self.token_validity_days)
            .ok()
            .and_then(chrono::Duration::try_days)
            .unwrap_or(chrono::Duration::MAX)
    }
}
