//! Keyforge Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! Minimal config should just work - only specify what you need to change.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use keyforge_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[server]\nport = 8080").unwrap();
//! assert_eq!(config.server.port, 8080);
//! ```
//!
//! # Example Minimal Config
//!
//! ```toml
//! [auth]
//! jwt_secret = "your-secret-key-at-least-32-characters-long"
//! ```
//!
//! # Example Full Config
//!
//! See `configs/example.toml` for all available options.

mod auth;
mod error;
mod issuance;
mod logging;
mod quota;
mod server;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use auth::{AuthConfig, AuthMode, MIN_JWT_SECRET_LEN};
pub use error::{ConfigError, Result};
pub use issuance::IssuanceConfig;
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use quota::QuotaConfig;
pub use server::ServerConfig;

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP listener and data directory
    pub server: ServerConfig,

    /// Logging configuration
    pub log: LogConfig,

    /// Identity verification
    pub auth: AuthConfig,

    /// Per-plan key limits
    pub quota: QuotaConfig,

    /// Key generation and write behaviour
    pub issuance: IssuanceConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read, contains invalid TOML, or fails
    /// validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    ///
    /// Prefer using the `FromStr` trait implementation.
    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.log.level, LogLevel::Info);
        assert_eq!(config.auth.mode, AuthMode::Local);
        assert_eq!(config.quota, QuotaConfig::default());
        assert_eq!(config.issuance.max_attempts, 5);
    }

    #[test]
    fn test_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 8080
data_dir = "/tmp/keyforge"

[log]
level = "debug"
format = "json"

[auth]
mode = "remote"
provider_url = "https://project.example.co"
api_key = "anon-key"
timeout = "2s"

[quota]
free = 3
pro = 30
premium = 300

[issuance]
max_attempts = 7
serialize_per_user = false
"#;
        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.server.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.auth.timeout, Duration::from_secs(2));
        assert_eq!(config.quota.premium, Some(300));
        assert_eq!(config.issuance.max_attempts, 7);
        assert!(!config.issuance.serialize_per_user);
    }

    #[test]
    fn test_unknown_auth_mode_rejected() {
        let result = Config::from_str("[auth]\nmode = \"workos\"");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = Config::from_file("/definitely/not/here.toml");
        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }

    #[test]
    fn test_example_config_parses() {
        let example = include_str!("../../../configs/example.toml");
        let config = Config::from_str(example).unwrap();
        assert_eq!(config.quota.free, Some(10));
        assert_eq!(config.quota.premium, None);
    }
}
