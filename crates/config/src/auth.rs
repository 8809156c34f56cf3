//! Identity verification configuration
//!
//! Two modes:
//! - **Local**: verify HS256 access tokens with the provider's JWT secret (default)
//! - **Remote**: ask the hosted identity service to resolve each token

use std::time::Duration;

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Minimum JWT secret length in bytes
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// How bearer tokens are verified
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Local HS256 signature check (default)
    #[default]
    Local,
    /// `GET {provider_url}/auth/v1/user`
    Remote,
}

/// Identity verification configuration
///
/// # Example
///
/// ## Local (default)
/// ```toml
/// [auth]
/// mode = "local"
/// jwt_secret = "your-secret-key-at-least-32-characters-long"
/// audience = "authenticated"
/// ```
///
/// ## Remote
/// ```toml
/// [auth]
/// mode = "remote"
/// provider_url = "https://project.example.co"
/// api_key = "anon-key"
/// timeout = "5s"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Verification mode
    /// Default: local
    pub mode: AuthMode,

    /// HS256 secret (required for local mode, at least 32 bytes)
    pub jwt_secret: Option<String>,

    /// Required `aud` claim (local mode)
    pub audience: Option<String>,

    /// Identity service base URL (required for remote mode)
    pub provider_url: Option<String>,

    /// API key sent as the `apikey` header (remote mode)
    pub api_key: Option<String>,

    /// Request timeout for the identity service
    /// Default: 5s
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            mode: AuthMode::Local,
            jwt_secret: None,
            audience: None,
            provider_url: None,
            api_key: None,
            timeout: Duration::from_secs(5),
        }
    }
}

impl AuthConfig {
    /// Get the JWT secret bytes, if configured
    pub fn jwt_secret_bytes(&self) -> Option<&[u8]> {
        self.jwt_secret.as_ref().map(|s| s.as_bytes())
    }

    /// Validate the configuration
    ///
    /// A missing local secret is allowed here; the server refuses to start
    /// without one, but the config may still be loaded by other commands.
    pub fn validate(&self) -> Result<()> {
        if let Some(ref secret) = self.jwt_secret
            && secret.len() < MIN_JWT_SECRET_LEN
        {
            return Err(ConfigError::invalid_value(
                "auth",
                "jwt_secret",
                format!("must be at least {MIN_JWT_SECRET_LEN} bytes"),
            ));
        }

        if self.mode == AuthMode::Remote {
            let url = self
                .provider_url
                .as_deref()
                .ok_or(ConfigError::missing_field("auth", "provider_url"))?;
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::invalid_value(
                    "auth",
                    "provider_url",
                    "must start with http:// or https://",
                ));
            }
            if self.api_key.as_deref().is_none_or(str::is_empty) {
                return Err(ConfigError::missing_field("auth", "api_key"));
            }
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::invalid_value("auth", "timeout", "must be non-zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-32-bytes-long!!!";

    #[test]
    fn test_default_config() {
        let config = AuthConfig::default();
        assert_eq!(config.mode, AuthMode::Local);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_local_with_secret() {
        let toml = format!("jwt_secret = \"{SECRET}\"\naudience = \"authenticated\"");
        let config: AuthConfig = toml::from_str(&toml).unwrap();
        assert_eq!(config.jwt_secret_bytes(), Some(SECRET.as_bytes()));
        assert_eq!(config.audience.as_deref(), Some("authenticated"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_short_secret_rejected() {
        let config: AuthConfig = toml::from_str(r#"jwt_secret = "short""#).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "jwt_secret", .. })
        ));
    }

    #[test]
    fn test_remote_requires_url_and_key() {
        let config: AuthConfig = toml::from_str(r#"mode = "remote""#).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField { field: "provider_url", .. })
        ));

        let config: AuthConfig = toml::from_str(
            r#"
mode = "remote"
provider_url = "https://project.example.co"
"#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField { field: "api_key", .. })
        ));
    }

    #[test]
    fn test_remote_full() {
        let config: AuthConfig = toml::from_str(
            r#"
mode = "remote"
provider_url = "https://project.example.co"
api_key = "anon-key"
timeout = "750ms"
"#,
        )
        .unwrap();
        assert_eq!(config.mode, AuthMode::Remote);
        assert_eq!(config.timeout, Duration::from_millis(750));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_remote_url_scheme_checked() {
        let config: AuthConfig = toml::from_str(
            r#"
mode = "remote"
provider_url = "project.example.co"
api_key = "anon-key"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }
}
