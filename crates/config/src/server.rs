//! HTTP server configuration

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// HTTP server configuration
///
/// # Example
///
/// ```toml
/// [server]
/// host = "0.0.0.0"          # default
/// port = 3000               # default
/// data_dir = "~/.keyforge"  # default
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    /// Default: "0.0.0.0"
    pub host: String,

    /// Port to listen on
    /// Default: 3000
    pub port: u16,

    /// Directory holding the control database (`{data_dir}/control/data.db`)
    /// Default: "~/.keyforge" (expanded at runtime)
    pub data_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            data_dir: None,
        }
    }
}

impl ServerConfig {
    /// `host:port` bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the data directory, expanding ~ to home directory
    pub fn data_dir_path(&self) -> PathBuf {
        if let Some(ref path) = self.data_dir {
            expand_tilde(path)
        } else {
            dirs::home_dir()
                .map(|h| h.join(".keyforge"))
                .unwrap_or_else(|| PathBuf::from("./data"))
        }
    }
}

/// Expand ~ to home directory
fn expand_tilde(path: &Path) -> PathBuf {
    path.to_str()
        .and_then(|s| s.strip_prefix("~/"))
        .and_then(|stripped| dirs::home_dir().map(|home| home.join(stripped)))
        .unwrap_or_else(|| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_custom_data_dir() {
        let config: ServerConfig = toml::from_str(r#"data_dir = "/var/lib/keyforge""#).unwrap();
        assert_eq!(config.data_dir_path(), PathBuf::from("/var/lib/keyforge"));
    }

    #[test]
    fn test_tilde_expansion() {
        let config: ServerConfig = toml::from_str(r#"data_dir = "~/kf""#).unwrap();
        let path = config.data_dir_path();
        if let Some(home) = dirs::home_dir() {
            assert_eq!(path, home.join("kf"));
        }
    }
}
