//! Logging configuration
//!
//! Controls the service's own log output.

use serde::Deserialize;

/// Log level
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Console,
    /// One JSON object per line, for log shippers
    Json,
}

/// Logging configuration
///
/// # Example
///
/// ```toml
/// [log]
/// level = "info"
/// format = "console"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
}

/// Dependencies that stay at `warn` unless RUST_LOG says otherwise
const QUIET_TARGETS: &[&str] = &["turso", "turso_core", "hyper", "hyper_util", "reqwest"];

impl LogConfig {
    /// `EnvFilter` directive for `level`, keeping chatty dependencies quiet
    pub fn filter_directive(level: &str) -> String {
        let mut directive = level.to_string();
        for target in QUIET_TARGETS {
            directive.push_str(&format!(",{target}=warn"));
        }
        directive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty() {
        let config: LogConfig = toml::from_str("").unwrap();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Console);
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
level = "debug"
format = "json"
"#;
        let config: LogConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn test_level_feeds_filter_directive() {
        let config: LogConfig = toml::from_str(r#"level = "warn""#).unwrap();
        let directive = LogConfig::filter_directive(config.level.as_str());
        assert!(directive.starts_with("warn,"));
    }

    #[test]
    fn test_filter_directive() {
        let directive = LogConfig::filter_directive("debug");
        assert!(directive.starts_with("debug,"));
        assert!(directive.contains("turso=warn"));
        assert!(directive.contains("reqwest=warn"));
    }

    #[test]
    fn test_unknown_format_rejected() {
        let result: Result<LogConfig, _> = toml::from_str(r#"format = "xml""#);
        assert!(result.is_err());
    }
}
