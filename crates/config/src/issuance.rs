//! Issuance tuning

use serde::Deserialize;

/// Issuance configuration
///
/// # Example
///
/// ```toml
/// [issuance]
/// max_attempts = 5            # default
/// precheck = true             # default
/// serialize_per_user = true   # default
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IssuanceConfig {
    /// Candidate keys tried before giving up
    /// Default: 5
    pub max_attempts: u32,

    /// Look up each candidate before inserting it
    /// Default: true
    pub precheck: bool,

    /// Serialize requests from the same user within this process
    /// Default: true
    pub serialize_per_user: bool,
}

impl Default for IssuanceConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            precheck: true,
            serialize_per_user: true,
        }
    }
}
