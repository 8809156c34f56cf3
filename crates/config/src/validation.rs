//! Configuration validation
//!
//! Checks cross-field consistency after parsing:
//! - Auth mode has what it needs
//! - Quotas and retry bounds are usable
//! - Server binds to a real port

use crate::Config;
use crate::error::{ConfigError, Result};

/// Validate the entire configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_server(config)?;
    config.auth.validate()?;
    validate_quota(config)?;
    validate_issuance(config)?;
    Ok(())
}

fn validate_server(config: &Config) -> Result<()> {
    if config.server.host.trim().is_empty() {
        return Err(ConfigError::invalid_value("server", "host", "must not be empty"));
    }
    if config.server.port == 0 {
        return Err(ConfigError::invalid_value("server", "port", "must be non-zero"));
    }
    Ok(())
}

fn validate_quota(config: &Config) -> Result<()> {
    let quota = &config.quota;
    let tiers = [("free", quota.free), ("pro", quota.pro), ("premium", quota.premium)];

    // Higher tiers never get fewer keys than lower ones
    let mut floor = 0u64;
    for (tier, limit) in tiers {
        match limit {
            Some(limit) if limit < floor => {
                return Err(ConfigError::invalid_value(
                    "quota",
                    "limits",
                    format!("{tier} limit {limit} is below a lower tier's limit {floor}"),
                ));
            }
            Some(limit) => floor = limit,
            None => floor = u64::MAX,
        }
    }
    Ok(())
}

fn validate_issuance(config: &Config) -> Result<()> {
    if config.issuance.max_attempts == 0 {
        return Err(ConfigError::invalid_value(
            "issuance",
            "max_attempts",
            "must be at least 1",
        ));
    }
    Ok(())
}
