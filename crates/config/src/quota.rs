//! Per-plan key quotas

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// Config value marking a tier as unbounded
pub const UNLIMITED: &str = "unlimited";

/// Maximum keys per user for each plan tier
///
/// Each tier takes a key count or `"unlimited"`. An omitted tier keeps its
/// default.
///
/// # Example
///
/// ```toml
/// [quota]
/// free = 10               # default
/// pro = 100               # default
/// premium = "unlimited"   # default
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QuotaConfig {
    #[serde(deserialize_with = "deserialize_limit")]
    pub free: Option<u64>,
    #[serde(deserialize_with = "deserialize_limit")]
    pub pro: Option<u64>,
    #[serde(deserialize_with = "deserialize_limit")]
    pub premium: Option<u64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLimit {
    Count(u64),
    Keyword(String),
}

fn deserialize_limit<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match RawLimit::deserialize(deserializer)? {
        RawLimit::Count(count) => Ok(Some(count)),
        RawLimit::Keyword(word) if word == UNLIMITED => Ok(None),
        RawLimit::Keyword(word) => Err(D::Error::custom(format!(
            "expected a key count or \"{UNLIMITED}\", got \"{word}\""
        ))),
    }
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            free: Some(10),
            pro: Some(100),
            premium: None,
        }
    }
}
