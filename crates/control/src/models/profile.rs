//! User profile model
//!
//! A profile exists for every identity that has touched the service. It
//! carries the plan tier that governs the license-key quota.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Subscription plan tier, ordered by increasing quota
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    /// Lowest tier, assigned to new profiles
    #[default]
    Free,
    /// Middle tier
    Pro,
    /// Top tier
    Premium,
}

impl Plan {
    /// All recognized tiers, lowest first
    pub const ALL: [Plan; 3] = [Plan::Free, Plan::Pro, Plan::Premium];

    /// Stored / wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
            Self::Premium => "premium",
        }
    }

    /// Parse a plan tier
    ///
    /// Only the exact lowercase names are accepted. Unknown values are
    /// rejected rather than mapped to a default tier.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "free" => Some(Self::Free),
            "pro" => Some(Self::Pro),
            "premium" => Some(Self::Premium),
            _ => None,
        }
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored user profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Identity subject from the identity provider
    pub id: String,
    /// Email address (may be empty if the provider does not expose one)
    pub email: String,
    /// Current plan tier
    pub plan: Plan,
    /// When the profile was created
    pub created_at: DateTime<Utc>,
    /// When the profile was last updated
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Create a new profile on the default tier
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            email: email.into(),
            plan: Plan::default(),
            created_at: now,
            updated_at: now,
        }
    }
}
