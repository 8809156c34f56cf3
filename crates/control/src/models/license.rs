//! License key record model
//!
//! One record per issued key. The key string is unique across every record
//! and the plan tier is frozen at issuance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Plan;
use crate::error::{ControlError, Result};

/// License status
///
/// Records are created `Active`. Transitions to `Expired` or `Banned` are
/// administrative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseStatus {
    #[default]
    Active,
    Expired,
    Banned,
}

impl LicenseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Banned => "banned",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "expired" => Some(Self::Expired),
            "banned" => Some(Self::Banned),
            _ => None,
        }
    }
}

/// A persisted license key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseRecord {
    /// Record ID (UUID)
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// License key string (globally unique)
    pub key: String,
    /// Plan tier at time of issuance
    pub plan: Plan,
    /// Current status
    pub status: LicenseStatus,
    /// Issuance time
    pub created_at: DateTime<Utc>,
    /// Expiry time (None = never expires)
    pub expires_at: Option<DateTime<Utc>>,
}

impl LicenseRecord {
    /// Build a new active record
    ///
    /// Fails if `expires_at` is not strictly after `created_at`.
    pub fn new(
        user_id: impl Into<String>,
        key: impl Into<String>,
        plan: Plan,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Self> {
        if let Some(expires) = expires_at
            && expires <= created_at
        {
            return Err(ControlError::invalid(
                "expires_at",
                "must be after created_at",
            ));
        }

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            key: key.into(),
            plan,
            status: LicenseStatus::Active,
            created_at,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_new_record_is_active() {
        let now = Utc::now();
        let record = LicenseRecord::new(
            "user-1",
            "PRO-ABC-DEF",
            Plan::Pro,
            now,
            Some(now + Duration::days(365)),
        )
        .unwrap();

        assert_eq!(record.status, LicenseStatus::Active);
        assert_eq!(record.plan, Plan::Pro);
        assert!(!record.id.is_empty());
        assert_eq!(record.created_at, now);
    }

    #[test]
    fn test_expiry_must_follow_creation() {
        let now = Utc::now();
        let same = LicenseRecord::new("u", "K", Plan::Free, now, Some(now));
        assert!(matches!(same, Err(ControlError::Invalid { field: "expires_at", .. })));

        let before = LicenseRecord::new("u", "K", Plan::Free, now, Some(now - Duration::seconds(1)));
        assert!(before.is_err());
    }

    #[test]
    fn test_no_expiry_allowed() {
        let record = LicenseRecord::new("u", "K", Plan::Premium, Utc::now(), None).unwrap();
        assert!(record.expires_at.is_none());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(LicenseStatus::parse("banned"), Some(LicenseStatus::Banned));
        assert_eq!(LicenseStatus::parse("revoked"), None);
        assert_eq!(LicenseStatus::Expired.as_str(), "expired");
    }
}
