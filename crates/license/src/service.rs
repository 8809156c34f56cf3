//! Issuance service
//!
//! Runs one issuance request end to end: quota check, key generation with
//! bounded collision retry, and the atomic write.

use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use keyforge_control::{LicenseRecord, Plan};
use tracing::{debug, info, warn};

use crate::error::{IssueError, Result, StoreError};
use crate::keygen::{KeyGenerator, RandomKeyGenerator};
use crate::locks::UserLocks;
use crate::policy::QuotaPolicy;
use crate::store::LicenseStore;

/// Default number of candidate keys tried per request
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Validity period of a new license, in years
pub const LICENSE_TERM_YEARS: i32 = 1;

/// Issues license keys against a [`LicenseStore`]
///
/// Cheap to clone; clones share the store, generator and user locks.
#[derive(Clone)]
pub struct IssuanceService {
    store: Arc<dyn LicenseStore>,
    generator: Arc<dyn KeyGenerator>,
    policy: QuotaPolicy,
    max_attempts: u32,
    precheck: bool,
    locks: Option<Arc<UserLocks>>,
}

impl std::fmt::Debug for IssuanceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuanceService")
            .field("policy", &self.policy)
            .field("max_attempts", &self.max_attempts)
            .field("precheck", &self.precheck)
            .field("serialize_per_user", &self.locks.is_some())
            .finish()
    }
}

impl IssuanceService {
    /// Create a service with the random key generator, per-user
    /// serialization and the default attempt bound
    pub fn new(store: Arc<dyn LicenseStore>, policy: QuotaPolicy) -> Self {
        Self {
            store,
            generator: Arc::new(RandomKeyGenerator),
            policy,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            precheck: true,
            locks: Some(Arc::new(UserLocks::new())),
        }
    }

    #[must_use]
    pub fn with_generator(mut self, generator: Arc<dyn KeyGenerator>) -> Self {
        self.generator = generator;
        self
    }

    /// Set the collision retry bound (at least one attempt is always made)
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Toggle the `key_exists` lookup before each insert
    #[must_use]
    pub fn with_precheck(mut self, precheck: bool) -> Self {
        self.precheck = precheck;
        self
    }

    /// Toggle in-process serialization of requests from the same user
    #[must_use]
    pub fn with_per_user_serialization(mut self, enabled: bool) -> Self {
        self.locks = enabled.then(|| Arc::new(UserLocks::new()));
        self
    }

    pub fn policy(&self) -> &QuotaPolicy {
        &self.policy
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Issue a key for `user_id` on `plan`, stamped with the current time
    pub async fn issue(&self, user_id: &str, email: &str, plan: Plan) -> Result<LicenseRecord> {
        self.issue_at(user_id, email, plan, Utc::now()).await
    }

    /// Issue a key stamped with `now`
    pub async fn issue_at(
        &self,
        user_id: &str,
        email: &str,
        plan: Plan,
        now: DateTime<Utc>,
    ) -> Result<LicenseRecord> {
        let _guard = match &self.locks {
            Some(locks) => Some(locks.lock(user_id).await),
            None => None,
        };

        self.check_quota(user_id, email).await?;

        let expires_at = expiry_for(now).ok_or_else(|| {
            IssueError::PersistenceFailure(format!("expiry out of range for {now}"))
        })?;

        for attempt in 1..=self.max_attempts {
            let key = self.generator.generate(plan, now);

            if self.precheck && self.store.key_exists(&key).await? {
                debug!(attempt, %key, "Candidate key already taken");
                continue;
            }

            let record = LicenseRecord::new(user_id, key, plan, now, Some(expires_at))
                .map_err(|e| IssueError::PersistenceFailure(e.to_string()))?;

            match self.store.insert(&record).await {
                Ok(()) => {
                    info!(
                        license_id = %record.id,
                        user_id,
                        plan = %plan,
                        attempt,
                        "Issued license"
                    );
                    return Ok(record);
                }
                Err(StoreError::Conflict) => {
                    debug!(attempt, key = %record.key, "Key collision on insert, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        warn!(user_id, attempts = self.max_attempts, "Key generation exhausted");
        Err(IssueError::KeyGenerationExhausted {
            attempts: self.max_attempts,
        })
    }

    /// Fail with `QuotaExceeded` if the caller's plan bound is reached
    ///
    /// Unbounded plans skip the count entirely.
    async fn check_quota(&self, user_id: &str, email: &str) -> Result<()> {
        let profile = self.store.get_or_create_profile(user_id, email).await?;

        let Some(limit) = self.policy.limit(profile.plan) else {
            return Ok(());
        };

        let owned = self.store.count_for_user(user_id).await?;
        if !self.policy.allows(profile.plan, owned) {
            debug!(user_id, plan = %profile.plan, owned, limit, "Quota exceeded");
            return Err(IssueError::QuotaExceeded { limit });
        }
        Ok(())
    }
}

/// Expiry for a license issued at `issued_at`: same date and time, one year later
///
/// Feb 29 has no counterpart in a common year and rolls over to Mar 1.
pub fn expiry_for(issued_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let year = issued_at.year().checked_add(LICENSE_TERM_YEARS)?;
    issued_at.with_year(year).or_else(|| {
        let rolled = NaiveDate::from_ymd_opt(year, 3, 1)?;
        Some(rolled.and_time(issued_at.time()).and_utc())
    })
}
