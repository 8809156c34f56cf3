//! Per-plan key quotas.

use std::collections::BTreeMap;

use keyforge_control::Plan;

/// Maximum number of keys a user may own, per plan tier.
///
/// `None` means unbounded. A plan missing from the table is treated as
/// unbounded as well, so every table built here lists all three tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaPolicy {
    limits: BTreeMap<Plan, Option<u64>>,
}

impl Default for QuotaPolicy {
    fn default() -> Self {
        Self::new(Some(10), Some(100), None)
    }
}

impl QuotaPolicy {
    pub fn new(free: Option<u64>, pro: Option<u64>, premium: Option<u64>) -> Self {
        let limits = BTreeMap::from([
            (Plan::Free, free),
            (Plan::Pro, pro),
            (Plan::Premium, premium),
        ]);
        Self { limits }
    }

    /// Key limit for `plan` (None = unbounded).
    pub fn limit(&self, plan: Plan) -> Option<u64> {
        self.limits.get(&plan).copied().flatten()
    }

    /// Keys still available to a user on `plan` who owns `owned` keys.
    pub fn remaining(&self, plan: Plan, owned: u64) -> Option<u64> {
        self.limit(plan).map(|limit| limit.saturating_sub(owned))
    }

    /// Whether a user on `plan` owning `owned` keys may receive another.
    pub fn allows(&self, plan: Plan, owned: u64) -> bool {
        self.limit(plan).is_none_or(|limit| owned < limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let policy = QuotaPolicy::default();
        assert_eq!(policy.limit(Plan::Free), Some(10));
        assert_eq!(policy.limit(Plan::Pro), Some(100));
        assert_eq!(policy.limit(Plan::Premium), None);
    }

    #[test]
    fn test_allows_at_bound() {
        let policy = QuotaPolicy::default();
        assert!(policy.allows(Plan::Free, 9));
        assert!(!policy.allows(Plan::Free, 10));
        assert!(!policy.allows(Plan::Free, 11));
        assert!(policy.allows(Plan::Premium, u64::MAX));
    }

    #[test]
    fn test_remaining() {
        let policy = QuotaPolicy::new(Some(3), Some(5), None);
        assert_eq!(policy.remaining(Plan::Free, 1), Some(2));
        assert_eq!(policy.remaining(Plan::Free, 7), Some(0));
        assert_eq!(policy.remaining(Plan::Premium, 7), None);
    }
}
