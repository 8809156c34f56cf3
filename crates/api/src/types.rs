//! API request and response types

use serde::{Deserialize, Serialize};

use keyforge_control::{LicenseRecord, LicenseStatus, Plan, UserProfile};
use keyforge_license::QuotaPolicy;

/// Body of `POST /functions/v1/create-key`
#[derive(Debug, Deserialize)]
pub struct CreateKeyRequest {
    /// Requested plan tier; fixes the key prefix and the record's plan
    pub plan: Plan,
}

/// A single license (issuance result or lookup)
#[derive(Debug, Serialize)]
pub struct LicenseResponse {
    pub success: bool,
    pub license: LicenseRecord,
}

/// Caller's licenses, newest first
#[derive(Debug, Serialize)]
pub struct LicenseListResponse {
    pub success: bool,
    pub licenses: Vec<LicenseRecord>,
    pub count: usize,
}

/// Bare success acknowledgement
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Caller's profile plus usage against their quota
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub profile: UserProfile,
    pub usage: Usage,
}

/// Per-plan record counts
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct PlanCounts {
    pub free: u64,
    pub pro: u64,
    pub premium: u64,
}

/// Key usage summary
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct Usage {
    /// All records, any status (what the quota counts)
    pub total: u64,
    pub active: u64,
    pub expired: u64,
    pub banned: u64,
    /// Plan bound (null = unbounded)
    pub limit: Option<u64>,
    /// Keys still available (null = unbounded)
    pub remaining: Option<u64>,
    pub by_plan: PlanCounts,
}

impl Usage {
    /// Tally `records` against the quota of a user on `plan`
    pub fn tally(records: &[LicenseRecord], policy: &QuotaPolicy, plan: Plan) -> Self {
        let mut usage = Usage {
            limit: policy.limit(plan),
            ..Usage::default()
        };

        for record in records {
            usage.total += 1;
            match record.status {
                LicenseStatus::Active => usage.active += 1,
                LicenseStatus::Expired => usage.expired += 1,
                LicenseStatus::Banned => usage.banned += 1,
            }
            match record.plan {
                Plan::Free => usage.by_plan.free += 1,
                Plan::Pro => usage.by_plan.pro += 1,
                Plan::Premium => usage.by_plan.premium += 1,
            }
        }

        usage.remaining = policy.remaining(plan, usage.total);
        usage
    }
}
