//! Storage seam for issuance.
//!
//! The issuance flow only needs four operations from persistence. The
//! production adapter sits on the control plane; an in-memory store backs
//! tests and embedding.

use async_trait::async_trait;
use keyforge_control::{LicenseRecord, UserProfile};

use crate::error::StoreError;

/// Persistence operations used by [`IssuanceService`](crate::IssuanceService).
#[async_trait]
pub trait LicenseStore: Send + Sync {
    /// Fetch the caller's profile, creating a `free` one on first access.
    async fn get_or_create_profile(
        &self,
        user_id: &str,
        email: &str,
    ) -> Result<UserProfile, StoreError>;

    /// Number of license records owned by `user_id`, in any status.
    async fn count_for_user(&self, user_id: &str) -> Result<u64, StoreError>;

    /// Whether a record already carries `key`.
    async fn key_exists(&self, key: &str) -> Result<bool, StoreError>;

    /// Atomically insert `record`.
    ///
    /// Must return [`StoreError::Conflict`] (and write nothing) when the key
    /// is already taken.
    async fn insert(&self, record: &LicenseRecord) -> Result<(), StoreError>;
}
