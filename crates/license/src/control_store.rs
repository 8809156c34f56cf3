//! Control-plane backed license store
//!
//! Adapts `ControlPlane`'s repositories to the [`LicenseStore`] trait.

use std::sync::Arc;

use async_trait::async_trait;
use keyforge_control::{ControlError, ControlPlane, LicenseRecord, UserProfile};

use crate::error::StoreError;
use crate::store::LicenseStore;

/// License store backed by the Turso control database
pub struct ControlPlaneLicenseStore {
    control: Arc<ControlPlane>,
}

impl ControlPlaneLicenseStore {
    /// Create a new store adapter
    pub fn new(control: Arc<ControlPlane>) -> Self {
        Self { control }
    }

    /// Get a reference to the underlying control plane
    pub fn control_plane(&self) -> &ControlPlane {
        &self.control
    }
}

fn read_error(err: ControlError) -> StoreError {
    match err {
        ControlError::Invalid { field: "plan", message } => StoreError::InvalidProfile(message),
        other => StoreError::Unavailable(other.to_string()),
    }
}

#[async_trait]
impl LicenseStore for ControlPlaneLicenseStore {
    async fn get_or_create_profile(
        &self,
        user_id: &str,
        email: &str,
    ) -> Result<UserProfile, StoreError> {
        self.control
            .profiles()
            .get_or_create(user_id, email)
            .await
            .map_err(read_error)
    }

    async fn count_for_user(&self, user_id: &str) -> Result<u64, StoreError> {
        self.control
            .licenses()
            .count_for_user(user_id)
            .await
            .map_err(read_error)
    }

    async fn key_exists(&self, key: &str) -> Result<bool, StoreError> {
        self.control
            .licenses()
            .key_exists(key)
            .await
            .map_err(read_error)
    }

    async fn insert(&self, record: &LicenseRecord) -> Result<(), StoreError> {
        self.control
            .licenses()
            .insert(record)
            .await
            .map_err(|e| {
                if e.is_conflict() {
                    StoreError::Conflict
                } else {
                    StoreError::Write(e.to_string())
                }
            })
    }
}
