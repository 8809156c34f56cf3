//! Keyforge Control Plane
//!
//! Turso-backed persistence for user profiles and license keys.
//!
//! # Tables
//!
//! | Table | Contains |
//! |-------|----------|
//! | `profiles` | One row per identity: email, plan tier |
//! | `licenses` | Issued license keys; `key` is UNIQUE |
//!
//! # Usage
//!
//! ```ignore
//! use keyforge_control::ControlPlane;
//!
//! // File-based (production)
//! let cp = ControlPlane::new("data").await?;
//!
//! // In-memory (testing)
//! let cp = ControlPlane::new_memory().await?;
//!
//! let profile = cp.profiles().get_or_create("user-1", "a@example.com").await?;
//! let count = cp.licenses().count_for_user(&profile.id).await?;
//! ```

pub mod db;
pub mod error;
pub mod models;
pub mod repos;

// Re-exports
pub use db::ControlPlane;
pub use error::{ControlError, Result};
pub use models::{LicenseRecord, LicenseStatus, Plan, UserProfile};
pub use repos::{LicenseRepo, ProfileRepo};

impl ControlPlane {
    /// Get the profile repository
    pub fn profiles(&self) -> ProfileRepo<'_> {
        ProfileRepo::new(self.db(), self.write_gate())
    }

    /// Get the license repository
    pub fn licenses(&self) -> LicenseRepo<'_> {
        LicenseRepo::new(self.db(), self.write_gate())
    }
}
