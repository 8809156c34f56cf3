//! Keyforge license issuance.
//!
//! Turns an authenticated request for a plan into a persisted license key.
//!
//! # Flow
//!
//! 1. **Quota** - get-or-create the caller's profile, count their keys, and
//!    compare against the [`QuotaPolicy`] bound for the profile's plan.
//! 2. **Generate** - draw a candidate from a [`KeyGenerator`]:
//!
//!    ```text
//!    PRO-LOYW3V28-4F7XK2M9QA1ZB
//!    ```
//!
//! 3. **Resolve** - up to five candidates; a UNIQUE violation from the store
//!    means "try another".
//! 4. **Write** - single-row insert, status `active`, expiry one calendar
//!    year out.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use keyforge_control::{ControlPlane, Plan};
//! use keyforge_license::{ControlPlaneLicenseStore, IssuanceService, QuotaPolicy};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let control = Arc::new(ControlPlane::new("data").await?);
//! let store = Arc::new(ControlPlaneLicenseStore::new(control));
//! let issuer = IssuanceService::new(store, QuotaPolicy::default());
//!
//! let license = issuer.issue("user-1", "a@example.com", Plan::Pro).await?;
//! println!("{}", license.key);
//! # Ok(())
//! # }
//! ```

mod control_store;
mod error;
mod keygen;
mod locks;
mod memory;
mod policy;
mod service;
mod store;

pub use control_store::ControlPlaneLicenseStore;
pub use error::{IssueError, Result, StoreError};
pub use keygen::{KeyGenerator, RANDOM_LEN, RandomKeyGenerator, key_prefix, to_base36};
pub use locks::UserLocks;
pub use memory::MemoryLicenseStore;
pub use policy::QuotaPolicy;
pub use service::{DEFAULT_MAX_ATTEMPTS, IssuanceService, LICENSE_TERM_YEARS, expiry_for};
pub use store::LicenseStore;

pub use keyforge_control::{LicenseRecord, LicenseStatus, Plan};
