//! Control plane models
//!
//! Domain models for the control plane database.

mod license;
mod profile;

pub use license::{LicenseRecord, LicenseStatus};
pub use profile::{Plan, UserProfile};
