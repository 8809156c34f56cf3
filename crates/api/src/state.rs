//! Application state
//!
//! Shared state for API handlers: identity provider, control plane, and the
//! issuance service built on top of it.

use std::sync::Arc;
use std::time::Instant;

use keyforge_auth::IdentityProvider;
use keyforge_control::ControlPlane;
use keyforge_license::{ControlPlaneLicenseStore, IssuanceService, QuotaPolicy};

use crate::auth::HasIdentityProvider;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Bearer credential verifier
    pub identity: Arc<dyn IdentityProvider>,
    /// Control plane database (profiles, licenses)
    pub control: Arc<ControlPlane>,
    /// License issuance
    pub issuer: IssuanceService,
    /// Server start time for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Create state with an issuance service backed by `control`
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        control: Arc<ControlPlane>,
        policy: QuotaPolicy,
    ) -> Self {
        let store = Arc::new(ControlPlaneLicenseStore::new(Arc::clone(&control)));
        let issuer = IssuanceService::new(store, policy);
        Self::with_issuer(identity, control, issuer)
    }

    /// Create state with a preconfigured issuance service
    pub fn with_issuer(
        identity: Arc<dyn IdentityProvider>,
        control: Arc<ControlPlane>,
        issuer: IssuanceService,
    ) -> Self {
        Self {
            identity,
            control,
            issuer,
            started_at: Instant::now(),
        }
    }

    /// Seconds since the state was built
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

impl HasIdentityProvider for AppState {
    fn identity_provider(&self) -> Arc<dyn IdentityProvider> {
        Arc::clone(&self.identity)
    }
}
