//! API routes
//!
//! Domain-grouped HTTP route handlers.

pub mod licenses;
pub mod ops;
pub mod profile;

use axum::{Router, middleware};

use crate::cors::cors_layer;
use crate::state::AppState;

/// Build the complete API router
///
/// CORS is applied here so preflights and headers behave the same however
/// the router is served.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Operations routes (health - no auth)
        .merge(ops::routes())
        // Issuance
        .merge(licenses::issuance_routes())
        // Dashboard
        .nest("/api/v1/licenses", licenses::routes())
        .nest("/api/v1/profile", profile::routes())
        .layer(middleware::from_fn(cors_layer))
        .with_state(state)
}
