//! Keyforge API
//!
//! HTTP interface for license issuance.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use keyforge_api::{build_router, AppState};
//! use keyforge_auth::LocalJwtProvider;
//! use keyforge_control::ControlPlane;
//! use keyforge_license::QuotaPolicy;
//!
//! let control = Arc::new(ControlPlane::new("data").await?);
//! let identity = Arc::new(LocalJwtProvider::new(secret));
//! let state = AppState::new(identity, control, QuotaPolicy::default());
//!
//! let app = build_router(state);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! ```
//!
//! # Endpoints
//!
//! ## Issuance
//! - `POST /functions/v1/create-key` - Issue a key (`{"plan": "free" | "pro" | "premium"}`)
//!
//! ## Dashboard
//! - `GET /api/v1/profile` - Own profile and usage
//! - `GET /api/v1/licenses` - Own licenses
//! - `GET /api/v1/licenses/{id}` - One own license
//! - `DELETE /api/v1/licenses/{id}` - Delete one own license
//!
//! ## Operations
//! - `GET /health` - Liveness and database check
//!
//! Every response carries permissive CORS headers and every `OPTIONS`
//! request is answered as a preflight. Failures use the body
//! `{"success": false, "error": "<message>"}`.

pub mod auth;
pub mod cors;
pub mod error;
pub mod routes;
pub mod state;
pub mod types;

// Re-exports
pub use auth::{AuthUser, HasIdentityProvider};
pub use error::{ApiError, Result};
pub use routes::build_router;
pub use state::AppState;
