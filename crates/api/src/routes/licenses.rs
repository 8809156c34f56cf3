//! License routes
//!
//! Issuance plus the caller's own license listing and deletion.
//!
//! # Routes
//!
//! - `POST   /functions/v1/create-key` - Issue a key for the requested plan
//! - `GET    /api/v1/licenses`         - List own licenses, newest first
//! - `GET    /api/v1/licenses/{id}`    - Get one own license
//! - `DELETE /api/v1/licenses/{id}`    - Delete one own license

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::info;

use crate::auth::AuthUser;
use crate::error::{ApiError, Result};
use crate::state::AppState;
use crate::types::{CreateKeyRequest, LicenseListResponse, LicenseResponse, SuccessResponse};

/// Issuance route, mounted at the root
pub fn issuance_routes() -> Router<AppState> {
    Router::new().route("/functions/v1/create-key", post(create_key))
}

/// Dashboard routes, nested under `/api/v1/licenses`
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_licenses))
        .route("/{id}", get(get_license).delete(delete_license))
}

/// Issue a key
///
/// The body is parsed by hand so malformed JSON gets the uniform failure
/// body rather than axum's plain-text rejection.
async fn create_key(
    State(state): State<AppState>,
    user: AuthUser,
    body: Bytes,
) -> Result<Json<LicenseResponse>> {
    let request: CreateKeyRequest =
        serde_json::from_slice(&body).map_err(|e| ApiError::invalid_request(e.to_string()))?;

    let license = state
        .issuer
        .issue(&user.id, &user.email, request.plan)
        .await?;

    Ok(Json(LicenseResponse {
        success: true,
        license,
    }))
}

async fn list_licenses(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<LicenseListResponse>> {
    let licenses = state.control.licenses().list_for_user(&user.id).await?;

    Ok(Json(LicenseListResponse {
        success: true,
        count: licenses.len(),
        licenses,
    }))
}

async fn get_license(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<LicenseResponse>> {
    let license = state
        .control
        .licenses()
        .get_by_id(&id)
        .await?
        .filter(|l| l.user_id == user.id)
        .ok_or(ApiError::NotFound)?;

    Ok(Json(LicenseResponse {
        success: true,
        license,
    }))
}

/// Delete an owned license
///
/// Someone else's license is reported as missing.
async fn delete_license(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    let deleted = state
        .control
        .licenses()
        .delete_for_owner(&id, &user.id)
        .await?;

    if !deleted {
        return Err(ApiError::NotFound);
    }

    info!(license_id = %id, user_id = %user.id, "License deleted");
    Ok(Json(SuccessResponse::ok()))
}
