//! Profile route
//!
//! - `GET /api/v1/profile` - Own profile (created on first access) and usage

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::auth::AuthUser;
use crate::error::Result;
use crate::state::AppState;
use crate::types::{ProfileResponse, Usage};

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(get_profile))
}

async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ProfileResponse>> {
    let profile = state
        .control
        .profiles()
        .get_or_create(&user.id, &user.email)
        .await?;

    let records = state.control.licenses().list_for_user(&user.id).await?;
    let usage = Usage::tally(&records, state.issuer.policy(), profile.plan);

    Ok(Json(ProfileResponse {
        success: true,
        profile,
        usage,
    }))
}
