//! API error types
//!
//! Every failure renders as `{"success": false, "error": "<message>"}` with
//! a status code chosen by kind.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use keyforge_auth::AuthError;
use keyforge_control::ControlError;
use keyforge_license::IssueError;
use serde::Serialize;
use thiserror::Error;

/// API errors
///
/// `Display` is the client-facing message. Fields not shown in the message
/// are logged only.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No `Authorization` header
    #[error("No authorization header")]
    MissingAuthorization,

    /// Credential present but not accepted
    #[error("Invalid user")]
    InvalidUser,

    /// Malformed body or unknown plan
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Profile missing or plan unresolvable
    #[error("User profile not found")]
    ProfileNotFound,

    /// Plan bound reached
    #[error("Plan limit reached: {limit} keys maximum")]
    QuotaExceeded { limit: u64 },

    /// Every candidate key collided
    #[error("Failed to generate unique key")]
    KeyGenerationExhausted,

    /// Identity provider or store unreachable
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Write rejected for a reason other than a collision
    #[error("Failed to create license")]
    PersistenceFailure(String),

    /// Record missing or not owned by the caller
    #[error("License not found")]
    NotFound,
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingAuthorization | Self::InvalidUser => StatusCode::UNAUTHORIZED,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::ProfileNotFound | Self::NotFound => StatusCode::NOT_FOUND,
            Self::QuotaExceeded { .. } => StatusCode::FORBIDDEN,
            Self::KeyGenerationExhausted | Self::UpstreamUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::PersistenceFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingAuthorization | Self::InvalidUser => "unauthenticated",
            Self::InvalidRequest(_) => "invalid_request",
            Self::ProfileNotFound => "profile_not_found",
            Self::QuotaExceeded { .. } => "quota_exceeded",
            Self::KeyGenerationExhausted => "key_generation_exhausted",
            Self::UpstreamUnavailable(_) => "upstream_unavailable",
            Self::PersistenceFailure(_) => "persistence_failure",
            Self::NotFound => "not_found",
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => Self::MissingAuthorization,
            AuthError::ProviderUnavailable(msg) => Self::UpstreamUnavailable(msg),
            _ => Self::InvalidUser,
        }
    }
}

impl From<IssueError> for ApiError {
    fn from(err: IssueError) -> Self {
        match err {
            IssueError::ProfileNotFound => Self::ProfileNotFound,
            IssueError::QuotaExceeded { limit } => Self::QuotaExceeded { limit },
            IssueError::KeyGenerationExhausted { .. } => Self::KeyGenerationExhausted,
            IssueError::UpstreamUnavailable(msg) => Self::UpstreamUnavailable(msg),
            IssueError::PersistenceFailure(msg) => Self::PersistenceFailure(msg),
        }
    }
}

impl From<ControlError> for ApiError {
    fn from(err: ControlError) -> Self {
        match err {
            ControlError::NotFound { .. } => Self::NotFound,
            ControlError::Invalid { field: "plan", .. } => Self::ProfileNotFound,
            other => Self::UpstreamUnavailable(other.to_string()),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,
    /// Error message (human-readable)
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
        };

        tracing::warn!(
            error_kind = self.kind(),
            error_message = %body.error,
            detail = ?self,
            status = %status,
            "API error"
        );

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
