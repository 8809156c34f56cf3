//! Authentication extractor for Axum
//!
//! # Setup
//!
//! Your app state must implement `HasIdentityProvider`:
//!
//! ```ignore
//! use std::sync::Arc;
//! use keyforge_auth::{IdentityProvider, LocalJwtProvider};
//! use keyforge_api::auth::HasIdentityProvider;
//!
//! struct AppState {
//!     identity: Arc<dyn IdentityProvider>,
//! }
//!
//! impl HasIdentityProvider for AppState {
//!     fn identity_provider(&self) -> Arc<dyn IdentityProvider> {
//!         self.identity.clone()
//!     }
//! }
//! ```

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::debug;

use keyforge_auth::{IdentityProvider, UserInfo};

use crate::error::ApiError;

/// Maximum token size (8KB) - prevents memory exhaustion attacks
pub const MAX_TOKEN_SIZE: usize = 8 * 1024;

const BEARER: &str = "Bearer ";

/// Trait for app state that provides an identity provider
pub trait HasIdentityProvider: Send + Sync {
    /// Get the identity provider
    fn identity_provider(&self) -> Arc<dyn IdentityProvider>;
}

/// Pull the bearer token out of the `Authorization` header
///
/// `Ok(None)` when the header is absent; `Err(InvalidUser)` when it is
/// present but unusable.
pub fn extract_token(parts: &Parts) -> Result<Option<String>, ApiError> {
    let Some(header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    // Check header size before converting to string
    if header.len() > MAX_TOKEN_SIZE + BEARER.len() {
        return Err(ApiError::InvalidUser);
    }

    let value = header.to_str().map_err(|_| ApiError::InvalidUser)?;
    let token = value
        .get(..BEARER.len())
        .filter(|scheme| scheme.eq_ignore_ascii_case(BEARER))
        .map(|_| value[BEARER.len()..].trim())
        .ok_or(ApiError::InvalidUser)?;

    if token.is_empty() {
        return Err(ApiError::InvalidUser);
    }
    Ok(Some(token.to_string()))
}

/// Authenticated user extractor
///
/// Rejects with the uniform failure body: 401 without a header or with a
/// bad credential, 503 when the identity provider is unreachable.
///
/// # Example
///
/// ```ignore
/// async fn handler(user: AuthUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub UserInfo);

impl std::ops::Deref for AuthUser {
    type Target = UserInfo;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: HasIdentityProvider + Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts)?.ok_or(ApiError::MissingAuthorization)?;

        let provider = state.identity_provider();
        let user = provider.validate(&token).await.map_err(|e| {
            debug!(provider = provider.name(), error = %e, "Credential rejected");
            match ApiError::from(e) {
                // A header was sent, so never report it as missing
                ApiError::MissingAuthorization => ApiError::InvalidUser,
                other => other,
            }
        })?;

        Ok(AuthUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(auth: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = auth {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(extract_token(&parts(None)), Ok(None)));
    }

    #[test]
    fn test_bearer_token() {
        let token = extract_token(&parts(Some("Bearer abc.def.ghi"))).unwrap();
        assert_eq!(token.as_deref(), Some("abc.def.ghi"));

        let token = extract_token(&parts(Some("bearer abc.def.ghi"))).unwrap();
        assert_eq!(token.as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_wrong_scheme_or_empty() {
        assert!(matches!(
            extract_token(&parts(Some("Basic dXNlcjpwYXNz"))),
            Err(ApiError::InvalidUser)
        ));
        assert!(matches!(
            extract_token(&parts(Some("Bearer "))),
            Err(ApiError::InvalidUser)
        ));
        assert!(matches!(
            extract_token(&parts(Some(""))),
            Err(ApiError::InvalidUser)
        ));
    }

    #[test]
    fn test_oversized_token() {
        let huge = format!("Bearer {}", "a".repeat(MAX_TOKEN_SIZE + 1));
        assert!(matches!(
            extract_token(&parts(Some(&huge))),
            Err(ApiError::InvalidUser)
        ));
    }
}
