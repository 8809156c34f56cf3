//! Identity providers
//!
//! Defines the `IdentityProvider` trait for turning a bearer credential into
//! a verified identity, plus the local HS256 implementation.

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use crate::claims::{AccessTokenClaims, is_jwt_format};
use crate::error::{AuthError, Result};
use crate::user::UserInfo;

/// Identity provider trait
///
/// Implement this trait to add new verification backends.
/// Supported: `LocalJwtProvider`, `HttpIdentityProvider`
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Validate a bearer credential and return the caller's identity
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if:
    /// - Token format is invalid
    /// - Token signature verification fails
    /// - Token has expired
    /// - The provider rejects the credential
    /// - The provider cannot be reached (`ProviderUnavailable`)
    async fn validate(&self, token: &str) -> Result<UserInfo>;

    /// Provider name for logging/debugging
    fn name(&self) -> &'static str;
}

/// Local JWT provider using HMAC-SHA256
///
/// Verifies access tokens signed with the provider's shared JWT secret,
/// without a network round trip.
///
/// # Example
///
/// ```
/// use keyforge_auth::LocalJwtProvider;
///
/// let provider = LocalJwtProvider::new(b"your-secret-key-at-least-32-bytes!")
///     .with_audience("authenticated");
/// ```
pub struct LocalJwtProvider {
    decoding_key: DecodingKey,
    validation: Validation,
    audience: Option<String>,
}

impl std::fmt::Debug for LocalJwtProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalJwtProvider")
            .field("algorithm", &"HS256")
            .field("audience", &self.audience)
            .finish()
    }
}

impl LocalJwtProvider {
    /// Create a new provider with HMAC-SHA256 secret
    ///
    /// # Arguments
    ///
    /// * `secret` - Secret key for HMAC-SHA256 (should be at least 32 bytes)
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();
        validation.required_spec_claims.insert("exp".to_string());
        validation.required_spec_claims.insert("sub".to_string());

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            audience: None,
        }
    }

    /// Require tokens to carry a matching `aud` claim
    #[must_use]
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        let audience = audience.into();
        self.validation.set_audience(&[&audience]);
        self.validation.validate_aud = true;
        self.audience = Some(audience);
        self
    }

    /// Require tokens to carry a matching `iss` claim
    #[must_use]
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        let issuer = issuer.into();
        self.validation.set_issuer(&[&issuer]);
        self
    }
}

#[async_trait]
impl IdentityProvider for LocalJwtProvider {
    async fn validate(&self, token: &str) -> Result<UserInfo> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        if !is_jwt_format(token) {
            return Err(AuthError::InvalidTokenFormat);
        }

        let token_data = decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!("JWT validation failed: {:?}", e);
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    jsonwebtoken::errors::ErrorKind::ImmatureSignature => {
                        AuthError::TokenNotYetValid
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                    jsonwebtoken::errors::ErrorKind::InvalidToken
                    | jsonwebtoken::errors::ErrorKind::Base64(_) => AuthError::InvalidTokenFormat,
                    _ => AuthError::InvalidClaims(e.to_string()),
                }
            })?;

        let claims = token_data.claims;
        if claims.subject.is_empty() {
            return Err(AuthError::InvalidClaims("empty subject".to_string()));
        }

        Ok(UserInfo::from_claims(&claims))
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
