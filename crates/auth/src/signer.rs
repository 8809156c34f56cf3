//! Access token minting
//!
//! Produces HS256 tokens in the same shape the hosted identity provider
//! issues. Used by the `token` CLI command for local development and by the
//! test helpers.

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use crate::claims::{AccessTokenClaims, DEFAULT_AUDIENCE};
use crate::error::{AuthError, Result};

/// Signs access tokens with a shared HS256 secret
#[derive(Clone)]
pub struct TokenSigner {
    key: EncodingKey,
    audience: String,
    issuer: Option<String>,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("audience", &self.audience)
            .field("issuer", &self.issuer)
            .finish()
    }
}

impl TokenSigner {
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        Self {
            key: EncodingKey::from_secret(secret),
            audience: DEFAULT_AUDIENCE.to_string(),
            issuer: None,
        }
    }

    #[must_use]
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = audience.into();
        self
    }

    #[must_use]
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Mint a token for `user_id` valid for `ttl` from now
    pub fn sign(&self, user_id: &str, email: &str, ttl: Duration) -> Result<String> {
        let now = Utc::now();
        let claims = AccessTokenClaims {
            subject: user_id.to_string(),
            email: email.to_string(),
            role: DEFAULT_AUDIENCE.to_string(),
            audience: Some(self.audience.clone()),
            expires_at: (now + ttl).timestamp(),
            issued_at: now.timestamp(),
            not_before: None,
            issuer: self.issuer.clone(),
            session_id: None,
        };

        encode(&Header::default(), &claims, &self.key).map_err(|e| AuthError::Signing(e.to_string()))
    }
}
