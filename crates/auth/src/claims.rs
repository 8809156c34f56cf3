//! Access token claims
//!
//! The shape of the HS256 access tokens issued by the hosted identity
//! provider. Only `sub` and `exp` are required.

use serde::{Deserialize, Serialize};

/// Default audience for end-user access tokens
pub const DEFAULT_AUDIENCE: &str = "authenticated";

/// JWT claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject (stable user ID)
    #[serde(rename = "sub")]
    pub subject: String,

    /// User email
    #[serde(default)]
    pub email: String,

    /// Provider role (e.g. "authenticated")
    #[serde(default = "default_role")]
    pub role: String,

    /// Audience
    #[serde(rename = "aud", skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,

    /// Expiration time (Unix timestamp)
    #[serde(rename = "exp")]
    pub expires_at: i64,

    /// Issued at (Unix timestamp)
    #[serde(rename = "iat", default)]
    pub issued_at: i64,

    /// Not before (Unix timestamp)
    #[serde(rename = "nbf", skip_serializing_if = "Option::is_none")]
    pub not_before: Option<i64>,

    /// Issuer
    #[serde(rename = "iss", skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    /// Provider session ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

fn default_role() -> String {
    DEFAULT_AUDIENCE.to_string()
}

/// Quick structural check: three non-empty dot-separated segments
pub fn is_jwt_format(token: &str) -> bool {
    let mut parts = token.split('.');
    let well_formed = (0..3).all(|_| parts.next().is_some_and(|p| !p.is_empty()));
    well_formed && parts.next().is_none()
}
