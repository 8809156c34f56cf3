//! Authentication error types

use thiserror::Error;

/// Result type for auth operations
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors that can occur while verifying a bearer credential
#[derive(Debug, Error)]
pub enum AuthError {
    /// Token is missing or empty
    #[error("missing token")]
    MissingToken,

    /// Token is not a well-formed JWT
    #[error("invalid token format")]
    InvalidTokenFormat,

    /// JWT signature verification failed
    #[error("invalid token signature")]
    InvalidSignature,

    /// Token has expired
    #[error("token expired")]
    TokenExpired,

    /// Token is not yet valid (nbf claim)
    #[error("token not yet valid")]
    TokenNotYetValid,

    /// Token claims are invalid
    #[error("invalid token claims: {0}")]
    InvalidClaims(String),

    /// The identity provider rejected the credential
    #[error("credential rejected by identity provider")]
    Rejected,

    /// The identity provider could not be reached or failed
    #[error("identity provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Minting a token failed
    #[error("token signing failed: {0}")]
    Signing(String),
}

impl AuthError {
    /// Create a ProviderUnavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::ProviderUnavailable(message.into())
    }
}
