//! Keyforge - Authentication
//!
//! Verifies the bearer credential on incoming requests and resolves it to a
//! stable user identity.
//!
//! # Providers
//!
//! | Provider | How it verifies |
//! |----------|-----------------|
//! | `LocalJwtProvider` | HS256 signature check with the shared JWT secret |
//! | `HttpIdentityProvider` | Asks the hosted identity service (`/auth/v1/user`) |
//!
//! Both implement [`IdentityProvider`]. A provider outage surfaces as
//! [`AuthError::ProviderUnavailable`] and never as a rejected credential.

mod claims;
mod error;
mod provider;
mod remote;
mod signer;
mod user;

/// Test utilities for generating access tokens
pub mod test_utils;

pub use claims::{AccessTokenClaims, DEFAULT_AUDIENCE, is_jwt_format};
pub use error::{AuthError, Result};
pub use provider::{IdentityProvider, LocalJwtProvider};
pub use remote::{DEFAULT_TIMEOUT, HttpIdentityProvider};
pub use signer::TokenSigner;
pub use user::UserInfo;

/// Minimum length of the HS256 signing secret, in bytes
pub const MIN_SECRET_LENGTH: usize = 32;
