//! Test utilities for generating access tokens
//!
//! These helpers create real signed JWTs for testing authentication flows.
//! Use these instead of mocking - they test the real validation code path.

use chrono::Duration;

use crate::signer::TokenSigner;

/// Test secret for JWT signing (32 bytes for HS256)
pub const TEST_SECRET: &[u8] = b"test-secret-key-32-bytes-long!!!";

/// Create a test token valid for one hour
///
/// # Example
///
/// ```
/// use keyforge_auth::test_utils::{create_test_token, TEST_SECRET};
/// use keyforge_auth::LocalJwtProvider;
///
/// let token = create_test_token("user-1", "test@example.com");
/// let provider = LocalJwtProvider::new(TEST_SECRET);
/// // Token is valid and can be verified
/// ```
pub fn create_test_token(user_id: &str, email: &str) -> String {
    create_test_token_with_options(user_id, email, TEST_SECRET, Duration::hours(1))
}

/// Create a token that expired an hour ago
pub fn create_expired_test_token(user_id: &str, email: &str) -> String {
    create_test_token_with_options(user_id, email, TEST_SECRET, Duration::hours(-1))
}

/// Create a test token with full control over secret and lifetime
pub fn create_test_token_with_options(
    user_id: &str,
    email: &str,
    secret: &[u8],
    expires_in: Duration,
) -> String {
    TokenSigner::new(secret)
        .sign(user_id, email, expires_in)
        .expect("failed to encode test JWT")
}
