//! Issuance error types.

use thiserror::Error;

/// Why an issuance request did not produce a license.
#[derive(Debug, Error)]
pub enum IssueError {
    /// The caller's profile does not exist or has no resolvable plan tier.
    #[error("user profile not found")]
    ProfileNotFound,

    /// The caller already owns as many keys as their plan allows.
    #[error("plan limit reached: {limit} keys maximum")]
    QuotaExceeded { limit: u64 },

    /// Every candidate key collided with an existing one.
    #[error("failed to generate unique key after {attempts} attempts")]
    KeyGenerationExhausted { attempts: u32 },

    /// The backing store could not be reached.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The store rejected the write for a reason other than a key collision.
    #[error("failed to create license: {0}")]
    PersistenceFailure(String),
}

/// Store-level failure, as seen by the issuance service.
#[derive(Debug, Error)]
pub enum StoreError {
    /// UNIQUE violation on the key column. Nothing was written.
    #[error("license key already exists")]
    Conflict,

    /// The stored profile carries a plan tier outside the known set.
    #[error("invalid profile: {0}")]
    InvalidProfile(String),

    /// The store could not be reached or a read failed.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A write failed.
    #[error("store write failed: {0}")]
    Write(String),
}

impl From<StoreError> for IssueError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidProfile(_) => Self::ProfileNotFound,
            StoreError::Unavailable(msg) => Self::UpstreamUnavailable(msg),
            StoreError::Conflict => Self::PersistenceFailure("unexpected key conflict".into()),
            StoreError::Write(msg) => Self::PersistenceFailure(msg),
        }
    }
}

/// Result type for issuance.
pub type Result<T> = std::result::Result<T, IssueError>;
