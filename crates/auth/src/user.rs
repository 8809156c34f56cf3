//! Verified identity
//!
//! UserInfo represents the authenticated caller in a request context.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::claims::AccessTokenClaims;

/// Authenticated user information
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserInfo {
    /// Stable user ID (token subject)
    pub id: String,

    /// Email address
    #[serde(default)]
    pub email: String,

    /// Provider role
    #[serde(default)]
    pub role: String,

    /// Additional metadata
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl UserInfo {
    /// Create a new user with minimal info
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            role: String::new(),
            metadata: HashMap::new(),
        }
    }

    /// Which verifier resolved this identity ("jwt" or "remote")
    pub fn auth_method(&self) -> Option<&str> {
        self.metadata.get("auth_method").map(|s| s.as_str())
    }

    /// Create UserInfo from verified token claims
    pub fn from_claims(claims: &AccessTokenClaims) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert("auth_method".to_string(), "jwt".to_string());
        if let Some(ref session_id) = claims.session_id {
            metadata.insert("session_id".to_string(), session_id.clone());
        }

        Self {
            id: claims.subject.clone(),
            email: claims.email.clone(),
            role: claims.role.clone(),
            metadata,
        }
    }
}
