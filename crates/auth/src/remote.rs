//! Remote identity provider
//!
//! Verifies a bearer credential by asking the hosted identity service who it
//! belongs to (`GET {base_url}/auth/v1/user`). Used when the JWT secret is not
//! available locally.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::claims::is_jwt_format;
use crate::error::{AuthError, Result};
use crate::provider::IdentityProvider;
use crate::user::UserInfo;

/// Default request timeout for provider calls
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// User object returned by the identity service
#[derive(Debug, Deserialize)]
struct RemoteUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

/// HTTP-backed identity provider
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    user_url: String,
    api_key: String,
}

impl std::fmt::Debug for HttpIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpIdentityProvider")
            .field("user_url", &self.user_url)
            .finish()
    }
}

impl HttpIdentityProvider {
    /// Create a provider for the identity service at `base_url`
    pub fn new(base_url: &str, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::unavailable(format!("http client: {e}")))?;

        Ok(Self {
            client,
            user_url: format!("{}/auth/v1/user", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn validate(&self, token: &str) -> Result<UserInfo> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        if !is_jwt_format(token) {
            return Err(AuthError::InvalidTokenFormat);
        }

        let response = self
            .client
            .get(&self.user_url)
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "identity provider request failed");
                AuthError::unavailable(e.to_string())
            })?;

        let status = response.status();
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            warn!(%status, "identity provider returned an error");
            return Err(AuthError::unavailable(format!("provider returned {status}")));
        }
        if !status.is_success() {
            debug!(%status, "identity provider rejected credential");
            return Err(AuthError::Rejected);
        }

        let remote: RemoteUser = response
            .json()
            .await
            .map_err(|e| AuthError::unavailable(format!("malformed provider response: {e}")))?;

        if remote.id.is_empty() {
            return Err(AuthError::Rejected);
        }

        let mut metadata = HashMap::new();
        metadata.insert("auth_method".to_string(), "remote".to_string());

        Ok(UserInfo {
            id: remote.id,
            email: remote.email.unwrap_or_default(),
            role: remote.role.unwrap_or_default(),
            metadata,
        })
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_token;
    use axum::Json;
    use axum::Router;
    use axum::http::{HeaderMap, StatusCode as AxumStatus};
    use axum::routing::get;

    const API_KEY: &str = "anon-key";

    /// Serve a fake identity service that accepts exactly `good_token`
    async fn spawn_provider(good_token: String) -> String {
        let app = Router::new().route(
            "/auth/v1/user",
            get(move |headers: HeaderMap| {
                let good_token = good_token.clone();
                async move {
                    let apikey = headers.get("apikey").and_then(|v| v.to_str().ok());
                    let bearer = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.strip_prefix("Bearer "));

                    if apikey != Some(API_KEY) || bearer != Some(good_token.as_str()) {
                        return Err(AxumStatus::UNAUTHORIZED);
                    }
                    Ok(Json(serde_json::json!({
                        "id": "remote-user",
                        "email": "remote@example.com",
                        "role": "authenticated"
                    })))
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_remote_accepts_known_token() {
        let token = create_test_token("ignored", "ignored@example.com");
        let base = spawn_provider(token.clone()).await;
        let provider = HttpIdentityProvider::new(&base, API_KEY, DEFAULT_TIMEOUT).unwrap();

        let user = provider.validate(&token).await.unwrap();
        assert_eq!(user.id, "remote-user");
        assert_eq!(user.email, "remote@example.com");
        assert_eq!(user.auth_method(), Some("remote"));
    }

    #[tokio::test]
    async fn test_remote_rejects_unknown_token() {
        let base = spawn_provider(create_test_token("a", "")).await;
        let provider = HttpIdentityProvider::new(&base, API_KEY, DEFAULT_TIMEOUT).unwrap();

        let other = create_test_token("b", "");
        let result = provider.validate(&other).await;
        assert!(matches!(result, Err(AuthError::Rejected)));
    }

    #[tokio::test]
    async fn test_remote_outage_is_unavailable() {
        // Bind then drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider = HttpIdentityProvider::new(
            &format!("http://{addr}"),
            API_KEY,
            Duration::from_millis(500),
        )
        .unwrap();

        let result = provider.validate(&create_test_token("a", "")).await;
        assert!(matches!(result, Err(AuthError::ProviderUnavailable(_))));
    }

    #[tokio::test]
    async fn test_remote_checks_format_before_calling() {
        let provider =
            HttpIdentityProvider::new("http://127.0.0.1:1", API_KEY, DEFAULT_TIMEOUT).unwrap();
        let result = provider.validate("garbage").await;
        assert!(matches!(result, Err(AuthError::InvalidTokenFormat)));
    }
}
