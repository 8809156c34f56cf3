//! Token command - Mint a local development access token
//!
//! Signs a token with the same secret the server verifies with, so a
//! locally running instance can be exercised with curl.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Duration;
use clap::Args;

use keyforge_auth::{MIN_SECRET_LENGTH, TokenSigner};

use crate::cmd::serve::load_config;

/// Token command arguments
#[derive(Args, Debug)]
pub struct TokenArgs {
    /// Subject (user ID) of the token
    #[arg(long)]
    pub user_id: String,

    /// Email claim
    #[arg(long, default_value = "")]
    pub email: String,

    /// Lifetime in hours
    #[arg(long, default_value_t = 1)]
    pub ttl_hours: i64,

    /// Filled from the global `--config`
    #[arg(skip)]
    pub config: Option<PathBuf>,

    /// Filled from the global `--jwt-secret` / `KEYFORGE_JWT_SECRET`
    #[arg(skip)]
    pub jwt_secret: Option<String>,
}

/// Run the token command
pub fn run(args: TokenArgs) -> Result<()> {
    let token = mint(&args)?;
    println!("{token}");
    Ok(())
}

fn mint(args: &TokenArgs) -> Result<String> {
    if args.ttl_hours <= 0 {
        anyhow::bail!("--ttl-hours must be positive");
    }

    let config = load_config(args.config.as_deref())?;
    let secret = args
        .jwt_secret
        .clone()
        .or(config.auth.jwt_secret)
        .context("no JWT secret: pass --jwt-secret, set KEYFORGE_JWT_SECRET or auth.jwt_secret")?;

    if secret.len() < MIN_SECRET_LENGTH {
        anyhow::bail!("JWT secret must be at least {MIN_SECRET_LENGTH} bytes");
    }

    let mut signer = TokenSigner::new(secret.as_bytes());
    if let Some(audience) = config.auth.audience {
        signer = signer.with_audience(audience);
    }

    signer
        .sign(&args.user_id, &args.email, Duration::hours(args.ttl_hours))
        .context("failed to sign token")
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyforge_auth::{IdentityProvider, LocalJwtProvider};

    const SECRET: &str = "test-secret-key-32-bytes-long!!!";

    fn args(secret: &str, ttl_hours: i64) -> TokenArgs {
        TokenArgs {
            user_id: "user-1".to_string(),
            email: "dev@example.com".to_string(),
            ttl_hours,
            config: None,
            jwt_secret: Some(secret.to_string()),
        }
    }

    #[tokio::test]
    async fn test_minted_token_verifies() {
        let token = mint(&args(SECRET, 2)).unwrap();

        let provider = LocalJwtProvider::new(SECRET.as_bytes()).with_audience("authenticated");
        let user = provider.validate(&token).await.unwrap();
        assert_eq!(user.id, "user-1");
        assert_eq!(user.email, "dev@example.com");
    }

    #[test]
    fn test_short_secret_rejected() {
        assert!(mint(&args("short", 1)).is_err());
    }

    #[test]
    fn test_non_positive_ttl_rejected() {
        assert!(mint(&args(SECRET, 0)).is_err());
    }
}
