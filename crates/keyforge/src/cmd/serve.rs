//! Serve command - Run the license issuance server

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use keyforge_api::{AppState, build_router};
use keyforge_auth::{HttpIdentityProvider, IdentityProvider, LocalJwtProvider};
use keyforge_config::{AuthConfig, AuthMode, Config};
use keyforge_control::ControlPlane;
use keyforge_license::{ControlPlaneLicenseStore, IssuanceService, QuotaPolicy};

/// Serve command arguments
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file (defaults to configs/config.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Filled from the global `--jwt-secret` / `KEYFORGE_JWT_SECRET`
    #[arg(skip)]
    pub jwt_secret: Option<String>,
}

/// Run the serve command
pub async fn run(args: ServeArgs) -> Result<()> {
    let config_path = args
        .config
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(default)".to_string());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        platform = std::env::consts::OS,
        arch = std::env::consts::ARCH,
        config = %config_path,
        "Keyforge starting"
    );

    let mut config = load_config(args.config.as_deref())?;
    if let Some(secret) = args.jwt_secret {
        config.auth.jwt_secret = Some(secret);
        config.validate().context("invalid JWT secret")?;
    }

    if let Err(e) = run_server(config).await {
        error!(error = %e, "server error");
        return Err(e);
    }

    info!("Keyforge shutdown complete");
    Ok(())
}

/// Load configuration from an explicit path or the default locations
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            // User explicitly provided config path - must exist
            if !path.exists() {
                anyhow::bail!("config file not found: {}", path.display());
            }
            Config::from_file(path).context("failed to load configuration")
        }
        None => {
            let default_paths = [
                PathBuf::from("configs/config.toml"),
                PathBuf::from("keyforge.toml"),
            ];

            for path in &default_paths {
                if path.exists() {
                    info!(config = %path.display(), "using config file");
                    return Config::from_file(path).context("failed to load configuration");
                }
            }

            info!("no config file found, using defaults");
            Ok(Config::default())
        }
    }
}

/// Main server run loop
async fn run_server(config: Config) -> Result<()> {
    let state = build_state(&config).await?;

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(
        addr = %addr,
        auth_mode = ?config.auth.mode,
        serialize_per_user = config.issuance.serialize_per_user,
        "Keyforge listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown())
        .await
        .context("server failed")?;

    Ok(())
}

/// Wire the control plane, identity provider and issuance service
pub async fn build_state(config: &Config) -> Result<AppState> {
    let control = Arc::new(init_control_plane(config).await?);
    let identity = init_identity(&config.auth)?;

    info!(provider = identity.name(), "identity provider initialized");

    let quota = &config.quota;
    let policy = QuotaPolicy::new(quota.free, quota.pro, quota.premium);

    let store = Arc::new(ControlPlaneLicenseStore::new(Arc::clone(&control)));
    let issuer = IssuanceService::new(store, policy)
        .with_max_attempts(config.issuance.max_attempts)
        .with_precheck(config.issuance.precheck)
        .with_per_user_serialization(config.issuance.serialize_per_user);

    Ok(AppState::with_issuer(identity, control, issuer))
}

/// Initialize the control plane database
async fn init_control_plane(config: &Config) -> Result<ControlPlane> {
    let data_dir = config.server.data_dir_path();

    std::fs::create_dir_all(&data_dir).context("failed to create data directory")?;

    let data_dir = data_dir
        .to_str()
        .context("data directory path is not valid UTF-8")?;

    ControlPlane::new(data_dir)
        .await
        .context("failed to initialize control plane")
}

/// Build the identity provider for the configured mode
pub fn init_identity(auth: &AuthConfig) -> Result<Arc<dyn IdentityProvider>> {
    match auth.mode {
        AuthMode::Local => {
            let secret = auth.jwt_secret_bytes().context(
                "auth.jwt_secret is required for local mode (or set KEYFORGE_JWT_SECRET)",
            )?;
            let mut provider = LocalJwtProvider::new(secret);
            if let Some(ref audience) = auth.audience {
                provider = provider.with_audience(audience);
            }
            Ok(Arc::new(provider))
        }
        AuthMode::Remote => {
            let url = auth
                .provider_url
                .as_deref()
                .context("auth.provider_url is required for remote mode")?;
            let api_key = auth.api_key.clone().unwrap_or_default();
            let provider = HttpIdentityProvider::new(url, api_key, auth.timeout)
                .context("failed to build identity provider client")?;
            Ok(Arc::new(provider))
        }
    }
}

/// Wait for SIGINT or SIGTERM
async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
