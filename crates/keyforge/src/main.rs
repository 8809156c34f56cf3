//! Keyforge - License issuance service
//!
//! # Usage
//!
//! ```bash
//! # Run the server (default)
//! keyforge
//! keyforge --config configs/config.toml
//!
//! # Mint a local development token
//! keyforge token --user-id user-1 --email dev@example.com
//! ```

mod cmd;

use anyhow::Result;
use clap::{Parser, Subcommand};
use keyforge_config::{Config, LogConfig, LogFormat};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Keyforge - License issuance service
#[derive(Parser, Debug)]
#[command(name = "keyforge")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    // Global args that apply to serve when no subcommand given
    /// Path to configuration file (error if specified but not found)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides config file.
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// JWT secret for signing and verifying local tokens. Overrides config file.
    #[arg(long, global = true, env = "KEYFORGE_JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the server
    Serve(cmd::serve::ServeArgs),

    /// Mint an access token signed with the configured JWT secret
    Token(cmd::token::TokenArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = cli.log_level.clone();

    match resolve_command(cli) {
        Command::Serve(args) => {
            let (level, format) = resolve_log_settings(log_level.as_deref(), args.config.as_deref());
            init_logging(&level, format)?;
            cmd::serve::run(args).await
        }
        // Token prints to stdout only
        Command::Token(args) => cmd::token::run(args),
    }
}

/// Fold global args into the command to run
///
/// No subcommand means `serve`.
fn resolve_command(cli: Cli) -> Command {
    match cli.command {
        Some(Command::Serve(mut args)) => {
            // Subcommand --config wins over the global one
            if args.config.is_none() {
                args.config = cli.config;
            }
            args.jwt_secret = cli.jwt_secret;
            Command::Serve(args)
        }
        Some(Command::Token(mut args)) => {
            args.config = cli.config;
            args.jwt_secret = cli.jwt_secret;
            Command::Token(args)
        }
        None => Command::Serve(cmd::serve::ServeArgs {
            config: cli.config,
            jwt_secret: cli.jwt_secret,
        }),
    }
}

/// Resolve log level (CLI flag > config file > "info") and format
fn resolve_log_settings(
    cli_level: Option<&str>,
    config_path: Option<&std::path::Path>,
) -> (String, LogFormat) {
    let config = config_path
        .filter(|path| path.exists())
        .and_then(|path| Config::from_file(path).ok());

    let format = config
        .as_ref()
        .map(|c| c.log.format)
        .unwrap_or_default();

    // CLI flag takes precedence
    let level = match (cli_level, &config) {
        (Some(level), _) => level.to_string(),
        (None, Some(config)) => config.log.level.as_str().to_string(),
        (None, None) => "info".to_string(),
    };

    (level, format)
}

/// Initialize the tracing subscriber for logging
///
/// `RUST_LOG` wins over the resolved level when set.
fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(LogConfig::filter_directive(level)))
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Console => registry
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
    }

    Ok(())
}
