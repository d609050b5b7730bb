//! cow-er (Colours of Wine expert review) - main entry point
//!
//! Startup: config → tracing → root folder → database → router → serve.
//! A missing config file, token, or remote service never blocks startup.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use cow_common::config::{RootFolderInitializer, RootFolderResolver, TomlConfig, REMOTE_TOKEN_ENV};
use cow_er::remote::RemoteImageClient;
use cow_er::{build_router, AppState};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for cow-er
#[derive(Parser, Debug)]
#[command(name = "cow-er")]
#[command(about = "Colours of Wine expert review service")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides config file)
    #[arg(short, long, env = "COW_PORT")]
    port: Option<u16>,

    /// Folder holding cow.db (overrides COW_ROOT_FOLDER and config file)
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Config file path (default: platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Token for the remote image service
    #[arg(long, env = REMOTE_TOKEN_ENV, hide_env_values = true)]
    remote_token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Loaded before tracing exists, so the logging settings can apply
    let config = TomlConfig::load_or_default(args.config.as_deref());

    init_tracing(&config)?;
    info!("Log level: {}", config.logging.level);

    info!(
        "Starting Colours of Wine expert review (cow-er) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let root_folder = RootFolderResolver::new("expert-review")
        .with_cli_arg(args.root_folder)
        .with_toml(&config)
        .resolve();

    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .context("Failed to initialize root folder")?;

    let db_path = initializer.database_path();
    info!("Database: {}", db_path.display());

    let pool = cow_er::db::init_database(&db_path)
        .await
        .context("Failed to open database")?;
    info!("✓ Database ready");

    let mut state = AppState::new(pool).with_image_size(config.image.size);
    info!("Primary renderer: swatch, {}px", state.image_size);

    let token = if config.remote_image.enabled {
        args.remote_token
            .filter(|t| !t.trim().is_empty())
            .or_else(|| config.remote_image.resolve_token())
    } else {
        None
    };
    match token {
        Some(token) => match RemoteImageClient::from_config(&config.remote_image, token) {
            Ok(client) => {
                info!("Secondary renderer: {}", client.base_url());
                state = state.with_remote(client);
            }
            Err(e) => warn!("Secondary renderer disabled: {}", e),
        },
        None => info!("Secondary renderer disabled (no token configured)"),
    }

    let app = build_router(state);

    let port = args.port.unwrap_or(config.port);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("cow-er listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Log to stderr, or to `logging.file` when configured
///
/// `RUST_LOG` takes precedence over `logging.level`.
fn init_tracing(config: &TomlConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match &config.logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
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
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
