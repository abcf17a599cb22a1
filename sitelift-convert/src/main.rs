//! sitelift-convert - Main entry point
//!
//! HTTP service converting uploaded static sites into React projects.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sitelift_common::config::{CompiledDefaults, RootFolderResolver, TomlConfig};
use sitelift_convert::config::MODULE_NAME;
use sitelift_convert::{build_router, AppState, ConvertSettings};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for sitelift-convert
#[derive(Parser, Debug)]
#[command(name = "sitelift-convert")]
#[command(about = "Static site to React project conversion service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "SITELIFT_PORT")]
    port: Option<u16>,

    /// Root folder for uploads, scratch space and downloads
    /// (falls back to SITELIFT_ROOT_FOLDER, then the config file)
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Address to bind
    #[arg(short, long, env = "SITELIFT_BIND")]
    bind: Option<String>,

    /// Upload ceiling in MiB
    #[arg(long, env = "SITELIFT_MAX_UPLOAD_MB")]
    max_upload_mb: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    // Logged below, once the subscriber is installed
    let (toml_config, config_source) = TomlConfig::load_with_source(MODULE_NAME);
    let defaults = CompiledDefaults::for_current_platform();

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "sitelift_convert={0},sitelift_common={0},tower_http={0}",
                    toml_config.logging.level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting sitelift-convert v{}",
        env!("CARGO_PKG_VERSION")
    );
    config_source.log();

    let root_folder = RootFolderResolver::new(MODULE_NAME)
        .with_cli_override(args.root_folder.clone())
        .with_toml_config(toml_config.clone())
        .resolve();

    let mut settings = ConvertSettings::for_root(&root_folder).with_toml(&toml_config);
    if let Some(mb) = args.max_upload_mb {
        settings = settings.with_max_upload_bytes(mb.saturating_mul(1024 * 1024));
    }
    settings
        .ensure_directories()
        .context("Failed to create root folder layout")?;

    info!("Root folder: {}", settings.root_folder.display());
    info!("Upload limit: {} bytes", settings.max_upload_bytes);

    let port = args.port.or(toml_config.port).unwrap_or(defaults.port);
    let bind = args
        .bind
        .or(toml_config.bind_address.clone())
        .unwrap_or(defaults.bind_address);
    let ip: IpAddr = bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", bind))?;
    let addr = SocketAddr::new(ip, port);

    let app = build_router(AppState::new(settings));

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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
