//! clipscout-api - Audio clip recognition microservice
//!
//! Accepts an uploaded clip, identifies the track, looks it up on a video
//! platform and a movie/TV metadata service, and returns the merged matches
//! with streaming-platform links.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clipscout_api::config::{CliOverrides, ServiceConfig};
use clipscout_api::services::{AuddClient, SearchOrchestrator, TmdbClient, YouTubeClient};
use clipscout_api::storage::UploadStore;
use clipscout_api::AppState;
use clipscout_common::config::{
    load_default_toml_config, load_toml_config, CompiledDefaults, RootFolderInitializer, TomlConfig,
};

/// Command-line arguments for clipscout-api
#[derive(Parser, Debug)]
#[command(name = "clipscout-api")]
#[command(about = "Audio clip recognition microservice")]
#[command(version)]
struct Args {
    /// Root folder holding the database and uploaded media
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Address to listen on (host:port)
    #[arg(short, long)]
    bind: Option<String>,

    /// TOML config file (overrides CLIPSCOUT_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn load_config_file(path: Option<&PathBuf>) -> Result<TomlConfig> {
    match path {
        Some(path) => load_toml_config(path)
            .with_context(|| format!("Failed to load config file {}", path.display())),
        None => Ok(load_default_toml_config()),
    }
}

fn init_tracing(toml: &TomlConfig) {
    let default_directive = toml
        .logging
        .level
        .clone()
        .unwrap_or_else(|| CompiledDefaults::for_current_platform().log_level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = load_config_file(args.config.as_ref())?;
    init_tracing(&toml_config);

    info!("Starting clipscout-api (Audio Clip Recognition) microservice");
    info!(
        "Version: {} (git {}, built {}, {})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let cli = CliOverrides {
        root_folder: args.root_folder,
        bind_address: args.bind,
    };
    let config = ServiceConfig::resolve(&cli, &toml_config)
        .context("Failed to resolve configuration")?;
    config.warn_missing_credentials();

    // Root folder layout: database file plus media namespace
    let initializer = RootFolderInitializer::new(config.root_folder.clone());
    initializer
        .ensure_directory_exists()
        .context("Failed to initialize root folder")?;

    let db_path = initializer.database_path();
    info!("Database: {}", db_path.display());
    let db_pool = clipscout_common::db::init_database(&db_path)
        .await
        .context("Failed to open database")?;
    info!("Database connection established");

    let store = UploadStore::new(initializer.media_path());
    info!("Media root: {}", store.media_root().display());

    let recognizer = AuddClient::new(&config).context("Failed to build recognition client")?;
    let videos = YouTubeClient::new(&config).context("Failed to build video search client")?;
    let metadata = TmdbClient::new(&config).context("Failed to build metadata client")?;

    let orchestrator = SearchOrchestrator::new(
        db_pool.clone(),
        store,
        Arc::new(recognizer),
        Arc::new(videos),
        Arc::new(metadata),
    );

    let state = AppState::new(db_pool, orchestrator);
    let app = clipscout_api::build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_address))?;
    info!("Listening on http://{}", config.bind_address);
    info!("Health check: http://{}/health", config.bind_address);

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
            warn!("Failed to listen for Ctrl+C: {}", e);
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
                warn!("Failed to install terminate handler: {}", e);
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
