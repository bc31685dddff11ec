//! Todo Service Server
//!
//! Serves the todo HTTP API over the configured document store.

use clap::{Arg, ArgMatches, Command};
use std::path::Path;
use tokio::signal;
use tracing::{error, info, warn};

use todo_service::api::start_api_server;
use todo_service::core::{create_app_state, init_tracing};
use todo_service::{Config, Error, Result};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let matches = Command::new("todo-service")
        .version(todo_service::VERSION)
        .about("Task-list HTTP service backed by a document store.")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path"),
        )
        .arg(
            Arg::new("http-addr")
                .long("http-addr")
                .value_name("ADDR")
                .help("HTTP server bind address"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (trace, debug, info, warn, error)"),
        )
        .arg(
            Arg::new("id-allocation")
                .long("id-allocation")
                .value_name("MODE")
                .help("Id allocation on create (atomic, scan)"),
        )
        .get_matches();

    // Load configuration
    let mut config = Config::load(matches.get_one::<String>("config").map(Path::new))?;

    // Apply CLI overrides
    apply_cli_overrides(&mut config, &matches)?;
    config.validate()?;

    // Initialize logging
    init_tracing(&config.logging)?;

    info!("Starting {} v{}", todo_service::NAME, todo_service::VERSION);
    info!(
        "Store target {} namespace {} (id allocation: {})",
        config.store.target(),
        config.store.namespace(),
        config.store.id_allocation
    );

    let configured = create_app_state(config)?;
    start_api_server(configured, shutdown_signal()).await?;

    info!("Shutdown complete");
    Ok(())
}

/// Apply command line argument overrides to configuration
fn apply_cli_overrides(config: &mut Config, matches: &ArgMatches) -> Result<()> {
    if let Some(addr) = matches.get_one::<String>("http-addr") {
        config.server.http_addr = addr
            .parse()
            .map_err(|e| Error::config(format!("Invalid HTTP address: {}", e)))?;
    }

    if let Some(level) = matches.get_one::<String>("log-level") {
        config.logging.level = level.clone();
    }

    if let Some(mode) = matches.get_one::<String>("id-allocation") {
        config.store.id_allocation = mode.parse().map_err(Error::config)?;
    }

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C signal, shutting down");
        },
        _ = terminate => {
            warn!("Received terminate signal, shutting down");
        },
    }
}
