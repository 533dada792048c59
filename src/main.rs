//! `dockhand` service entry point.
//!
//! This binary serves the HTTP management API for a Docker or Podman
//! daemon. It uses `eyre` for opaque error handling at the application
//! boundary, converting domain-specific errors into human-readable reports.
//!
//! Configuration is loaded with layered precedence via `OrthoConfig`:
//! 1. Application defaults
//! 2. Configuration file (`~/.config/dockhand/config.toml` or path from `DOCKHAND_CONFIG_PATH`)
//! 3. Environment variables (`DOCKHAND_*`)
//! 4. Command-line arguments
//!
//! The engine connection is established and health-checked once at startup;
//! a daemon that is not reachable fails the boot rather than surfacing on
//! the first request.

use clap::Parser;
use eyre::{Report, Result as EyreResult};
use mockable::DefaultEnv;
use tracing_subscriber::EnvFilter;

use dockhand::config::{Cli, load_config};
use dockhand::engine::{EngineConnector, SocketResolver};
use dockhand::server::{self, AppState};

/// Application entry point.
///
/// Loads configuration, connects to the container engine, and serves the
/// API until the process is terminated.
#[tokio::main]
async fn main() -> EyreResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse CLI first (for --config and override flags).
    let cli = Cli::parse();

    // Load configuration with layered precedence: defaults < file < env < CLI.
    let config = load_config(&cli).map_err(Report::from)?;

    let env = DefaultEnv::new();
    let resolver = SocketResolver::new(&env);
    let socket = EngineConnector::resolve_socket(config.engine_socket.as_deref(), &resolver);
    tracing::info!(socket = %socket, "connecting to container engine");

    let docker =
        EngineConnector::connect_with_fallback_and_verify(config.engine_socket.as_deref(), &resolver)
            .await
            .map_err(Report::from)?;

    let state = AppState::from_config(&config, docker);
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "dockhand listening");

    axum::serve(listener, server::router(state)).await?;
    Ok(())
}
