//! Command-line argument definitions for dockhand.

use camino::Utf8PathBuf;
use clap::Parser;

/// Command-line interface for dockhand.
///
/// The service has a single mode of operation (serve HTTP until shut down),
/// so there are no subcommands; flags override configuration values.
#[derive(Debug, Default, Parser)]
#[command(name = "dockhand")]
#[command(
    author,
    version,
    about = "HTTP management service for Docker and Podman container engines"
)]
pub struct Cli {
    /// Path to configuration file.
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// Address and port to serve HTTP on.
    #[arg(long)]
    pub listen_addr: Option<String>,

    /// Container engine socket path or URL.
    #[arg(long)]
    pub engine_socket: Option<String>,
}
