//! Configuration system for dockhand.
//!
//! This module provides the configuration structures and CLI definitions for
//! the dockhand service. Configuration loading and precedence merging is
//! handled by the `ortho_config` crate. Intended precedence: CLI flags
//! override environment variables, which override configuration files, which
//! override defaults.
//!
//! The configuration file is expected at `~/.config/dockhand/config.toml` by
//! default.
//!
//! # Example Configuration
//!
//! ```toml
//! listen_addr = "0.0.0.0:8000"
//! engine_socket = "unix:///run/user/1000/podman/podman.sock"
//!
//! [workspace]
//! root = "/work"
//! retain_on_failure = true
//!
//! [fetch]
//! program = "git"
//! timeout_secs = 300
//!
//! [build]
//! program = "docker"
//! timeout_secs = 1800
//!
//! [registry]
//! address = "registry.example.test"
//! username = "ci-bot"
//! password = "hunter2"
//! ```

mod cli;
mod loader;
mod types;


pub use cli::Cli;
pub use loader::{env_var_names, load_config};
pub use types::{AppConfig, BuildConfig, FetchConfig, RegistryConfig, WorkspaceConfig};
