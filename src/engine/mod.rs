//! Container engine connection and pass-through operations.
//!
//! This module provides the interface for connecting to Docker or Podman
//! container engines and the thin operation facade the HTTP surface calls
//! into. The socket endpoint is resolved through a priority-based fallback
//! chain:
//!
//! 1. CLI argument (`--engine-socket`)
//! 2. Config file (`engine_socket` in TOML)
//! 3. `DOCKHAND_ENGINE_SOCKET` environment variable
//! 4. `DOCKER_HOST` environment variable
//! 5. `CONTAINER_HOST` environment variable
//! 6. `PODMAN_HOST` environment variable
//! 7. Platform default (`/var/run/docker.sock` on Unix)

mod client;
mod connection;

pub use client::{EngineClient, EngineOps};
pub use connection::{EngineConnector, SocketResolver};
