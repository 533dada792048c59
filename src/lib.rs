//! HTTP management service for Docker and Podman container engines.
//!
//! `dockhand` exposes a thin REST façade over an already-running container
//! daemon: image build/push/pull/list/delete, container lifecycle and logs,
//! and volume management. Every engine operation is a single request/response
//! round trip against the daemon; the one multi-step flow is building an
//! image from a remote source repository (clone, then build, reporting the
//! first failure encountered).
//!
//! # Architecture
//!
//! The service holds the sole connection to the host Docker or Podman
//! socket. Inbound JSON requests are translated into engine calls (via
//! Bollard) or into external tool invocations (`git`, `docker build`) and
//! the daemon's responses are returned as JSON. No state is kept between
//! requests; the only persistent side effect is the cloned source tree a
//! build request leaves under the workspace root.
//!
//! # Modules
//!
//! - [`config`]: Configuration system with layered precedence (CLI > env > file > defaults)
//! - [`engine`]: Container engine connection and pass-through operations
//! - [`error`]: Semantic error types for the application
//! - [`process`]: External command execution with captured output
//! - [`fetch`]: Materialising remote repositories into the workspace
//! - [`build`]: The clone-then-build orchestration flow
//! - [`server`]: The axum HTTP surface

pub mod build;
pub mod config;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod process;
pub mod server;
