//! Semantic error types for the dockhand service.
//!
//! This module defines the error hierarchy for dockhand, following the
//! principle of using semantic error enums (via `thiserror`) for conditions
//! the caller might inspect, retry, or map to an HTTP status, while reserving
//! opaque errors (`eyre::Report`) for the application boundary.
//!
//! Every failure variant carries the raw captured error text from the layer
//! beneath it; no path returns a swallowed or empty error.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found at the expected path.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// The path where the configuration file was expected.
        path: Utf8PathBuf,
    },

    /// The configuration file could not be parsed.
    #[error("failed to parse configuration file: {message}")]
    ParseError {
        /// A description of the parse error.
        message: String,
    },

    /// A required configuration value is missing.
    #[error("missing required configuration: {field}")]
    MissingRequired {
        /// The name of the missing field.
        field: String,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the invalid field.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// The `OrthoConfig` library returned an error during configuration loading.
    ///
    /// This wraps errors from the layered configuration system, including:
    /// - Configuration file parsing errors
    /// - Environment variable parsing errors
    /// - CLI argument parsing errors
    /// - Missing required fields after layer merging
    #[error("configuration loading failed: {0}")]
    OrthoConfig(Arc<ortho_config::OrthoError>),
}

/// Errors that can occur while running an external command.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The child process could not be spawned at all.
    #[error("failed to spawn '{program}': {message}")]
    SpawnFailed {
        /// The program that could not be started.
        program: String,
        /// A description of the spawn failure.
        message: String,
    },

    /// The child process exited with a non-zero code.
    ///
    /// `code` is `-1` when the process was terminated by a signal and no
    /// exit code is available.
    #[error("'{program}' exited with code {code}: {stderr}")]
    ExitFailure {
        /// The program that failed.
        program: String,
        /// The exit code reported by the operating system.
        code: i32,
        /// Captured standard error, trimmed of surrounding whitespace.
        stderr: String,
    },

    /// The child process did not exit within the configured timeout.
    ///
    /// Once spawned, a process is otherwise waited on until its natural
    /// exit; this variant only occurs when a timeout was configured.
    #[error("'{program}' timed out after {seconds} seconds")]
    TimedOut {
        /// The program that was terminated.
        program: String,
        /// The timeout duration in seconds.
        seconds: u64,
    },
}

/// Errors that can occur while materialising a remote repository.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The target name would escape the workspace root or is empty.
    #[error("invalid target name '{name}': must be a single path component")]
    InvalidTargetName {
        /// The rejected target name.
        name: String,
    },

    /// The destination directory already exists.
    ///
    /// Distinguished from tool failures so callers can decide whether a
    /// retry with a different target name is sensible. The wording of this
    /// message is part of the HTTP contract.
    #[error("Directory {path} already exists.")]
    DestinationExists {
        /// The destination path that is already present.
        path: Utf8PathBuf,
    },

    /// The workspace root or destination directory could not be created.
    #[error("failed to prepare workspace directory {path}: {message}")]
    WorkspaceSetup {
        /// The path that could not be created.
        path: Utf8PathBuf,
        /// A description of the I/O error.
        message: String,
    },

    /// The clone command failed.
    #[error("failed to fetch repository: {message}")]
    CloneFailed {
        /// The captured error text from the version-control client.
        message: String,
    },
}

/// Errors that can occur during the clone-then-build orchestration flow.
///
/// The two variants identify which stage failed; the fetch stage's error is
/// returned verbatim so its classification survives to the HTTP layer.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The fetch stage failed; the build stage was never attempted.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The build command failed.
    ///
    /// Covers missing build instructions, malformed instructions, and
    /// engine-side build errors uniformly; the underlying tool does not
    /// distinguish these for this layer.
    #[error("image build failed: {message}")]
    CommandFailed {
        /// The captured error text from the build command.
        message: String,
    },
}

/// Errors that can occur while talking to the container engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Failed to connect to the container engine socket.
    #[error("failed to connect to container engine: {message}")]
    ConnectionFailed {
        /// A description of the connection failure.
        message: String,
    },

    /// Health check failed - engine did not respond correctly.
    #[error("container engine health check failed: {message}")]
    HealthCheckFailed {
        /// A description of the health check failure.
        message: String,
    },

    /// Health check timed out.
    #[error("container engine health check timed out after {seconds} seconds")]
    HealthCheckTimeout {
        /// The timeout duration in seconds.
        seconds: u64,
    },

    /// The engine rejected an operation.
    ///
    /// All pass-through operations surface engine failures uniformly with
    /// the engine's own message text.
    #[error("engine operation failed: {message}")]
    Api {
        /// The error text reported by the engine.
        message: String,
    },
}

impl From<bollard::errors::Error> for EngineError {
    fn from(error: bollard::errors::Error) -> Self {
        Self::Api {
            message: error.to_string(),
        }
    }
}

/// Top-level error type for the dockhand service.
///
/// This enum aggregates all domain-specific errors into a single type that
/// can be used throughout the application. At the application boundary
/// (main.rs), these errors are typically converted to `eyre::Report` for
/// human-readable error reporting; at the HTTP boundary they are mapped to
/// JSON error responses.
#[derive(Debug, Error)]
pub enum DockhandError {
    /// An error occurred during configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An error occurred while running an external command.
    #[error(transparent)]
    Process(#[from] ProcessError),

    /// An error occurred while fetching a remote repository.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// An error occurred during the build orchestration flow.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// An error occurred while talking to the container engine.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// A specialised `Result` type for dockhand operations.
pub type Result<T> = std::result::Result<T, DockhandError>;
