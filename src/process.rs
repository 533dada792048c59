//! External command execution with captured output.
//!
//! Both the repository fetch and the image build steps shell out to external
//! tools. This module owns that boundary: it spawns a child process with
//! piped stdout/stderr, waits for its natural exit, and reports either the
//! trimmed standard output (exit code zero) or a structured
//! [`ProcessError`](crate::error::ProcessError) carrying the trimmed standard
//! error. Output is captured in full and returned atomically; no partial
//! streaming is exposed.
//!
//! Callers may attach a timeout to an invocation. Without one, the caller
//! blocks until the child exits.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::error::ProcessError;

/// One external process invocation: program, ordered arguments, and an
/// optional wait timeout.
///
/// The child inherits the service's environment and working directory; no
/// isolation is attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// The program to execute.
    pub program: String,

    /// Ordered argument list.
    pub args: Vec<String>,

    /// Optional limit on how long to wait for the child to exit.
    pub timeout: Option<Duration>,
}

impl CommandSpec {
    /// Create an invocation with no timeout.
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: None,
        }
    }

    /// Attach an optional wait timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Boxed future type returned by [`CommandRunner`] implementors.
pub type RunCommandFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, ProcessError>> + Send + 'a>>;

/// Behaviour required to run an external command and capture its output.
///
/// This abstraction exists to keep the fetch and build orchestration
/// testable without spawning real processes.
pub trait CommandRunner: Send + Sync {
    /// Run the command to completion and return its trimmed standard output.
    fn run(&self, spec: CommandSpec) -> RunCommandFuture<'_>;
}

/// Production [`CommandRunner`] backed by [`tokio::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, spec: CommandSpec) -> RunCommandFuture<'_> {
        Box::pin(run_command(spec))
    }
}

/// Spawn the process described by `spec` and wait for it to exit.
///
/// # Errors
///
/// Returns `ProcessError::SpawnFailed` when the program cannot be started,
/// `ProcessError::TimedOut` when a configured timeout elapses before the
/// child exits, and `ProcessError::ExitFailure` for a non-zero exit code.
async fn run_command(spec: CommandSpec) -> Result<String, ProcessError> {
    // kill_on_drop so a timed-out child does not linger after the wait
    // future is abandoned.
    let child = Command::new(&spec.program)
        .args(&spec.args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|error| ProcessError::SpawnFailed {
            program: spec.program.clone(),
            message: error.to_string(),
        })?;

    let waited = match spec.timeout {
        Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
            .await
            .map_err(|_| ProcessError::TimedOut {
                program: spec.program.clone(),
                seconds: limit.as_secs(),
            })?,
        None => child.wait_with_output().await,
    };

    let output = waited.map_err(|error| ProcessError::SpawnFailed {
        program: spec.program.clone(),
        message: format!("failed to collect output: {error}"),
    })?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_owned())
    } else {
        Err(ProcessError::ExitFailure {
            program: spec.program,
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        })
    }
}
