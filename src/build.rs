//! The clone-then-build orchestration flow.
//!
//! Building an image from a remote source is the one multi-step operation in
//! the service: fetch the repository, then invoke the image build command
//! against the freshly populated tree. The two steps are strictly
//! sequential; a failed fetch short-circuits the flow so a half-fetched or
//! missing source tree is never fed into a build. There is exactly one build
//! attempt per call, with no retry.
//!
//! No pre-validation of build-instruction presence is performed: if the
//! fetched tree has no build instructions at its root, the build command
//! fails and its error text is surfaced verbatim.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use crate::error::BuildError;
use crate::fetch::RepositoryFetcher;
use crate::process::{CommandRunner, CommandSpec};

/// Default image build program.
const DEFAULT_BUILD_PROGRAM: &str = "docker";

/// Parameters for one build-from-remote-source request.
///
/// The image name is a caller-supplied opaque string passed through
/// unvalidated to the build command; the target name doubles as the clone
/// directory and the build context directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    /// Remote repository to clone.
    pub source_url: String,

    /// Image name (and optional tag) to build.
    pub image_name: String,

    /// Directory name under the workspace root used as the build context.
    pub target_name: String,
}

/// Successful outcome of a build-from-remote-source request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    /// Human-readable success message.
    pub message: String,

    /// Captured output of the build command.
    pub output: String,
}

/// Drives the fetch-then-build sequence for one request at a time.
pub struct SourceBuilder {
    fetcher: RepositoryFetcher,
    runner: Arc<dyn CommandRunner>,
    program: String,
    timeout: Option<Duration>,
    retain_on_failure: bool,
}

impl SourceBuilder {
    /// Create a builder from a fetcher and a command runner.
    ///
    /// Defaults: `docker` as the build program, no timeout, and retention of
    /// the fetched tree when the build fails.
    #[must_use]
    pub fn new(fetcher: RepositoryFetcher, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            fetcher,
            runner,
            program: String::from(DEFAULT_BUILD_PROGRAM),
            timeout: None,
            retain_on_failure: true,
        }
    }

    /// Override the image build program.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Attach an optional build timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Choose whether the fetched tree is kept when the build fails.
    ///
    /// The default keeps it, so a failed build leaves forensic evidence a
    /// human operator can inspect (or a later call with a fresh target name
    /// can rebuild from scratch).
    #[must_use]
    pub const fn with_retention(mut self, retain_on_failure: bool) -> Self {
        self.retain_on_failure = retain_on_failure;
        self
    }

    /// Fetch `source_url` and build it as `image_name`.
    ///
    /// # Errors
    ///
    /// Returns the fetch stage's [`FetchError`](crate::error::FetchError)
    /// verbatim (wrapped as `BuildError::Fetch`) when the clone fails; the
    /// build step is not attempted in that case. Returns
    /// `BuildError::CommandFailed` with the build tool's captured error text
    /// when the build itself fails.
    pub async fn build_from_source(
        &self,
        request: &BuildRequest,
    ) -> Result<BuildOutcome, BuildError> {
        let fetched = self
            .fetcher
            .fetch(&request.source_url, &request.target_name)
            .await?;

        let spec = CommandSpec::new(
            self.program.clone(),
            vec![
                String::from("build"),
                String::from("-t"),
                request.image_name.clone(),
                fetched.path.to_string(),
            ],
        )
        .with_timeout(self.timeout);

        match self.runner.run(spec).await {
            Ok(output) => {
                tracing::info!(image = %request.image_name, context = %fetched.path, "image built");
                Ok(BuildOutcome {
                    message: format!("Image {} built successfully", request.image_name),
                    output,
                })
            }
            Err(error) => {
                if !self.retain_on_failure && fs::remove_dir_all(&fetched.path).is_err() {
                    tracing::warn!(path = %fetched.path, "failed to remove build context");
                }
                Err(BuildError::CommandFailed {
                    message: error.to_string(),
                })
            }
        }
    }
}
