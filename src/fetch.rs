//! Materialising remote repositories into the workspace.
//!
//! The fetcher owns the only piece of persistent local state in the service:
//! the directory tree under the workspace root that a clone populates. The
//! destination directory is claimed with an atomic create-fail-if-exists
//! primitive before any external command runs, so two concurrent requests
//! for the same target name cannot both proceed; the loser fails with
//! [`FetchError::DestinationExists`](crate::error::FetchError).
//!
//! A fetched tree is never removed on success. On clone failure the default
//! is to retain the directory for inspection; removal is an explicit
//! configuration choice (`workspace.retain_on_failure = false`).

use std::fs;
use std::io::ErrorKind;
use std::sync::Arc;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::FetchError;
use crate::process::{CommandRunner, CommandSpec};

/// Default version-control client program.
const DEFAULT_FETCH_PROGRAM: &str = "git";

/// A successfully materialised repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedRepository {
    /// The destination path the clone populated.
    pub path: Utf8PathBuf,

    /// Captured informational output from the version-control client.
    pub output: String,
}

/// Clones remote repositories into fresh directories under a fixed root.
pub struct RepositoryFetcher {
    runner: Arc<dyn CommandRunner>,
    program: String,
    destination_root: Utf8PathBuf,
    timeout: Option<Duration>,
    retain_on_failure: bool,
}

impl RepositoryFetcher {
    /// Create a fetcher rooted at `destination_root`.
    ///
    /// Defaults: `git` as the version-control client, no timeout, and
    /// retention of the destination directory on clone failure.
    #[must_use]
    pub fn new(runner: Arc<dyn CommandRunner>, destination_root: Utf8PathBuf) -> Self {
        Self {
            runner,
            program: String::from(DEFAULT_FETCH_PROGRAM),
            destination_root,
            timeout: None,
            retain_on_failure: true,
        }
    }

    /// Override the version-control client program.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Attach an optional clone timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Choose whether a failed clone's directory is kept for inspection.
    #[must_use]
    pub const fn with_retention(mut self, retain_on_failure: bool) -> Self {
        self.retain_on_failure = retain_on_failure;
        self
    }

    /// Return the configured destination root.
    #[must_use]
    pub fn destination_root(&self) -> &Utf8Path {
        &self.destination_root
    }

    /// Materialise `source_url` into `destination_root / target_name`.
    ///
    /// The root directory is created if absent. The destination itself must
    /// not exist; existence is a caller error, never merged or overwritten.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidTargetName` when the target name is empty
    /// or not a single path component, `FetchError::DestinationExists` when
    /// the destination directory is already present,
    /// `FetchError::WorkspaceSetup` when a directory cannot be created, and
    /// `FetchError::CloneFailed` when the clone command fails.
    pub async fn fetch(
        &self,
        source_url: &str,
        target_name: &str,
    ) -> Result<FetchedRepository, FetchError> {
        validate_target_name(target_name)?;

        fs::create_dir_all(&self.destination_root).map_err(|error| {
            FetchError::WorkspaceSetup {
                path: self.destination_root.clone(),
                message: error.to_string(),
            }
        })?;

        let destination = self.destination_root.join(target_name);

        // create_dir is the atomic claim: it fails if the path exists, so
        // there is no window between an existence check and the creation.
        match fs::create_dir(&destination) {
            Ok(()) => {}
            Err(error) if error.kind() == ErrorKind::AlreadyExists => {
                return Err(FetchError::DestinationExists { path: destination });
            }
            Err(error) => {
                return Err(FetchError::WorkspaceSetup {
                    path: destination,
                    message: error.to_string(),
                });
            }
        }

        let spec = CommandSpec::new(
            self.program.clone(),
            vec![
                String::from("clone"),
                String::from(source_url),
                destination.to_string(),
            ],
        )
        .with_timeout(self.timeout);

        match self.runner.run(spec).await {
            Ok(output) => {
                tracing::info!(path = %destination, "repository fetched");
                Ok(FetchedRepository {
                    path: destination,
                    output,
                })
            }
            Err(error) => {
                if !self.retain_on_failure && fs::remove_dir_all(&destination).is_err() {
                    tracing::warn!(path = %destination, "failed to remove clone directory");
                }
                Err(FetchError::CloneFailed {
                    message: error.to_string(),
                })
            }
        }
    }
}

/// Reject target names that are empty or would escape the workspace root.
fn validate_target_name(name: &str) -> Result<(), FetchError> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || trimmed.contains(['/', '\\'])
    {
        return Err(FetchError::InvalidTargetName {
            name: String::from(name),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessRunner;
    use rstest::{fixture, rstest};
    use std::path::Path;
    use std::process::Command as StdCommand;

    fn run_git(repo_dir: &Path, args: &[&str]) {
        let output = StdCommand::new("git")
            .args(args)
            .current_dir(repo_dir)
            .output()
            .expect("git should run");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    /// Fixture providing a local git repository to clone from.
    #[fixture]
    fn source_repo() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        run_git(dir.path(), &["init"]);
        run_git(dir.path(), &["config", "user.name", "test-user"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        std::fs::write(dir.path().join("README.md"), "hello\n").expect("write file");
        run_git(dir.path(), &["add", "."]);
        run_git(dir.path(), &["commit", "-m", "initial"]);
        dir
    }

    /// Fixture providing an empty workspace root.
    #[fixture]
    fn workspace() -> tempfile::TempDir {
        tempfile::tempdir().expect("tempdir")
    }

    fn fetcher_for(workspace: &tempfile::TempDir) -> RepositoryFetcher {
        let root = Utf8PathBuf::from_path_buf(workspace.path().to_path_buf())
            .expect("utf-8 temp path");
        RepositoryFetcher::new(Arc::new(ProcessRunner), root)
    }

    #[rstest]
    #[tokio::test]
    async fn fetch_clones_into_fresh_directory(
        source_repo: tempfile::TempDir,
        workspace: tempfile::TempDir,
    ) {
        let fetcher = fetcher_for(&workspace);
        let source = source_repo.path().display().to_string();

        let fetched = fetcher
            .fetch(&source, "repo1")
            .await
            .expect("fetch should succeed");

        assert_eq!(fetched.path, fetcher.destination_root().join("repo1"));
        assert!(fetched.path.join(".git").is_dir());
        assert!(fetched.path.join("README.md").is_file());
    }

    #[rstest]
    #[tokio::test]
    async fn second_fetch_with_same_target_reports_destination_exists(
        source_repo: tempfile::TempDir,
        workspace: tempfile::TempDir,
    ) {
        let fetcher = fetcher_for(&workspace);
        let source = source_repo.path().display().to_string();

        fetcher
            .fetch(&source, "repo1")
            .await
            .expect("first fetch should succeed");
        let error = fetcher
            .fetch(&source, "repo1")
            .await
            .expect_err("second fetch should fail");

        assert!(matches!(error, FetchError::DestinationExists { .. }));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case(".")]
    #[case("..")]
    #[case("../escape")]
    #[case("a/b")]
    #[case("a\\b")]
    #[tokio::test]
    async fn hostile_target_names_are_rejected_before_any_mutation(
        workspace: tempfile::TempDir,
        #[case] target: &str,
    ) {
        let fetcher = fetcher_for(&workspace);

        let error = fetcher
            .fetch("https://example.test/repo.git", target)
            .await
            .expect_err("fetch should reject the target name");

        assert!(matches!(error, FetchError::InvalidTargetName { .. }));
        let entries = std::fs::read_dir(workspace.path())
            .expect("read workspace")
            .count();
        assert_eq!(entries, 0, "workspace must stay untouched");
    }

    #[rstest]
    #[tokio::test]
    async fn failed_clone_retains_directory_by_default(workspace: tempfile::TempDir) {
        let fetcher = fetcher_for(&workspace);

        let error = fetcher
            .fetch("/nonexistent/source/repo", "repo1")
            .await
            .expect_err("clone should fail");

        assert!(matches!(error, FetchError::CloneFailed { .. }));
        assert!(workspace.path().join("repo1").is_dir());
    }

    #[rstest]
    #[tokio::test]
    async fn failed_clone_removes_directory_when_retention_disabled(
        workspace: tempfile::TempDir,
    ) {
        let fetcher = fetcher_for(&workspace).with_retention(false);

        let error = fetcher
            .fetch("/nonexistent/source/repo", "repo1")
            .await
            .expect_err("clone should fail");

        assert!(matches!(error, FetchError::CloneFailed { .. }));
        assert!(!workspace.path().join("repo1").exists());
    }

    #[rstest]
    #[tokio::test]
    async fn concurrent_fetches_for_the_same_target_have_one_winner(
        source_repo: tempfile::TempDir,
        workspace: tempfile::TempDir,
    ) {
        let fetcher = fetcher_for(&workspace);
        let source = source_repo.path().display().to_string();

        let (first, second) = tokio::join!(
            fetcher.fetch(&source, "repo1"),
            fetcher.fetch(&source, "repo1")
        );

        let winners = usize::from(first.is_ok()) + usize::from(second.is_ok());
        assert_eq!(winners, 1, "exactly one fetch may claim the directory");
        let loser = first.err().or_else(|| second.err());
        assert!(matches!(
            loser,
            Some(FetchError::DestinationExists { .. })
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn clone_failure_carries_tool_error_text(workspace: tempfile::TempDir) {
        let fetcher = fetcher_for(&workspace);

        let error = fetcher
            .fetch("/nonexistent/source/repo", "repo1")
            .await
            .expect_err("clone should fail");

        let message = error.to_string();
        assert!(
            message.starts_with("failed to fetch repository: "),
            "unexpected message: {message}"
        );
        assert!(
            message.len() > "failed to fetch repository: ".len(),
            "error text must not be empty"
        );
    }
}
