//! Shared test doubles and request helpers for the API integration tests.
//!
//! `FakeEngine` stands in for the container daemon and `ScriptedRunner`
//! replays canned results for external commands, so every route can be
//! exercised in-process without a daemon, `git`, or `docker` installed.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use camino::Utf8PathBuf;
use http_body_util::BodyExt;
use tower::ServiceExt;

use dockhand::build::SourceBuilder;
use dockhand::engine::EngineOps;
use dockhand::error::{EngineError, ProcessError};
use dockhand::fetch::RepositoryFetcher;
use dockhand::process::{CommandRunner, CommandSpec, RunCommandFuture};
use dockhand::server::{AppState, router};

/// A canned engine: every operation succeeds with fixed data, or fails
/// uniformly when constructed with [`FakeEngine::failing`].
pub struct FakeEngine {
    failure: Option<String>,
}

impl FakeEngine {
    /// An engine whose operations all succeed.
    pub fn ok() -> Self {
        Self { failure: None }
    }

    /// An engine whose operations all fail with the given message.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(String::from(message)),
        }
    }

    fn check(&self) -> Result<(), EngineError> {
        self.failure.as_ref().map_or(Ok(()), |message| {
            Err(EngineError::Api {
                message: message.clone(),
            })
        })
    }
}

#[async_trait]
impl EngineOps for FakeEngine {
    async fn pull_image(&self, image: &str) -> Result<String, EngineError> {
        self.check()?;
        Ok(format!("Downloaded newer image for {image}"))
    }

    async fn push_image(&self, image: &str) -> Result<String, EngineError> {
        self.check()?;
        Ok(format!("{image}: digest: sha256:feedface size: 1234"))
    }

    async fn list_images(&self) -> Result<Vec<String>, EngineError> {
        self.check()?;
        Ok(vec![
            String::from("nginx:latest"),
            String::from("redis:7"),
        ])
    }

    async fn remove_image(&self, image: &str) -> Result<Vec<String>, EngineError> {
        self.check()?;
        Ok(vec![format!("untagged: {image}")])
    }

    async fn run_container(&self, _image: &str, _name: &str) -> Result<String, EngineError> {
        self.check()?;
        Ok(String::from("abc123"))
    }

    async fn start_container(&self, _name: &str) -> Result<(), EngineError> {
        self.check()
    }

    async fn stop_container(&self, _name: &str) -> Result<(), EngineError> {
        self.check()
    }

    async fn restart_container(&self, _name: &str) -> Result<(), EngineError> {
        self.check()
    }

    async fn list_containers(&self, all: bool) -> Result<Vec<String>, EngineError> {
        self.check()?;
        if all {
            Ok(vec![String::from("web"), String::from("migrations")])
        } else {
            Ok(vec![String::from("web")])
        }
    }

    async fn remove_container(&self, _name: &str) -> Result<(), EngineError> {
        self.check()
    }

    async fn container_logs(&self, name: &str) -> Result<String, EngineError> {
        self.check()?;
        Ok(format!("hello from {name}\n"))
    }

    async fn create_volume(&self, name: &str) -> Result<String, EngineError> {
        self.check()?;
        Ok(String::from(name))
    }

    async fn list_volumes(&self) -> Result<Vec<String>, EngineError> {
        self.check()?;
        Ok(vec![String::from("data")])
    }

    async fn remove_volume(&self, _name: &str) -> Result<(), EngineError> {
        self.check()
    }
}

/// A runner that replays scripted results and records every invocation.
#[derive(Default)]
pub struct ScriptedRunner {
    results: Mutex<VecDeque<Result<String, ProcessError>>>,
    invocations: Mutex<Vec<CommandSpec>>,
}

impl ScriptedRunner {
    /// Queue a successful result with the given stdout.
    pub fn push_ok(&self, stdout: &str) {
        self.results
            .lock()
            .expect("results lock")
            .push_back(Ok(String::from(stdout)));
    }

    /// Queue a non-zero-exit failure with the given stderr.
    pub fn push_exit_failure(&self, program: &str, stderr: &str) {
        self.results
            .lock()
            .expect("results lock")
            .push_back(Err(ProcessError::ExitFailure {
                program: String::from(program),
                code: 1,
                stderr: String::from(stderr),
            }));
    }

    /// Number of recorded invocations of the given program.
    pub fn invocations_of(&self, program: &str) -> usize {
        self.invocations
            .lock()
            .expect("invocations lock")
            .iter()
            .filter(|spec| spec.program == program)
            .count()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, spec: CommandSpec) -> RunCommandFuture<'_> {
        self.invocations
            .lock()
            .expect("invocations lock")
            .push(spec);
        let result = self
            .results
            .lock()
            .expect("results lock")
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()));
        Box::pin(async move { result })
    }
}

/// An assembled router plus the fakes behind it.
pub struct TestContext {
    /// Workspace root backing the fetcher; dropped (and removed) with the context.
    pub workspace: tempfile::TempDir,
    /// The scripted command runner behind the build orchestrator.
    pub runner: Arc<ScriptedRunner>,
    /// The service router under test.
    pub app: Router,
}

impl TestContext {
    /// The workspace root as a UTF-8 path.
    pub fn workspace_root(&self) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(self.workspace.path().to_path_buf())
            .expect("utf-8 temp path")
    }
}

/// Build a router over the given engine fake and a fresh scripted runner.
pub fn context_with(engine: Arc<dyn EngineOps>) -> TestContext {
    let workspace = tempfile::tempdir().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(workspace.path().to_path_buf())
        .expect("utf-8 temp path");
    let runner = Arc::new(ScriptedRunner::default());
    let fetcher = RepositoryFetcher::new(runner.clone(), root);
    let builder = SourceBuilder::new(fetcher, runner.clone());
    let app = router(AppState::new(engine, Arc::new(builder)));
    TestContext {
        workspace,
        runner,
        app,
    }
}

/// Issue a request with an optional JSON body and parse the JSON response.
pub async fn request_json(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let request = match body {
        Some(value) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::to_vec(&value).expect("serialise body"),
            ))
            .expect("build request"),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .expect("build request"),
    };

    let response = app.oneshot(request).await.expect("route request");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, value)
}
