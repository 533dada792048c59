//! Integration tests for the build-from-remote-source endpoint.
//!
//! The fetch and build commands are replayed by a scripted runner, so these
//! tests exercise the full HTTP-to-orchestrator path — including the
//! directory side effects under the workspace root — without `git` or
//! `docker` installed.

mod support;

use std::sync::Arc;

use axum::http::StatusCode;
use rstest::rstest;
use serde_json::json;

use support::{FakeEngine, context_with, request_json};

fn build_body() -> serde_json::Value {
    json!({
        "source_url": "https://example.test/repo.git",
        "image_name": "myimage:latest",
        "target_name": "repo1"
    })
}

#[rstest]
#[tokio::test]
async fn successful_build_reports_message_and_output() {
    let ctx = context_with(Arc::new(FakeEngine::ok()));
    ctx.runner.push_ok("");
    ctx.runner.push_ok("Step 1/3 : FROM alpine\nSuccessfully built myimage:latest");

    let (status, body) =
        request_json(ctx.app.clone(), "POST", "/api/build", Some(build_body())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Image myimage:latest built successfully");
    assert!(
        body["output"]
            .as_str()
            .is_some_and(|output| output.contains("myimage:latest")),
        "output must mention the image name: {body}"
    );
    assert!(ctx.workspace.path().join("repo1").is_dir());
    assert_eq!(ctx.runner.invocations_of("git"), 1);
    assert_eq!(ctx.runner.invocations_of("docker"), 1);
}

#[rstest]
#[tokio::test]
async fn repeated_build_fails_with_directory_already_exists() {
    let ctx = context_with(Arc::new(FakeEngine::ok()));
    ctx.runner.push_ok("");
    ctx.runner.push_ok("Successfully built myimage:latest");

    let (first_status, _) =
        request_json(ctx.app.clone(), "POST", "/api/build", Some(build_body())).await;
    assert_eq!(first_status, StatusCode::OK);

    let (second_status, body) =
        request_json(ctx.app.clone(), "POST", "/api/build", Some(build_body())).await;

    assert_eq!(second_status, StatusCode::INTERNAL_SERVER_ERROR);
    let expected = format!(
        "Directory {} already exists.",
        ctx.workspace_root().join("repo1")
    );
    assert_eq!(body["error"], expected.as_str());
    // The losing request must not have run any external command.
    assert_eq!(ctx.runner.invocations_of("git"), 1);
    assert_eq!(ctx.runner.invocations_of("docker"), 1);
}

#[rstest]
#[tokio::test]
async fn fetch_failure_never_invokes_the_build_command() {
    let ctx = context_with(Arc::new(FakeEngine::ok()));
    ctx.runner
        .push_exit_failure("git", "fatal: could not read from remote repository");

    let (status, body) =
        request_json(ctx.app.clone(), "POST", "/api/build", Some(build_body())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|error| error.starts_with("failed to fetch repository: ")
                && error.contains("could not read from remote repository")),
        "unexpected error body: {body}"
    );
    assert_eq!(ctx.runner.invocations_of("docker"), 0);
}

#[rstest]
#[tokio::test]
async fn build_failure_surfaces_tool_text_and_leaves_the_tree() {
    let ctx = context_with(Arc::new(FakeEngine::ok()));
    ctx.runner.push_ok("");
    ctx.runner
        .push_exit_failure("docker", "Dockerfile: no such file or directory");

    let (status, body) =
        request_json(ctx.app.clone(), "POST", "/api/build", Some(build_body())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|error| error.starts_with("image build failed: ")
                && error.contains("Dockerfile: no such file or directory")),
        "unexpected error body: {body}"
    );
    // The fetched tree stays behind for inspection.
    assert!(ctx.workspace.path().join("repo1").is_dir());
}

#[rstest]
#[tokio::test]
async fn hostile_target_name_is_rejected_without_touching_the_workspace() {
    let ctx = context_with(Arc::new(FakeEngine::ok()));

    let (status, body) = request_json(
        ctx.app.clone(),
        "POST",
        "/api/build",
        Some(json!({
            "source_url": "https://example.test/repo.git",
            "image_name": "myimage:latest",
            "target_name": "../escape"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|error| error.starts_with("invalid target name")),
        "unexpected error body: {body}"
    );
    assert_eq!(ctx.runner.invocations_of("git"), 0);
}
