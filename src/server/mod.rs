//! The axum HTTP surface.
//!
//! Routing and request/response mapping only: every handler deserialises a
//! JSON payload, makes exactly one call into the engine facade or the build
//! orchestrator, and serialises the outcome. No handler holds state between
//! requests.
//!
//! Failures surface as a JSON `{ "error": ... }` body with a 500-class
//! status; the error text always identifies the failing stage and carries
//! the underlying tool or engine message.

mod error;
mod handlers;
mod payloads;

pub use error::ApiError;
pub use payloads::{
    BuildFromSourcePayload, BuildResponse, ContainerListResponse, ContainerPayload,
    ContainerStartedResponse, DetailResponse, ErrorResponse, ImageListResponse,
    ImagePayload, ImageRemovedResponse, LogsResponse, MessageResponse,
    RunContainerPayload, VolumeCreatedResponse, VolumeListResponse, VolumePayload,
};

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::{Json, Router};
use bollard::Docker;
use bollard::auth::DockerCredentials;

use crate::build::SourceBuilder;
use crate::config::{AppConfig, RegistryConfig};
use crate::engine::{EngineClient, EngineOps};
use crate::fetch::RepositoryFetcher;
use crate::process::{CommandRunner, ProcessRunner};

/// Shared request-handling state: the engine facade and the build
/// orchestrator, both injected so tests can substitute fakes.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<dyn EngineOps>,
    builder: Arc<SourceBuilder>,
}

impl AppState {
    /// Assemble state from explicit dependencies.
    #[must_use]
    pub fn new(engine: Arc<dyn EngineOps>, builder: Arc<SourceBuilder>) -> Self {
        Self { engine, builder }
    }

    /// Assemble production state from configuration and an established
    /// engine connection.
    #[must_use]
    pub fn from_config(config: &AppConfig, docker: Docker) -> Self {
        let runner: Arc<dyn CommandRunner> = Arc::new(ProcessRunner);
        let fetcher = RepositoryFetcher::new(runner.clone(), config.workspace.root.clone())
            .with_program(config.fetch.program.clone())
            .with_timeout(config.fetch.timeout_secs.map(Duration::from_secs))
            .with_retention(config.workspace.retain_on_failure);
        let builder = SourceBuilder::new(fetcher, runner)
            .with_program(config.build.program.clone())
            .with_timeout(config.build.timeout_secs.map(Duration::from_secs))
            .with_retention(config.workspace.retain_on_failure);
        let credentials = registry_credentials(&config.registry);

        Self::new(
            Arc::new(EngineClient::new(docker, credentials)),
            Arc::new(builder),
        )
    }

    /// The engine facade.
    #[must_use]
    pub fn engine(&self) -> &dyn EngineOps {
        self.engine.as_ref()
    }

    /// The build orchestrator.
    #[must_use]
    pub fn builder(&self) -> &SourceBuilder {
        self.builder.as_ref()
    }
}

/// Convert registry configuration into per-call engine credentials.
fn registry_credentials(registry: &RegistryConfig) -> Option<DockerCredentials> {
    registry.is_configured().then(|| DockerCredentials {
        username: registry.username.clone(),
        password: registry.password.clone(),
        serveraddress: registry.address.clone(),
        ..DockerCredentials::default()
    })
}

/// Build the service router with all API routes attached.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/home", get(home))
        .route("/api/build", post(handlers::build::build_from_source))
        .route("/api/pull", post(handlers::images::pull))
        .route("/api/push", post(handlers::images::push))
        .route(
            "/api/images",
            get(handlers::images::list).delete(handlers::images::remove),
        )
        .route("/api/run", post(handlers::containers::run))
        .route("/api/start", post(handlers::containers::start))
        .route("/api/stop", post(handlers::containers::stop))
        .route("/api/restart", post(handlers::containers::restart))
        .route(
            "/api/containers",
            get(handlers::containers::list).delete(handlers::containers::remove),
        )
        .route("/api/logs/{container_name}", get(handlers::containers::logs))
        .route("/api/ps", get(handlers::containers::ps))
        .route(
            "/api/volumes",
            post(handlers::volumes::create)
                .get(handlers::volumes::list)
                .delete(handlers::volumes::remove),
        )
        .with_state(state)
}

/// Landing route confirming the API is up.
async fn home() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: String::from("API Home"),
    })
}
