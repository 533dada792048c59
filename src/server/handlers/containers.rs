//! Container endpoints: run, lifecycle, list, logs.

use axum::Json;
use axum::extract::{Path, State};

use crate::server::error::ApiError;
use crate::server::payloads::{
    ContainerListResponse, ContainerPayload, ContainerStartedResponse, LogsResponse,
    MessageResponse, RunContainerPayload,
};
use crate::server::AppState;

/// `POST /api/run` — create and start a container from an image.
pub async fn run(
    State(state): State<AppState>,
    Json(payload): Json<RunContainerPayload>,
) -> Result<Json<ContainerStartedResponse>, ApiError> {
    let container_id = state
        .engine()
        .run_container(&payload.image_name, &payload.container_name)
        .await?;
    Ok(Json(ContainerStartedResponse {
        message: format!("Container {} started", payload.container_name),
        container_id,
    }))
}

/// `POST /api/start` — start an existing container.
pub async fn start(
    State(state): State<AppState>,
    Json(payload): Json<ContainerPayload>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.engine().start_container(&payload.container_name).await?;
    Ok(Json(MessageResponse {
        message: format!("Container {} started.", payload.container_name),
    }))
}

/// `POST /api/stop` — stop a running container.
pub async fn stop(
    State(state): State<AppState>,
    Json(payload): Json<ContainerPayload>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.engine().stop_container(&payload.container_name).await?;
    Ok(Json(MessageResponse {
        message: format!("Container {} stopped.", payload.container_name),
    }))
}

/// `POST /api/restart` — restart a container.
pub async fn restart(
    State(state): State<AppState>,
    Json(payload): Json<ContainerPayload>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .engine()
        .restart_container(&payload.container_name)
        .await?;
    Ok(Json(MessageResponse {
        message: format!("Container {} restarted.", payload.container_name),
    }))
}

/// `GET /api/containers` — list all containers, stopped ones included.
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ContainerListResponse>, ApiError> {
    let containers = state.engine().list_containers(true).await?;
    Ok(Json(ContainerListResponse {
        message: String::from("Containers listed"),
        containers,
    }))
}

/// `DELETE /api/containers` — force-remove a container.
pub async fn remove(
    State(state): State<AppState>,
    Json(payload): Json<ContainerPayload>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .engine()
        .remove_container(&payload.container_name)
        .await?;
    Ok(Json(MessageResponse {
        message: format!("Container {} removed.", payload.container_name),
    }))
}

/// `GET /api/logs/{container_name}` — fetch a container's buffered logs.
pub async fn logs(
    State(state): State<AppState>,
    Path(container_name): Path<String>,
) -> Result<Json<LogsResponse>, ApiError> {
    let collected = state.engine().container_logs(&container_name).await?;
    Ok(Json(LogsResponse {
        message: format!("Logs for {container_name}"),
        logs: collected,
    }))
}

/// `GET /api/ps` — list running containers only.
pub async fn ps(State(state): State<AppState>) -> Result<Json<ContainerListResponse>, ApiError> {
    let containers = state.engine().list_containers(false).await?;
    Ok(Json(ContainerListResponse {
        message: String::from("Running containers"),
        containers,
    }))
}
