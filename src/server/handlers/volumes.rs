//! Volume endpoints: create, list, remove.

use axum::Json;
use axum::extract::State;

use crate::server::error::ApiError;
use crate::server::payloads::{
    MessageResponse, VolumeCreatedResponse, VolumeListResponse, VolumePayload,
};
use crate::server::AppState;

/// `POST /api/volumes` — create a named volume.
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<VolumePayload>,
) -> Result<Json<VolumeCreatedResponse>, ApiError> {
    let volume = state.engine().create_volume(&payload.volume_name).await?;
    Ok(Json(VolumeCreatedResponse {
        message: format!("Volume {} created", payload.volume_name),
        volume,
    }))
}

/// `GET /api/volumes` — list volume names.
pub async fn list(State(state): State<AppState>) -> Result<Json<VolumeListResponse>, ApiError> {
    let volumes = state.engine().list_volumes().await?;
    Ok(Json(VolumeListResponse {
        message: String::from("Volumes listed"),
        volumes,
    }))
}

/// `DELETE /api/volumes` — force-remove a volume.
pub async fn remove(
    State(state): State<AppState>,
    Json(payload): Json<VolumePayload>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.engine().remove_volume(&payload.volume_name).await?;
    Ok(Json(MessageResponse {
        message: format!("Volume {} deleted.", payload.volume_name),
    }))
}
