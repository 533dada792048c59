//! Image endpoints: pull, push, list, remove.

use axum::Json;
use axum::extract::State;

use crate::server::error::ApiError;
use crate::server::payloads::{
    DetailResponse, ImageListResponse, ImagePayload, ImageRemovedResponse,
};
use crate::server::AppState;

/// `POST /api/pull` — pull an image from a registry.
pub async fn pull(
    State(state): State<AppState>,
    Json(payload): Json<ImagePayload>,
) -> Result<Json<DetailResponse>, ApiError> {
    let details = state.engine().pull_image(&payload.image_name).await?;
    Ok(Json(DetailResponse {
        message: String::from("Image pulled successfully"),
        details,
    }))
}

/// `POST /api/push` — push an image to a registry.
pub async fn push(
    State(state): State<AppState>,
    Json(payload): Json<ImagePayload>,
) -> Result<Json<DetailResponse>, ApiError> {
    let details = state.engine().push_image(&payload.image_name).await?;
    Ok(Json(DetailResponse {
        message: String::from("Image pushed successfully"),
        details,
    }))
}

/// `GET /api/images` — list image repository tags.
pub async fn list(State(state): State<AppState>) -> Result<Json<ImageListResponse>, ApiError> {
    let images = state.engine().list_images().await?;
    Ok(Json(ImageListResponse {
        message: String::from("Images listed"),
        images,
    }))
}

/// `DELETE /api/images` — force-remove an image.
pub async fn remove(
    State(state): State<AppState>,
    Json(payload): Json<ImagePayload>,
) -> Result<Json<ImageRemovedResponse>, ApiError> {
    let details = state.engine().remove_image(&payload.image_name).await?;
    Ok(Json(ImageRemovedResponse {
        message: format!("Image {} removed", payload.image_name),
        details,
    }))
}
