//! The build-from-remote-source endpoint.

use axum::Json;
use axum::extract::State;

use crate::build::BuildRequest;
use crate::server::error::ApiError;
use crate::server::payloads::{BuildFromSourcePayload, BuildResponse};
use crate::server::AppState;

/// `POST /api/build` — clone a remote repository and build an image from it.
///
/// The response carries the captured build output on success. On failure the
/// error body identifies whether the fetch or the build stage failed, with
/// the underlying tool's error text.
pub async fn build_from_source(
    State(state): State<AppState>,
    Json(payload): Json<BuildFromSourcePayload>,
) -> Result<Json<BuildResponse>, ApiError> {
    tracing::info!(
        source_url = %payload.source_url,
        image = %payload.image_name,
        target = %payload.target_name,
        "build from source requested"
    );

    let request = BuildRequest {
        source_url: payload.source_url,
        image_name: payload.image_name,
        target_name: payload.target_name,
    };
    let outcome = state.builder().build_from_source(&request).await?;

    Ok(Json(BuildResponse {
        message: outcome.message,
        output: outcome.output,
    }))
}
