//! JSON request and response shapes for the API routes.
//!
//! Request payloads mirror the fields the engine operations need and nothing
//! more; every field is required where present. Response shapes carry a
//! human-readable `message` plus the operation-specific data field.

use serde::{Deserialize, Serialize};

/// Request payload naming an image.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImagePayload {
    /// Image name, optionally with a tag.
    pub image_name: String,
}

/// Request payload for running a new container.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RunContainerPayload {
    /// Image to create the container from.
    pub image_name: String,

    /// Name to assign to the new container.
    pub container_name: String,
}

/// Request payload naming an existing container.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContainerPayload {
    /// Container name or id.
    pub container_name: String,
}

/// Request payload naming a volume.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VolumePayload {
    /// Volume name.
    pub volume_name: String,
}

/// Request payload for building an image from a remote repository.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BuildFromSourcePayload {
    /// Remote repository to clone.
    pub source_url: String,

    /// Image name (and optional tag) to build.
    pub image_name: String,

    /// Directory name used as both clone target and build context.
    pub target_name: String,
}

/// Response carrying only a message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MessageResponse {
    /// Human-readable outcome description.
    pub message: String,
}

/// Response carrying a message and free-form detail text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DetailResponse {
    /// Human-readable outcome description.
    pub message: String,

    /// Detail text reported by the engine.
    pub details: String,
}

/// Response listing image references.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImageListResponse {
    /// Human-readable outcome description.
    pub message: String,

    /// Image repository tags.
    pub images: Vec<String>,
}

/// Response for a removed image.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImageRemovedResponse {
    /// Human-readable outcome description.
    pub message: String,

    /// Deleted and untagged references reported by the engine.
    pub details: Vec<String>,
}

/// Response listing container names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContainerListResponse {
    /// Human-readable outcome description.
    pub message: String,

    /// Container names.
    pub containers: Vec<String>,
}

/// Response for a freshly started container.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContainerStartedResponse {
    /// Human-readable outcome description.
    pub message: String,

    /// Id of the created container.
    pub container_id: String,
}

/// Response carrying a container's buffered logs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LogsResponse {
    /// Human-readable outcome description.
    pub message: String,

    /// Buffered stdout and stderr text.
    pub logs: String,
}

/// Response for a created volume.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VolumeCreatedResponse {
    /// Human-readable outcome description.
    pub message: String,

    /// Name of the created volume.
    pub volume: String,
}

/// Response listing volume names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VolumeListResponse {
    /// Human-readable outcome description.
    pub message: String,

    /// Volume names.
    pub volumes: Vec<String>,
}

/// Response for a successful build-from-source request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BuildResponse {
    /// Human-readable outcome description.
    pub message: String,

    /// Captured build command output.
    pub output: String,
}

/// Error response body for any failed request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorResponse {
    /// The failure description, identifying the stage that failed.
    pub error: String,
}
