//! Pass-through operations against the container engine.
//!
//! Every operation here is a single request/response round trip against the
//! daemon with no retry and no backoff; failure handling is uniformly "catch
//! the engine's error, surface its message" as an
//! [`EngineError`](crate::error::EngineError). Streaming endpoints (pull,
//! push, logs) are drained to completion and returned as buffered text.
//!
//! The [`EngineOps`] trait is the seam the HTTP surface depends on, so
//! handlers can be exercised against a fake engine in tests.

use async_trait::async_trait;
use bollard::Docker;
use bollard::auth::DockerCredentials;
use bollard::models::{ContainerCreateBody, ContainerSummary, VolumeCreateRequest};
use bollard::query_parameters::{
    CreateContainerOptionsBuilder, CreateImageOptionsBuilder, ListContainersOptionsBuilder,
    ListImagesOptions, ListVolumesOptions, LogsOptionsBuilder, PushImageOptionsBuilder,
    RemoveContainerOptionsBuilder, RemoveImageOptionsBuilder, RemoveVolumeOptionsBuilder,
    RestartContainerOptions, StartContainerOptions, StopContainerOptions,
};
use futures_util::StreamExt;

use crate::error::EngineError;

/// Behaviour the HTTP surface requires from the container engine.
///
/// Implemented by [`EngineClient`] for a live daemon; tests substitute a
/// fake so handlers can be exercised without an engine process.
#[async_trait]
pub trait EngineOps: Send + Sync {
    /// Pull an image from a registry; returns the engine's final status line.
    async fn pull_image(&self, image: &str) -> Result<String, EngineError>;

    /// Push an image to a registry; returns the engine's final status line.
    async fn push_image(&self, image: &str) -> Result<String, EngineError>;

    /// List image repository tags known to the engine.
    async fn list_images(&self) -> Result<Vec<String>, EngineError>;

    /// Force-remove an image; returns the deleted/untagged references.
    async fn remove_image(&self, image: &str) -> Result<Vec<String>, EngineError>;

    /// Create and start a container from an image; returns the container id.
    async fn run_container(&self, image: &str, name: &str) -> Result<String, EngineError>;

    /// Start an existing container.
    async fn start_container(&self, name: &str) -> Result<(), EngineError>;

    /// Stop a running container.
    async fn stop_container(&self, name: &str) -> Result<(), EngineError>;

    /// Restart a container.
    async fn restart_container(&self, name: &str) -> Result<(), EngineError>;

    /// List container names; `all` includes stopped containers.
    async fn list_containers(&self, all: bool) -> Result<Vec<String>, EngineError>;

    /// Force-remove a container.
    async fn remove_container(&self, name: &str) -> Result<(), EngineError>;

    /// Fetch a container's buffered stdout and stderr logs.
    async fn container_logs(&self, name: &str) -> Result<String, EngineError>;

    /// Create a named volume; returns the volume name.
    async fn create_volume(&self, name: &str) -> Result<String, EngineError>;

    /// List volume names.
    async fn list_volumes(&self) -> Result<Vec<String>, EngineError>;

    /// Force-remove a volume.
    async fn remove_volume(&self, name: &str) -> Result<(), EngineError>;
}

/// Production [`EngineOps`] implementation over a Bollard connection.
///
/// The connection and optional registry credentials are injected at
/// construction; the client itself holds no other state.
pub struct EngineClient {
    docker: Docker,
    credentials: Option<DockerCredentials>,
}

impl EngineClient {
    /// Wrap an established engine connection.
    #[must_use]
    pub const fn new(docker: Docker, credentials: Option<DockerCredentials>) -> Self {
        Self {
            docker,
            credentials,
        }
    }
}

#[async_trait]
impl EngineOps for EngineClient {
    async fn pull_image(&self, image: &str) -> Result<String, EngineError> {
        let options = CreateImageOptionsBuilder::new().from_image(image).build();
        let mut stream = self
            .docker
            .create_image(Some(options), None, self.credentials.clone());

        let mut last_status = String::new();
        while let Some(item) = stream.next().await {
            let info = item?;
            if let Some(message) = info.error_detail.and_then(|detail| detail.message) {
                return Err(EngineError::Api { message });
            }
            if let Some(status) = info.status {
                last_status = status;
            }
        }
        Ok(last_status)
    }

    async fn push_image(&self, image: &str) -> Result<String, EngineError> {
        let (name, tag) = split_image_tag(image);
        let options = tag.map(|value| PushImageOptionsBuilder::new().tag(value).build());
        let mut stream = self
            .docker
            .push_image(name, options, self.credentials.clone());

        let mut last_status = String::new();
        while let Some(item) = stream.next().await {
            let info = item?;
            // Push reports registry-side failures inline in the stream.
            if let Some(message) = info.error_detail.and_then(|detail| detail.message) {
                return Err(EngineError::Api { message });
            }
            if let Some(status) = info.status {
                last_status = status;
            }
        }
        Ok(last_status)
    }

    async fn list_images(&self) -> Result<Vec<String>, EngineError> {
        let images = self.docker.list_images(None::<ListImagesOptions>).await?;
        Ok(images
            .into_iter()
            .flat_map(|image| image.repo_tags)
            .collect())
    }

    async fn remove_image(&self, image: &str) -> Result<Vec<String>, EngineError> {
        let options = RemoveImageOptionsBuilder::new().force(true).build();
        let deleted = self
            .docker
            .remove_image(image, Some(options), None)
            .await?;
        Ok(deleted
            .into_iter()
            .filter_map(|item| item.deleted.or(item.untagged))
            .collect())
    }

    async fn run_container(&self, image: &str, name: &str) -> Result<String, EngineError> {
        let options = CreateContainerOptionsBuilder::new().name(name).build();
        let body = ContainerCreateBody {
            image: Some(String::from(image)),
            ..ContainerCreateBody::default()
        };
        let created = self.docker.create_container(Some(options), body).await?;
        self.docker
            .start_container(&created.id, None::<StartContainerOptions>)
            .await?;
        Ok(created.id)
    }

    async fn start_container(&self, name: &str) -> Result<(), EngineError> {
        self.docker
            .start_container(name, None::<StartContainerOptions>)
            .await?;
        Ok(())
    }

    async fn stop_container(&self, name: &str) -> Result<(), EngineError> {
        self.docker
            .stop_container(name, None::<StopContainerOptions>)
            .await?;
        Ok(())
    }

    async fn restart_container(&self, name: &str) -> Result<(), EngineError> {
        self.docker
            .restart_container(name, None::<RestartContainerOptions>)
            .await?;
        Ok(())
    }

    async fn list_containers(&self, all: bool) -> Result<Vec<String>, EngineError> {
        let options = ListContainersOptionsBuilder::new().all(all).build();
        let containers = self.docker.list_containers(Some(options)).await?;
        Ok(containers
            .into_iter()
            .filter_map(container_display_name)
            .collect())
    }

    async fn remove_container(&self, name: &str) -> Result<(), EngineError> {
        let options = RemoveContainerOptionsBuilder::new().force(true).build();
        self.docker.remove_container(name, Some(options)).await?;
        Ok(())
    }

    async fn container_logs(&self, name: &str) -> Result<String, EngineError> {
        let options = LogsOptionsBuilder::new().stdout(true).stderr(true).build();
        let mut stream = self.docker.logs(name, Some(options));

        let mut collected = String::new();
        while let Some(chunk) = stream.next().await {
            let log = chunk?;
            collected.push_str(&String::from_utf8_lossy(&log.into_bytes()));
        }
        Ok(collected)
    }

    async fn create_volume(&self, name: &str) -> Result<String, EngineError> {
        let volume = self
            .docker
            .create_volume(VolumeCreateRequest {
                name: Some(String::from(name)),
                ..VolumeCreateRequest::default()
            })
            .await?;
        Ok(volume.name)
    }

    async fn list_volumes(&self) -> Result<Vec<String>, EngineError> {
        let response = self.docker.list_volumes(None::<ListVolumesOptions>).await?;
        Ok(response
            .volumes
            .unwrap_or_default()
            .into_iter()
            .map(|volume| volume.name)
            .collect())
    }

    async fn remove_volume(&self, name: &str) -> Result<(), EngineError> {
        let options = RemoveVolumeOptionsBuilder::new().force(true).build();
        self.docker.remove_volume(name, Some(options)).await?;
        Ok(())
    }
}

/// Split an image reference into name and optional tag.
///
/// The tag separator is the last `:` that is not part of a registry
/// host:port prefix (i.e. not followed by a `/`).
fn split_image_tag(image: &str) -> (&str, Option<&str>) {
    match image.rsplit_once(':') {
        Some((name, tag)) if !tag.contains('/') => (name, Some(tag)),
        _ => (image, None),
    }
}

/// Pick a display name for a container summary, falling back to its id.
///
/// The engine reports names with a leading slash (`/web`); that prefix is
/// stripped for presentation.
fn container_display_name(summary: ContainerSummary) -> Option<String> {
    let ContainerSummary { names, id, .. } = summary;
    names
        .and_then(|list| list.into_iter().next())
        .map(|name| name.trim_start_matches('/').to_owned())
        .or(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("nginx", "nginx", None)]
    #[case("nginx:latest", "nginx", Some("latest"))]
    #[case("registry.example.test:5000/app", "registry.example.test:5000/app", None)]
    #[case(
        "registry.example.test:5000/app:v2",
        "registry.example.test:5000/app",
        Some("v2")
    )]
    fn split_image_tag_handles_registry_ports(
        #[case] image: &str,
        #[case] expected_name: &str,
        #[case] expected_tag: Option<&str>,
    ) {
        assert_eq!(split_image_tag(image), (expected_name, expected_tag));
    }

    #[rstest]
    fn container_display_name_strips_leading_slash() {
        let summary = ContainerSummary {
            names: Some(vec![String::from("/web")]),
            id: Some(String::from("abc123")),
            ..ContainerSummary::default()
        };
        assert_eq!(container_display_name(summary), Some(String::from("web")));
    }

    #[rstest]
    fn container_display_name_falls_back_to_id() {
        let summary = ContainerSummary {
            names: Some(Vec::new()),
            id: Some(String::from("abc123")),
            ..ContainerSummary::default()
        };
        assert_eq!(
            container_display_name(summary),
            Some(String::from("abc123"))
        );
    }
}
