// ABOUTME: Bollard-based container runtime implementation.
// ABOUTME: Resolves digests, pulls, lists, and removes images, and manages secrets.

use crate::runtime::traits::{
    DigestResolver, ImageError, ImageOps, LocalImage, LocalImages, RegistryAuth, ResolveError,
    RuntimeInfo, RuntimeInfoError, RuntimeMetadata, SecretConfig, SecretError, SecretInfo,
    SecretOps,
};
use crate::runtime::types::RuntimeType;
use crate::types::{Digest, ImageId, ImageRef, SecretId, TagName};
use async_trait::async_trait;
use base64::Engine;
use bollard::Docker;
use bollard::auth::DockerCredentials;
use bollard::models::SecretSpec;
use bollard::query_parameters::{CreateImageOptions, ListImagesOptions, RemoveImageOptions};
use futures::StreamExt;
use hyper_util::rt::TokioIo;
use tokio::net::UnixStream;

// =============================================================================
// Error Mapping Helpers
// =============================================================================

fn map_image_pull_error(e: bollard::errors::Error, image_name: &str) -> ImageError {
    match &e {
        bollard::errors::Error::DockerResponseServerError { status_code, .. }
            if *status_code == 401 || *status_code == 403 =>
        {
            ImageError::AuthenticationFailed(image_name.to_string())
        }
        _ => ImageError::PullFailed(format!("{}: {}", image_name, e)),
    }
}

fn map_image_remove_error(e: bollard::errors::Error, image_name: &str) -> ImageError {
    match &e {
        bollard::errors::Error::DockerResponseServerError { status_code, .. }
            if *status_code == 404 =>
        {
            ImageError::NotFound(image_name.to_string())
        }
        bollard::errors::Error::DockerResponseServerError { status_code, .. }
            if *status_code == 409 =>
        {
            ImageError::InUse(image_name.to_string())
        }
        _ => ImageError::Runtime(format!("failed to remove {}: {}", image_name, e)),
    }
}

fn map_resolve_error(e: bollard::errors::Error, name: &str) -> ResolveError {
    match &e {
        bollard::errors::Error::DockerResponseServerError { status_code, .. }
            if *status_code == 404 =>
        {
            ResolveError::NotFound(name.to_string())
        }
        bollard::errors::Error::DockerResponseServerError { status_code, .. }
            if *status_code == 401 || *status_code == 403 =>
        {
            ResolveError::AuthenticationFailed(name.to_string())
        }
        _ => ResolveError::Runtime(format!("failed to resolve {}: {}", name, e)),
    }
}

fn map_secret_error(e: bollard::errors::Error) -> SecretError {
    match &e {
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 404 => SecretError::NotFound(message.clone()),
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 409 => SecretError::AlreadyExists(message.clone()),
        _ => SecretError::Runtime(e.to_string()),
    }
}

fn map_daemon_error(e: bollard::errors::Error) -> RuntimeInfoError {
    match e {
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } => RuntimeInfoError::Runtime(format!("{status_code}: {message}")),
        other => RuntimeInfoError::ConnectionFailed(other.to_string()),
    }
}

fn credentials(auth: Option<&RegistryAuth>) -> Option<DockerCredentials> {
    auth.map(|a| DockerCredentials {
        username: Some(a.username.clone()),
        password: Some(a.password.clone()),
        serveraddress: a.server.clone(),
        ..Default::default()
    })
}

/// Base64-encoded JSON credentials, as the libpod API expects them.
fn registry_auth_header(auth: &RegistryAuth) -> String {
    let json = serde_json::json!({
        "username": auth.username,
        "password": auth.password,
        "serveraddress": auth.server.as_deref().unwrap_or_default(),
    });
    base64::engine::general_purpose::URL_SAFE.encode(json.to_string())
}

// =============================================================================
// BollardRuntime
// =============================================================================

/// Container runtime implementation using bollard.
///
/// Supports both Docker and Podman via Docker-compatible API.
/// For Podman, pulls go through the native libpod API.
pub struct BollardRuntime {
    client: Docker,
    runtime_type: RuntimeType,
    socket_path: Option<String>,
}

impl BollardRuntime {
    /// Wrap a client; the socket path enables the libpod pull on Podman.
    pub fn new_with_socket(client: Docker, runtime_type: RuntimeType, socket_path: String) -> Self {
        Self {
            client,
            runtime_type,
            socket_path: Some(socket_path),
        }
    }

    /// Connect to a container runtime using detected runtime info.
    pub fn connect(
        info: &super::types::RuntimeInfo,
        timeout_secs: u64,
    ) -> Result<Self, RuntimeInfoError> {
        let client = Docker::connect_with_unix(
            &info.socket_path,
            timeout_secs,
            bollard::API_DEFAULT_VERSION,
        )
        .map_err(|e| RuntimeInfoError::ConnectionFailed(e.to_string()))?;
        Ok(Self::new_with_socket(
            client,
            info.runtime_type,
            info.socket_path.clone(),
        ))
    }

    /// Pull image using Podman's native libpod API with tlsVerify=false.
    /// This allows pulling from insecure (HTTP) registries.
    async fn pull_image_libpod(
        &self,
        image_name: &str,
        auth: Option<&RegistryAuth>,
    ) -> Result<(), ImageError> {
        let socket_path = self.socket_path.as_ref().ok_or_else(|| {
            ImageError::PullFailed("socket path not available for libpod API".to_string())
        })?;

        let stream = UnixStream::connect(socket_path)
            .await
            .map_err(|e| ImageError::PullFailed(format!("failed to connect to socket: {}", e)))?;

        let io = TokioIo::new(stream);

        let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
            .await
            .map_err(|e| ImageError::PullFailed(format!("HTTP handshake failed: {}", e)))?;

        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::warn!("libpod connection error: {}", e);
            }
        });

        let uri = format!(
            "/v4.0.0/libpod/images/pull?reference={}&tlsVerify=false",
            urlencoding::encode(image_name)
        );

        let mut req = hyper::Request::builder()
            .method("POST")
            .uri(&uri)
            .header("Host", "localhost");
        if let Some(auth) = auth {
            req = req.header("X-Registry-Auth", registry_auth_header(auth));
        }

        let req = req
            .body(http_body_util::Empty::<bytes::Bytes>::new())
            .map_err(|e| ImageError::PullFailed(format!("failed to build request: {}", e)))?;

        let resp = sender
            .send_request(req)
            .await
            .map_err(|e| ImageError::PullFailed(format!("request failed: {}", e)))?;

        use http_body_util::BodyExt;

        let status = resp.status();
        let body = resp
            .into_body()
            .collect()
            .await
            .map_err(|e| ImageError::PullFailed(format!("failed to read response: {}", e)))?;
        let body_bytes = body.to_bytes();
        let body_text = String::from_utf8_lossy(&body_bytes);

        if !status.is_success() {
            return Err(ImageError::PullFailed(format!(
                "{}: libpod API error: {}",
                image_name, body_text
            )));
        }

        // Progress stream reports failures inline
        if body_text.contains("\"error\"") && !body_text.contains("\"error\":null") {
            return Err(ImageError::PullFailed(format!(
                "{}: {}",
                image_name, body_text
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl RuntimeInfo for BollardRuntime {
    async fn info(&self) -> Result<RuntimeMetadata, RuntimeInfoError> {
        let info = self
            .client
            .info()
            .await
            .map_err(map_daemon_error)?;

        let name = match self.runtime_type {
            RuntimeType::Docker => "Docker".to_string(),
            RuntimeType::Podman => "Podman".to_string(),
        };

        Ok(RuntimeMetadata {
            name,
            version: info.server_version.unwrap_or_default(),
            api_version: bollard::API_DEFAULT_VERSION.to_string(),
            os: info.operating_system.unwrap_or_default(),
            arch: info.architecture.unwrap_or_default(),
        })
    }

    async fn ping(&self) -> Result<(), RuntimeInfoError> {
        self.client
            .ping()
            .await
            .map_err(map_daemon_error)?;
        Ok(())
    }
}

#[async_trait]
impl DigestResolver for BollardRuntime {
    async fn resolve_digest(
        &self,
        name: &TagName,
        auth: Option<&RegistryAuth>,
    ) -> Result<Digest, ResolveError> {
        // The daemon asks the registry through its distribution endpoint,
        // honoring its own mirror and insecure-registry settings.
        let inspect = self
            .client
            .inspect_registry_image(name.as_str(), credentials(auth))
            .await
            .map_err(|e| map_resolve_error(e, name.as_str()))?;

        let raw = inspect.descriptor.digest.ok_or_else(|| ResolveError::InvalidDigest {
            name: name.to_string(),
            digest: String::new(),
        })?;

        let digest = Digest::parse(&raw).map_err(|_| ResolveError::InvalidDigest {
            name: name.to_string(),
            digest: raw.clone(),
        })?;

        tracing::debug!(name = %name, digest = %digest, "resolved registry digest");
        Ok(digest)
    }
}

#[async_trait]
impl ImageOps for BollardRuntime {
    async fn pull_image(
        &self,
        reference: &ImageRef,
        auth: Option<&RegistryAuth>,
    ) -> Result<(), ImageError> {
        let image_name = reference.to_string();
        tracing::debug!(reference = %image_name, "pulling image");

        if self.runtime_type == RuntimeType::Podman && self.socket_path.is_some() {
            return self.pull_image_libpod(&image_name, auth).await;
        }

        let opts = CreateImageOptions {
            from_image: Some(image_name.clone()),
            ..Default::default()
        };

        // Pull returns a stream of progress updates - consume it
        let mut stream = self.client.create_image(Some(opts), None, credentials(auth));
        while let Some(result) = stream.next().await {
            result.map_err(|e| map_image_pull_error(e, &image_name))?;
        }

        Ok(())
    }

    async fn list_images(&self) -> Result<LocalImages, ImageError> {
        let opts = ListImagesOptions {
            all: false,
            ..Default::default()
        };

        let summaries = self
            .client
            .list_images(Some(opts))
            .await
            .map_err(|e| ImageError::Runtime(format!("failed to list images: {}", e)))?;

        Ok(LocalImages::new(summaries.into_iter().map(|s| LocalImage {
            id: ImageId::new(s.id),
            repo_tags: s.repo_tags,
            repo_digests: s.repo_digests,
        })))
    }

    async fn remove_image(&self, reference: &ImageRef, force: bool) -> Result<(), ImageError> {
        let image_name = reference.to_string();

        let opts = RemoveImageOptions {
            force,
            ..Default::default()
        };

        self.client
            .remove_image(&image_name, Some(opts), None)
            .await
            .map_err(|e| map_image_remove_error(e, &image_name))?;

        Ok(())
    }
}

#[async_trait]
impl SecretOps for BollardRuntime {
    async fn create_secret(&self, config: &SecretConfig) -> Result<SecretId, SecretError> {
        let spec = SecretSpec {
            name: Some(config.name.clone()),
            labels: Some(config.labels.clone()),
            // The engine API carries secret data base64-encoded
            data: Some(base64::engine::general_purpose::STANDARD.encode(&config.data)),
            ..Default::default()
        };

        let created = self
            .client
            .create_secret(spec)
            .await
            .map_err(map_secret_error)?;

        Ok(SecretId::new(created.id))
    }

    async fn inspect_secret(&self, id: &SecretId) -> Result<SecretInfo, SecretError> {
        let secret = self
            .client
            .inspect_secret(id.as_str())
            .await
            .map_err(map_secret_error)?;

        let spec = secret.spec.unwrap_or_default();
        Ok(SecretInfo {
            id: SecretId::new(secret.id.unwrap_or_else(|| id.to_string())),
            name: spec.name.unwrap_or_default(),
            labels: spec.labels.unwrap_or_default(),
        })
    }

    async fn remove_secret(&self, id: &SecretId) -> Result<(), SecretError> {
        self.client
            .delete_secret(id.as_str())
            .await
            .map_err(map_secret_error)
    }
}
