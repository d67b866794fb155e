use std::path::{Path, PathBuf};
use std::time::Duration;

use engine_logging::{engine_debug, engine_info};
use futures_util::StreamExt;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use url::Url;

use crate::filename::download_filename;
use crate::persist::{AtomicFileWriter, PersistError};
use crate::types::ErrorBody;
use crate::{ApiError, ExtractAccepted, ExtractRequest, FailureKind, StatusResponse, TaskId};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Root of the backend, e.g. `http://127.0.0.1:5001`.
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Applies to submit and status calls.
    pub request_timeout: Duration,
    /// Applies to a whole download, body included.
    pub download_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5001".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            download_timeout: Duration::from_secs(600),
        }
    }
}

/// The three backend calls the controller needs.
#[async_trait::async_trait]
pub trait ApiClient: Send + Sync {
    async fn submit(&self, url: &str) -> Result<TaskId, ApiError>;

    async fn status(&self, task_id: &str) -> Result<StatusResponse, ApiError>;

    /// Stream the finished file into `dir`, returning where it landed.
    async fn download(&self, task_id: &str, dir: &Path) -> Result<PathBuf, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApiClient {
    settings: ClientSettings,
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestApiClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidBaseUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidBaseUrl,
                format!("{base_url} cannot be a base"),
            ));
        }
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            settings,
            base_url,
            client,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[async_trait::async_trait]
impl ApiClient for ReqwestApiClient {
    async fn submit(&self, url: &str) -> Result<TaskId, ApiError> {
        let endpoint = self.endpoint(&["api", "extract"]);
        let body = serde_json::to_vec(&ExtractRequest { url })
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;

        let response = self
            .client
            .post(endpoint)
            .timeout(self.settings.request_timeout)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let accepted: ExtractAccepted = read_json(response).await?;
        engine_info!("Extraction accepted task_id={}", accepted.task_id);
        Ok(accepted.task_id)
    }

    async fn status(&self, task_id: &str) -> Result<StatusResponse, ApiError> {
        let endpoint = self.endpoint(&["api", "status", task_id]);
        let response = self
            .client
            .get(endpoint)
            .timeout(self.settings.request_timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status: StatusResponse = read_json(response).await?;
        engine_debug!(
            "Status task_id={} status={:?} progress={:?}",
            task_id,
            status.status,
            status.progress
        );
        Ok(status)
    }

    async fn download(&self, task_id: &str, dir: &Path) -> Result<PathBuf, ApiError> {
        let endpoint = self.endpoint(&["api", "download", task_id]);
        let response = self
            .client
            .get(endpoint)
            .timeout(self.settings.download_timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ensure_success(response).await?;

        let disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let filename = download_filename(disposition.as_deref(), task_id);

        let writer = AtomicFileWriter::new(dir.to_path_buf());
        let mut pending = writer.begin(&filename).map_err(map_persist_error)?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            pending.write_chunk(&chunk).map_err(map_persist_error)?;
        }
        let bytes = pending.bytes_written();
        let path = pending.commit().map_err(map_persist_error)?;
        engine_info!("Downloaded task_id={} bytes={} path={:?}", task_id, bytes, path);
        Ok(path)
    }
}

/// Turns a non-2xx response into `HttpStatus`, keeping the server's `error` text.
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.bytes().await.unwrap_or_default();
    let server_message = serde_json::from_slice::<ErrorBody>(&body)
        .ok()
        .and_then(|body| body.error);
    Err(ApiError {
        kind: FailureKind::HttpStatus(status.as_u16()),
        message: status.to_string(),
        server_message,
    })
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let response = ensure_success(response).await?;
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&body).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}

fn map_persist_error(err: PersistError) -> ApiError {
    ApiError::new(FailureKind::Io, err.to_string())
}
