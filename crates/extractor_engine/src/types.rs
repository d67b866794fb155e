use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub type TaskId = String;
pub type RequestId = u64;

/// Body of `POST /api/extract`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractRequest<'a> {
    pub url: &'a str,
}

/// Success body of `POST /api/extract`; extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExtractAccepted {
    pub task_id: TaskId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

/// Body of `GET /api/status/{task_id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatusResponse {
    pub status: JobStatus,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Error body the backend attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
}

#[derive(Debug)]
pub enum EngineEvent {
    Submitted {
        request_id: RequestId,
        result: Result<TaskId, ApiError>,
    },
    PollTick {
        task_id: TaskId,
    },
    StatusFetched {
        task_id: TaskId,
        result: Result<StatusResponse, ApiError>,
    },
    DownloadFinished {
        task_id: TaskId,
        result: Result<PathBuf, ApiError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
    /// `error` field from the response body, when the server sent one.
    pub server_message: Option<String>,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            server_message: None,
        }
    }

    /// True when the request never produced a server answer worth showing.
    pub fn is_transport(&self) -> bool {
        !matches!(self.kind, FailureKind::HttpStatus(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidBaseUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidBaseUrl => write!(f, "invalid base url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "undecodable response"),
            FailureKind::Io => write!(f, "io error"),
        }
    }
}
