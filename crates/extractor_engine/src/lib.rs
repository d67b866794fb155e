//! Extractor engine: HTTP client, poll timer and effect execution.
mod api;
mod engine;
mod filename;
mod persist;
mod types;

pub use api::{ApiClient, ClientSettings, ReqwestApiClient};
pub use engine::EngineHandle;
pub use filename::{download_filename, filename_from_disposition};
pub use persist::{ensure_output_dir, AtomicFileWriter, PendingFile, PersistError};
pub use types::{
    ApiError, EngineEvent, ExtractAccepted, ExtractRequest, FailureKind, JobStatus, RequestId,
    StatusResponse, TaskId,
};
