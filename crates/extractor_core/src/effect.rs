use crate::{RequestId, TaskId};

/// Side effects requested by `update`; executed by the app against the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// POST the URL to the extraction endpoint.
    SubmitJob { request_id: RequestId, url: String },
    /// Start the repeating status timer, replacing any previous one.
    StartPolling { task_id: TaskId },
    /// Cancel the status timer.
    StopPolling,
    /// Issue one status request.
    FetchStatus { task_id: TaskId },
    /// Fetch the finished file into the download directory.
    Download { task_id: TaskId },
}
