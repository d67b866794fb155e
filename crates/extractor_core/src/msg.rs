use std::path::PathBuf;

use crate::{RequestId, StatusSnapshot, TaskId};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the URL input.
    InputChanged(String),
    /// User pressed Enter or the submit control.
    SubmitClicked,
    /// Backend accepted the submission.
    SubmitSucceeded {
        request_id: RequestId,
        task_id: TaskId,
    },
    /// Backend rejected the submission or it never arrived.
    SubmitFailed {
        request_id: RequestId,
        failure: RequestFailure,
    },
    /// Status timer fired for a job.
    PollTick { task_id: TaskId },
    /// Status response for a job.
    StatusReceived {
        task_id: TaskId,
        snapshot: StatusSnapshot,
    },
    /// Status request failed.
    StatusFailed {
        task_id: TaskId,
        failure: RequestFailure,
    },
    /// User asked for the finished file.
    DownloadClicked,
    /// Engine finished (or gave up on) a download.
    DownloadFinished {
        task_id: TaskId,
        outcome: DownloadOutcome,
    },
    /// User cleared the form.
    ResetClicked,
}

/// Why a request to the backend did not produce a usable response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestFailure {
    /// The server answered with a non-success status.
    Rejected { status: u16, message: Option<String> },
    /// The request never completed (connect error, timeout, undecodable body).
    Transport { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Saved(PathBuf),
    Failed(String),
}
