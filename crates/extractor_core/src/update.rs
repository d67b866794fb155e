use engine_logging::{engine_debug, engine_info, engine_warn};

use crate::text::{ERROR_EXTRACTION_FAILED, ERROR_NETWORK, ERROR_STATUS_CHECK, ERROR_SUBMIT_REJECTED};
use crate::{
    validate_url, AppState, DownloadOutcome, Effect, JobStatus, Msg, RequestFailure,
    StatusSnapshot, TaskId,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            if state.phase().accepts_input() {
                state.set_input(text);
            }
            Vec::new()
        }
        Msg::SubmitClicked => submit(&mut state),
        Msg::SubmitSucceeded {
            request_id,
            task_id,
        } => {
            if !state.take_pending_request(request_id) {
                engine_debug!("Dropping stale submit response request_id={request_id}");
                return (state, Vec::new());
            }
            engine_info!("Job {task_id} accepted, polling");
            state.begin_polling(task_id.clone());
            vec![Effect::StartPolling { task_id }]
        }
        Msg::SubmitFailed {
            request_id,
            failure,
        } => {
            if !state.take_pending_request(request_id) {
                engine_debug!("Dropping stale submit failure request_id={request_id}");
                return (state, Vec::new());
            }
            let message = match failure {
                RequestFailure::Rejected {
                    message: Some(message),
                    ..
                } => message,
                RequestFailure::Rejected { status, .. } => {
                    engine_warn!("Submit rejected with status {status}");
                    ERROR_SUBMIT_REJECTED.to_string()
                }
                RequestFailure::Transport { message } => {
                    engine_warn!("Submit failed: {message}");
                    ERROR_NETWORK.to_string()
                }
            };
            state.show_error(message);
            Vec::new()
        }
        Msg::PollTick { task_id } => {
            if !state.is_current_task(&task_id) || !state.is_polling() {
                return (state, Vec::new());
            }
            if state.poll_in_flight() {
                engine_debug!("Skipping tick for {task_id}: status request still in flight");
                return (state, Vec::new());
            }
            state.set_poll_in_flight(true);
            vec![Effect::FetchStatus { task_id }]
        }
        Msg::StatusReceived { task_id, snapshot } => apply_status(&mut state, task_id, snapshot),
        Msg::StatusFailed { task_id, failure } => {
            if !state.is_current_task(&task_id) {
                return (state, Vec::new());
            }
            state.set_poll_in_flight(false);
            match failure {
                RequestFailure::Transport { message } => {
                    // Next tick retries.
                    engine_warn!("Status check for {task_id} failed: {message}");
                    Vec::new()
                }
                RequestFailure::Rejected { status, .. } => {
                    if !state.stop_polling() {
                        return (state, Vec::new());
                    }
                    engine_warn!("Status check for {task_id} rejected with status {status}");
                    state.show_error(ERROR_STATUS_CHECK);
                    vec![Effect::StopPolling]
                }
            }
        }
        Msg::DownloadClicked => match state.task_id() {
            Some(task_id) => vec![Effect::Download {
                task_id: task_id.to_string(),
            }],
            None => Vec::new(),
        },
        Msg::DownloadFinished { task_id, outcome } => {
            if state.is_current_task(&task_id) {
                let notice = match outcome {
                    DownloadOutcome::Saved(path) => format!("Saved to {}", path.display()),
                    DownloadOutcome::Failed(message) => format!("Download failed: {message}"),
                };
                state.set_download_notice(notice);
            }
            Vec::new()
        }
        Msg::ResetClicked => {
            if state.reset() {
                vec![Effect::StopPolling]
            } else {
                Vec::new()
            }
        }
    };

    (state, effects)
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    if !state.phase().accepts_input() {
        return Vec::new();
    }
    let url = match validate_url(state.input()).map(str::to_string) {
        Ok(url) => url,
        Err(err) => {
            state.show_error(err.to_string());
            return Vec::new();
        }
    };
    let request_id = state.begin_submission();
    engine_info!("Submitting {url} request_id={request_id}");
    vec![Effect::SubmitJob { request_id, url }]
}

fn apply_status(state: &mut AppState, task_id: TaskId, snapshot: StatusSnapshot) -> Vec<Effect> {
    if !state.is_current_task(&task_id) {
        engine_debug!("Dropping status for stale job {task_id}");
        return Vec::new();
    }
    state.set_poll_in_flight(false);
    if !state.is_polling() {
        return Vec::new();
    }

    state.apply_progress(&snapshot);
    match snapshot.status {
        JobStatus::Completed => {
            state.stop_polling();
            engine_info!("Job {task_id} completed");
            state.show_result(snapshot.title);
            vec![Effect::StopPolling]
        }
        JobStatus::Failed => {
            state.stop_polling();
            let message = snapshot
                .error
                .unwrap_or_else(|| ERROR_EXTRACTION_FAILED.to_string());
            engine_warn!("Job {task_id} failed: {message}");
            state.show_error(message);
            vec![Effect::StopPolling]
        }
        JobStatus::Pending | JobStatus::Processing | JobStatus::Unknown => Vec::new(),
    }
}
