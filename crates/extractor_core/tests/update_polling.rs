use std::path::PathBuf;
use std::sync::Once;

use extractor_core::{
    update, AppState, DownloadOutcome, Effect, JobStatus, Msg, Panel, Phase, RequestFailure,
    StatusSnapshot, ERROR_EXTRACTION_FAILED, ERROR_STATUS_CHECK, STATUS_CONVERTING,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

/// Drives a valid submission through to an accepted job `task_id`.
fn polling_state(task_id: &str) -> AppState {
    let (state, _) = update(
        AppState::new(),
        Msg::InputChanged("https://youtu.be/abc123".to_string()),
    );
    let (state, _) = update(state, Msg::SubmitClicked);
    let (state, _) = update(
        state,
        Msg::SubmitSucceeded {
            request_id: 1,
            task_id: task_id.to_string(),
        },
    );
    state
}

fn tick(state: AppState, task_id: &str) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::PollTick {
            task_id: task_id.to_string(),
        },
    )
}

fn status(state: AppState, task_id: &str, snapshot: StatusSnapshot) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::StatusReceived {
            task_id: task_id.to_string(),
            snapshot,
        },
    )
}

fn snapshot(status: JobStatus, progress: Option<f64>) -> StatusSnapshot {
    StatusSnapshot {
        progress,
        ..StatusSnapshot::new(status)
    }
}

#[test]
fn tick_requests_status_for_current_job() {
    init_logging();
    let (_state, effects) = tick(polling_state("t1"), "t1");
    assert_eq!(
        effects,
        vec![Effect::FetchStatus {
            task_id: "t1".to_string()
        }]
    );
}

#[test]
fn tick_is_skipped_while_a_status_request_is_in_flight() {
    init_logging();
    let (state, _) = tick(polling_state("t1"), "t1");
    let (state, effects) = tick(state, "t1");
    assert!(effects.is_empty());

    // Once the response lands the next tick goes out again.
    let (state, _) = status(state, "t1", snapshot(JobStatus::Pending, Some(0.0)));
    let (_state, effects) = tick(state, "t1");
    assert_eq!(effects.len(), 1);
}

#[test]
fn tick_without_job_is_noop() {
    init_logging();
    let (_state, effects) = tick(AppState::new(), "t1");
    assert!(effects.is_empty());
}

#[test]
fn processing_updates_progress_and_status_message() {
    init_logging();
    let (state, _) = tick(polling_state("t1"), "t1");
    let (mut state, effects) = status(state, "t1", snapshot(JobStatus::Processing, Some(42.7)));
    let view = state.view();

    assert!(effects.is_empty());
    assert_eq!(view.panel, Panel::Progress);
    assert_eq!(view.progress_percent, 43);
    assert_eq!(view.progress_text, "43%");
    assert_eq!(view.status_message, STATUS_CONVERTING);
    assert!(state.consume_dirty());
}

#[test]
fn completed_status_shows_result_and_stops_polling() {
    init_logging();
    let (state, _) = tick(polling_state("t1"), "t1");
    let (state, effects) = status(
        state,
        "t1",
        StatusSnapshot {
            title: Some("X".to_string()),
            ..snapshot(JobStatus::Completed, Some(100.0))
        },
    );
    let view = state.view();

    assert_eq!(effects, vec![Effect::StopPolling]);
    assert_eq!(view.panel, Panel::Result);
    assert!(view.title_text.as_deref().unwrap().contains('X'));
    assert!(view.input_enabled);
    assert!(view.can_download);
    assert!(!state.is_polling());
}

#[test]
fn failed_status_shows_server_error() {
    init_logging();
    let (state, _) = tick(polling_state("t1"), "t1");
    let (state, effects) = status(
        state,
        "t1",
        StatusSnapshot {
            error: Some("Y".to_string()),
            ..snapshot(JobStatus::Failed, None)
        },
    );
    let view = state.view();

    assert_eq!(effects, vec![Effect::StopPolling]);
    assert_eq!(view.panel, Panel::Error);
    assert!(view.error_text.as_deref().unwrap().contains('Y'));
    assert!(view.input_enabled);
}

#[test]
fn failed_status_without_message_uses_fallback() {
    init_logging();
    let (state, _) = tick(polling_state("t1"), "t1");
    let (state, _) = status(state, "t1", snapshot(JobStatus::Failed, None));
    assert_eq!(state.view().error_text.as_deref(), Some(ERROR_EXTRACTION_FAILED));
}

#[test]
fn transport_failure_on_tick_keeps_polling_silently() {
    init_logging();
    let (state, _) = tick(polling_state("t1"), "t1");
    let (state, effects) = update(
        state,
        Msg::StatusFailed {
            task_id: "t1".to_string(),
            failure: RequestFailure::Transport {
                message: "timed out".to_string(),
            },
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::InProgress);
    assert_eq!(state.view().error_text, None);
    assert!(state.is_polling());

    let (_state, effects) = tick(state, "t1");
    assert_eq!(effects.len(), 1);
}

#[test]
fn rejected_status_check_stops_polling_with_error() {
    init_logging();
    let (state, _) = tick(polling_state("t1"), "t1");
    let (state, effects) = update(
        state,
        Msg::StatusFailed {
            task_id: "t1".to_string(),
            failure: RequestFailure::Rejected {
                status: 404,
                message: Some("Cannot find the task".to_string()),
            },
        },
    );

    assert_eq!(effects, vec![Effect::StopPolling]);
    assert_eq!(state.view().error_text.as_deref(), Some(ERROR_STATUS_CHECK));
    assert!(state.view().input_enabled);
}

#[test]
fn status_for_another_job_is_discarded() {
    init_logging();
    let (state, _) = tick(polling_state("t1"), "t1");
    let before = state.view();
    let (state, effects) = status(state, "t0", snapshot(JobStatus::Completed, Some(100.0)));

    assert!(effects.is_empty());
    assert_eq!(state.view(), before);
}

#[test]
fn reset_while_polling_stops_timer_and_ignores_later_traffic() {
    init_logging();
    let (state, _) = tick(polling_state("t1"), "t1");
    let (state, effects) = update(state, Msg::ResetClicked);
    let view = state.view();

    assert_eq!(effects, vec![Effect::StopPolling]);
    assert_eq!(view.panel, Panel::None);
    assert_eq!(view.input_text, "");
    assert!(view.input_enabled);
    assert_eq!(view.task_id, None);

    let (state, effects) = tick(state, "t1");
    assert!(effects.is_empty());
    let (state, effects) = status(state, "t1", snapshot(JobStatus::Completed, Some(100.0)));
    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Idle);
}

#[test]
fn reset_when_idle_emits_nothing() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::ResetClicked);
    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Idle);
}

#[test]
fn download_requires_a_job_reference() {
    init_logging();
    let (_state, effects) = update(AppState::new(), Msg::DownloadClicked);
    assert!(effects.is_empty());

    let (state, _) = tick(polling_state("t1"), "t1");
    let (state, _) = status(state, "t1", snapshot(JobStatus::Completed, Some(100.0)));
    let (state, effects) = update(state, Msg::DownloadClicked);
    assert_eq!(
        effects,
        vec![Effect::Download {
            task_id: "t1".to_string()
        }]
    );

    let (state, effects) = update(
        state,
        Msg::DownloadFinished {
            task_id: "t1".to_string(),
            outcome: DownloadOutcome::Saved(PathBuf::from("downloads/Song.mp3")),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::ResultShown);
    let notice = state.view().download_notice.unwrap();
    assert!(notice.contains("Song.mp3"), "{notice}");
}

#[test]
fn end_to_end_processing_then_completed() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::InputChanged("https://youtu.be/abc123".to_string()),
    );
    let (state, effects) = update(state, Msg::SubmitClicked);
    assert_eq!(
        effects,
        vec![Effect::SubmitJob {
            request_id: 1,
            url: "https://youtu.be/abc123".to_string(),
        }]
    );

    let (state, effects) = update(
        state,
        Msg::SubmitSucceeded {
            request_id: 1,
            task_id: "t1".to_string(),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::StartPolling {
            task_id: "t1".to_string()
        }]
    );

    let mut status_calls = 0;
    let (state, effects) = tick(state, "t1");
    status_calls += effects.len();
    let (state, effects) = status(state, "t1", snapshot(JobStatus::Processing, Some(10.0)));
    assert!(effects.is_empty());
    assert_eq!(state.view().progress_text, "10%");

    let (state, effects) = tick(state, "t1");
    status_calls += effects.len();
    let (state, effects) = status(
        state,
        "t1",
        StatusSnapshot {
            title: Some("Song".to_string()),
            ..snapshot(JobStatus::Completed, None)
        },
    );
    assert_eq!(effects, vec![Effect::StopPolling]);

    // A tick already queued behind the stop is ignored.
    let (state, effects) = tick(state, "t1");
    status_calls += effects.len();

    let view = state.view();
    assert_eq!(status_calls, 2);
    assert_eq!(view.panel, Panel::Result);
    assert!(view.title_text.unwrap().contains("Song"));
    assert!(view.input_enabled);
}
