use std::sync::Once;

use extractor_core::{
    update, AppState, Effect, Msg, Panel, Phase, RequestFailure, ERROR_NETWORK,
    ERROR_SUBMIT_REJECTED, STATUS_DOWNLOADING, SUBMIT_LABEL_BUSY, SUBMIT_LABEL_IDLE,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn submit_url(state: AppState, input: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::InputChanged(input.to_string()));
    update(state, Msg::SubmitClicked)
}

#[test]
fn invalid_urls_short_circuit_without_effects() {
    init_logging();
    for input in [
        "https://vimeo.com/123",
        "youtube",
        "https://youtube.com/",
        "http://example.com/watch?v=1",
    ] {
        let (mut state, effects) = submit_url(AppState::new(), input);
        let view = state.view();

        assert!(effects.is_empty(), "{input}");
        assert_eq!(view.panel, Panel::Error);
        assert_eq!(
            view.error_text.as_deref(),
            Some("Please enter a valid YouTube URL.")
        );
        assert!(view.input_enabled);
        assert!(state.consume_dirty());
    }
}

#[test]
fn blank_input_never_submits() {
    init_logging();
    for input in ["", "   ", "\t\n"] {
        let (state, effects) = submit_url(AppState::new(), input);

        assert!(effects.is_empty());
        assert_eq!(state.phase(), Phase::ErrorShown);
        assert_eq!(
            state.view().error_text.as_deref(),
            Some("Please enter a YouTube URL.")
        );
    }
}

#[test]
fn valid_url_disables_form_and_emits_trimmed_submit() {
    init_logging();
    let (state, effects) = submit_url(AppState::new(), "  https://youtu.be/abc123 ");
    let view = state.view();

    assert_eq!(
        effects,
        vec![Effect::SubmitJob {
            request_id: 1,
            url: "https://youtu.be/abc123".to_string(),
        }]
    );
    assert_eq!(view.phase, Phase::Submitting);
    assert_eq!(view.panel, Panel::Progress);
    assert_eq!(view.progress_text, "0%");
    assert_eq!(view.status_message, STATUS_DOWNLOADING);
    assert!(!view.input_enabled);
    assert_eq!(view.submit_label, SUBMIT_LABEL_BUSY);
}

#[test]
fn submit_is_ignored_while_submitting() {
    init_logging();
    let (state, _) = submit_url(AppState::new(), "https://youtu.be/abc123");
    let (state, effects) = update(state, Msg::SubmitClicked);
    assert!(effects.is_empty());

    // Edits are dropped while the input is disabled.
    let (state, _) = update(state, Msg::InputChanged("https://youtu.be/other".to_string()));
    assert_eq!(state.input(), "https://youtu.be/abc123");
}

#[test]
fn accepted_submission_stores_job_and_starts_polling() {
    init_logging();
    let (state, _) = submit_url(AppState::new(), "https://youtu.be/abc123");
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
    assert_eq!(state.phase(), Phase::InProgress);
    assert_eq!(state.task_id(), Some("t1"));
    assert!(state.is_polling());
    assert!(!state.view().input_enabled);
}

#[test]
fn rejected_submission_shows_server_message_and_reenables_form() {
    init_logging();
    let (state, _) = submit_url(AppState::new(), "https://youtu.be/abc123");
    let (state, effects) = update(
        state,
        Msg::SubmitFailed {
            request_id: 1,
            failure: RequestFailure::Rejected {
                status: 429,
                message: Some("Maximum number of concurrent tasks reached.".to_string()),
            },
        },
    );
    let view = state.view();

    assert!(effects.is_empty());
    assert_eq!(view.panel, Panel::Error);
    assert_eq!(
        view.error_text.as_deref(),
        Some("Maximum number of concurrent tasks reached.")
    );
    assert!(view.input_enabled);
    assert_eq!(view.submit_label, SUBMIT_LABEL_IDLE);
    assert_eq!(view.task_id, None);
}

#[test]
fn rejected_submission_without_message_uses_fallback() {
    init_logging();
    let (state, _) = submit_url(AppState::new(), "https://youtu.be/abc123");
    let (state, _) = update(
        state,
        Msg::SubmitFailed {
            request_id: 1,
            failure: RequestFailure::Rejected {
                status: 500,
                message: None,
            },
        },
    );
    assert_eq!(state.view().error_text.as_deref(), Some(ERROR_SUBMIT_REJECTED));
}

#[test]
fn network_failure_on_submit_uses_network_message() {
    init_logging();
    let (state, _) = submit_url(AppState::new(), "https://youtu.be/abc123");
    let (state, _) = update(
        state,
        Msg::SubmitFailed {
            request_id: 1,
            failure: RequestFailure::Transport {
                message: "connection refused".to_string(),
            },
        },
    );
    let view = state.view();
    assert_eq!(view.error_text.as_deref(), Some(ERROR_NETWORK));
    assert!(view.input_enabled);
}

#[test]
fn late_submit_response_after_reset_is_discarded() {
    init_logging();
    let (state, _) = submit_url(AppState::new(), "https://youtu.be/abc123");
    let (state, _) = update(state, Msg::ResetClicked);
    let (state, effects) = update(
        state,
        Msg::SubmitSucceeded {
            request_id: 1,
            task_id: "t1".to_string(),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Idle);
    assert_eq!(state.task_id(), None);
}

#[test]
fn response_to_an_earlier_submission_is_discarded() {
    init_logging();
    let (state, _) = submit_url(AppState::new(), "https://youtu.be/first");
    let (state, _) = update(state, Msg::ResetClicked);
    let (state, effects) = submit_url(state, "https://youtu.be/second");
    assert_eq!(
        effects,
        vec![Effect::SubmitJob {
            request_id: 2,
            url: "https://youtu.be/second".to_string(),
        }]
    );

    let (state, effects) = update(
        state,
        Msg::SubmitSucceeded {
            request_id: 1,
            task_id: "old".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Submitting);

    let (state, effects) = update(
        state,
        Msg::SubmitSucceeded {
            request_id: 2,
            task_id: "new".to_string(),
        },
    );
    assert_eq!(effects.len(), 1);
    assert_eq!(state.task_id(), Some("new"));
}
