use crate::text::{SUBMIT_LABEL_BUSY, SUBMIT_LABEL_IDLE};
use crate::view_model::{progress_percent, AppViewModel, Panel};

/// Opaque job identifier handed out by the backend.
pub type TaskId = String;
/// Tags a submission so a late response can be told apart from the current one.
pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    InProgress,
    ResultShown,
    ErrorShown,
}

impl Phase {
    /// Input and submit control are disabled while a job is being started or tracked.
    pub fn accepts_input(self) -> bool {
        !matches!(self, Phase::Submitting | Phase::InProgress)
    }

    pub fn panel(self) -> Panel {
        match self {
            Phase::Idle => Panel::None,
            Phase::Submitting | Phase::InProgress => Panel::Progress,
            Phase::ResultShown => Panel::Result,
            Phase::ErrorShown => Panel::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    /// Any status the client does not know; treated like `Pending`.
    Unknown,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// One status response, discarded once applied.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    pub status: JobStatus,
    pub progress: Option<f64>,
    pub title: Option<String>,
    pub error: Option<String>,
}

impl StatusSnapshot {
    pub fn new(status: JobStatus) -> Self {
        Self {
            status,
            progress: None,
            title: None,
            error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    phase: Phase,
    input: String,
    task_id: Option<TaskId>,
    polling: bool,
    poll_in_flight: bool,
    last_request_id: RequestId,
    pending_request: Option<RequestId>,
    progress: f64,
    status_message: String,
    title: Option<String>,
    error_message: Option<String>,
    download_notice: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let input_enabled = self.phase.accepts_input();
        AppViewModel {
            phase: self.phase,
            panel: self.phase.panel(),
            input_text: self.input.clone(),
            input_enabled,
            submit_label: if input_enabled {
                SUBMIT_LABEL_IDLE
            } else {
                SUBMIT_LABEL_BUSY
            },
            progress_percent: progress_percent(self.progress),
            progress_text: format!("{}%", progress_percent(self.progress)),
            status_message: self.status_message.clone(),
            title_text: self.title.as_ref().map(|title| format!("Title: {title}")),
            error_text: self.error_message.clone(),
            download_notice: self.download_notice.clone(),
            task_id: self.task_id.clone(),
            can_download: self.task_id.is_some(),
            dirty: self.dirty,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    pub fn is_polling(&self) -> bool {
        self.polling
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn is_current_task(&self, task_id: &str) -> bool {
        self.task_id.as_deref() == Some(task_id)
    }

    pub(crate) fn poll_in_flight(&self) -> bool {
        self.poll_in_flight
    }

    pub(crate) fn set_poll_in_flight(&mut self, in_flight: bool) {
        self.poll_in_flight = in_flight;
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.input != text {
            self.input = text;
            self.mark_dirty();
        }
    }

    /// Enter `Submitting` and hand out the id the response must carry.
    pub(crate) fn begin_submission(&mut self) -> RequestId {
        self.last_request_id += 1;
        self.pending_request = Some(self.last_request_id);
        self.task_id = None;
        self.polling = false;
        self.poll_in_flight = false;
        self.progress = 0.0;
        self.status_message = crate::text::STATUS_DOWNLOADING.to_string();
        self.title = None;
        self.error_message = None;
        self.download_notice = None;
        self.phase = Phase::Submitting;
        self.mark_dirty();
        self.last_request_id
    }

    /// Consumes the pending submission if `request_id` is the one still awaited.
    pub(crate) fn take_pending_request(&mut self, request_id: RequestId) -> bool {
        if self.phase == Phase::Submitting && self.pending_request == Some(request_id) {
            self.pending_request = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn begin_polling(&mut self, task_id: TaskId) {
        self.task_id = Some(task_id);
        self.polling = true;
        self.poll_in_flight = false;
        self.phase = Phase::InProgress;
        self.mark_dirty();
    }

    /// Returns whether a timer was running.
    pub(crate) fn stop_polling(&mut self) -> bool {
        self.poll_in_flight = false;
        std::mem::take(&mut self.polling)
    }

    pub(crate) fn apply_progress(&mut self, snapshot: &StatusSnapshot) {
        if let Some(progress) = snapshot.progress {
            self.progress = progress;
            self.mark_dirty();
        }
        if snapshot.status == JobStatus::Processing {
            self.status_message = crate::text::STATUS_CONVERTING.to_string();
            self.mark_dirty();
        }
    }

    pub(crate) fn show_result(&mut self, title: Option<String>) {
        self.phase = Phase::ResultShown;
        if title.is_some() {
            self.title = title;
        }
        self.error_message = None;
        self.mark_dirty();
    }

    pub(crate) fn show_error(&mut self, message: impl Into<String>) {
        self.phase = Phase::ErrorShown;
        self.pending_request = None;
        self.error_message = Some(message.into());
        self.mark_dirty();
    }

    pub(crate) fn set_download_notice(&mut self, notice: String) {
        self.download_notice = Some(notice);
        self.mark_dirty();
    }

    /// Back to `Idle`; returns whether a timer was running.
    pub(crate) fn reset(&mut self) -> bool {
        let was_polling = self.stop_polling();
        let last_request_id = self.last_request_id;
        *self = Self {
            last_request_id,
            ..Self::default()
        };
        self.mark_dirty();
        was_polling
    }
}
