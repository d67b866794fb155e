use crate::{Phase, TaskId};

/// Which of the three panels is visible; `None` means the bare form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    None,
    Progress,
    Result,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: Phase,
    pub panel: Panel,
    pub input_text: String,
    pub input_enabled: bool,
    pub submit_label: &'static str,
    pub progress_percent: u8,
    pub progress_text: String,
    pub status_message: String,
    pub title_text: Option<String>,
    pub error_text: Option<String>,
    pub download_notice: Option<String>,
    pub task_id: Option<TaskId>,
    pub can_download: bool,
    pub dirty: bool,
}

/// Whole-number percentage for display; non-finite input shows as 0.
pub fn progress_percent(progress: f64) -> u8 {
    if !progress.is_finite() {
        return 0;
    }
    progress.clamp(0.0, 100.0).round() as u8
}
