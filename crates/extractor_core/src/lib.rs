//! Extractor core: pure controller state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod text;
mod update;
mod validate;
mod view_model;

pub use effect::Effect;
pub use msg::{DownloadOutcome, Msg, RequestFailure};
pub use state::{AppState, JobStatus, Phase, RequestId, StatusSnapshot, TaskId};
pub use text::*;
pub use update::update;
pub use validate::{validate_url, ValidationError};
pub use view_model::{progress_percent, AppViewModel, Panel};
