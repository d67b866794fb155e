//! User-facing strings shown by the controller.

pub const SUBMIT_LABEL_IDLE: &str = "Extract MP3";
pub const SUBMIT_LABEL_BUSY: &str = "Extracting...";

pub const STATUS_DOWNLOADING: &str = "Downloading the video...";
pub const STATUS_CONVERTING: &str = "Converting the audio to MP3...";

pub const ERROR_SUBMIT_REJECTED: &str = "The extraction request failed.";
pub const ERROR_NETWORK: &str = "A network error occurred. Please try again.";
pub const ERROR_EXTRACTION_FAILED: &str = "Audio extraction failed.";
pub const ERROR_STATUS_CHECK: &str = "Failed to check the job status.";
