use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static YOUTUBE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?(www\.)?(youtube\.com|youtu\.be)/.+").expect("static regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a YouTube URL.")]
    EmptyInput,
    #[error("Please enter a valid YouTube URL.")]
    InvalidUrl,
}

/// Trim the raw input and check it against the accepted hosts.
///
/// Returns the trimmed URL that should be sent to the backend.
pub fn validate_url(raw: &str) -> Result<&str, ValidationError> {
    let url = raw.trim();
    if url.is_empty() {
        return Err(ValidationError::EmptyInput);
    }
    if !YOUTUBE_URL.is_match(url) {
        return Err(ValidationError::InvalidUrl);
    }
    Ok(url)
}
