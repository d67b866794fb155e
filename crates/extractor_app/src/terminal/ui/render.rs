use extractor_core::{AppViewModel, Panel};

const BAR_WIDTH: usize = 30;

/// Renders the whole view as terminal lines; the only place that looks at `Panel`.
pub fn render(view: &AppViewModel, show_hints: bool) -> Vec<String> {
    let mut lines = Vec::new();

    match view.panel {
        Panel::None => {
            if show_hints {
                lines.push("Ready. Paste a YouTube URL and press Enter.".to_string());
            }
        }
        Panel::Progress => {
            lines.push(format!(
                "{} [{}] {:>4} {}",
                view.submit_label,
                progress_bar(view.progress_percent),
                view.progress_text,
                view.status_message
            ));
        }
        Panel::Result => {
            lines.push("Extraction complete.".to_string());
            if let Some(title) = &view.title_text {
                lines.push(title.clone());
            }
            if let Some(notice) = &view.download_notice {
                lines.push(notice.clone());
            } else if show_hints && view.can_download {
                lines.push("Type `download` to save the MP3 or `reset` to start over.".to_string());
            }
        }
        Panel::Error => {
            let message = view.error_text.as_deref().unwrap_or_default();
            lines.push(format!("Error: {message}"));
            if show_hints {
                lines.push("Enter another URL or `reset`.".to_string());
            }
        }
    }

    lines
}

fn progress_bar(percent: u8) -> String {
    let filled = usize::from(percent.min(100)) * BAR_WIDTH / 100;
    let mut bar = "#".repeat(filled);
    bar.push_str(&"-".repeat(BAR_WIDTH - filled));
    bar
}
