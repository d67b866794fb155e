use extractor_core::Msg;

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Submit(String),
    Download,
    Reset,
    Help,
    Quit,
}

pub const HELP_TEXT: &str =
    "Paste a YouTube URL and press Enter. Commands: download, reset, help, quit.";

/// Anything that is not a known command is treated as URL input, so the
/// controller decides whether it is valid.
pub fn parse_line(line: &str) -> Command {
    match line.trim().to_ascii_lowercase().as_str() {
        "download" | "d" => Command::Download,
        "reset" | "r" => Command::Reset,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => Command::Submit(line.to_string()),
    }
}

/// Messages a command feeds into `update`.
pub fn to_msgs(command: Command) -> Vec<Msg> {
    match command {
        Command::Submit(text) => vec![Msg::InputChanged(text), Msg::SubmitClicked],
        Command::Download => vec![Msg::DownloadClicked],
        Command::Reset => vec![Msg::ResetClicked],
        Command::Help | Command::Quit => Vec::new(),
    }
}
