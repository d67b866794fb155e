use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use engine_logging::{engine_info, engine_warn};
use extractor_core::{update, AppState, DownloadOutcome, Msg, Phase};

use super::config::ClientConfig;
use super::effects::EffectRunner;
use super::ui::commands::{self, Command, HELP_TEXT};
use super::ui::render::render;

const IDLE_SLEEP: Duration = Duration::from_millis(20);

const BUSY_NOTICE: &str =
    "A job is already running. Wait for it to finish or type `reset`.";

/// How a one-shot run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Success,
    Failure,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::Failure => ExitCode::FAILURE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Read URLs and commands from stdin until `quit` or EOF.
    Interactive,
    /// Submit one URL, optionally download the result, then exit.
    OneShot { url: String, download: bool },
}

pub fn run_app(config: ClientConfig, mode: RunMode) -> anyhow::Result<ExitCode> {
    engine_info!("Starting extractor against {}", config.server);
    let runner = EffectRunner::new(&config)?;
    let mut app = App::new(runner, mode.clone());

    let commands_rx = match &mode {
        RunMode::Interactive => {
            println!("{HELP_TEXT}");
            spawn_stdin_reader()
        }
        RunMode::OneShot { url, .. } => {
            let (tx, rx) = mpsc::channel();
            let _ = tx.send(Command::Submit(url.clone()));
            rx
        }
    };

    let mut out = io::stdout();
    app.render_if_dirty(&mut out)?;
    loop {
        let mut busy = false;

        while let Ok(command) = commands_rx.try_recv() {
            busy = true;
            if app.handle_command(command, &mut out)? {
                return Ok(ExitCode::SUCCESS);
            }
        }

        busy |= app.pump_engine();
        app.render_if_dirty(&mut out)?;

        if let Some(outcome) = app.finished() {
            return Ok(outcome.into());
        }
        if !busy {
            thread::sleep(IDLE_SLEEP);
        }
    }
}

fn spawn_stdin_reader() -> mpsc::Receiver<Command> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let command = match line {
                Ok(line) => commands::parse_line(&line),
                Err(err) => {
                    engine_warn!("Failed to read stdin: {}", err);
                    Command::Quit
                }
            };
            let quit = command == Command::Quit;
            if tx.send(command).is_err() || quit {
                return;
            }
        }
        let _ = tx.send(Command::Quit);
    });
    rx
}

struct App {
    state: AppState,
    runner: EffectRunner,
    mode: RunMode,
    download_requested: bool,
    download_result: Option<bool>,
}

impl App {
    fn new(runner: EffectRunner, mode: RunMode) -> Self {
        Self {
            state: AppState::new(),
            runner,
            mode,
            download_requested: false,
            download_result: None,
        }
    }

    /// Applies one prompt command; returns `true` when the user asked to quit.
    fn handle_command(&mut self, command: Command, out: &mut impl Write) -> io::Result<bool> {
        match command {
            Command::Quit => return Ok(true),
            Command::Help => writeln!(out, "{HELP_TEXT}")?,
            Command::Submit(_) if !self.state.phase().accepts_input() => {
                writeln!(out, "{BUSY_NOTICE}")?;
            }
            command => {
                for msg in commands::to_msgs(command) {
                    self.dispatch(msg);
                }
            }
        }
        Ok(false)
    }

    /// Feeds every pending engine event through `update`; returns whether any arrived.
    fn pump_engine(&mut self) -> bool {
        let msgs = self.runner.drain_events();
        let busy = !msgs.is_empty();
        for msg in msgs {
            self.dispatch(msg);
        }
        busy
    }

    fn dispatch(&mut self, msg: Msg) {
        if let Msg::DownloadFinished { outcome, .. } = &msg {
            self.download_result = Some(matches!(outcome, DownloadOutcome::Saved(_)));
        }
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);
    }

    fn render_if_dirty(&mut self, out: &mut impl Write) -> io::Result<()> {
        if !self.state.consume_dirty() {
            return Ok(());
        }
        let show_hints = self.mode == RunMode::Interactive;
        for line in render(&self.state.view(), show_hints) {
            writeln!(out, "{line}")?;
        }
        out.flush()
    }

    /// Outcome once a one-shot run is over.
    fn finished(&mut self) -> Option<Outcome> {
        let RunMode::OneShot { download, .. } = self.mode else {
            return None;
        };
        match self.state.phase() {
            Phase::ErrorShown => Some(Outcome::Failure),
            Phase::ResultShown if !download => Some(Outcome::Success),
            Phase::ResultShown => {
                if !self.download_requested {
                    self.download_requested = true;
                    self.dispatch(Msg::DownloadClicked);
                    return None;
                }
                self.download_result.map(|saved| {
                    if saved {
                        Outcome::Success
                    } else {
                        Outcome::Failure
                    }
                })
            }
            Phase::Idle | Phase::Submitting | Phase::InProgress => None,
        }
    }
}
