use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_debug, engine_info};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{ApiClient, EngineEvent, RequestId, TaskId};

enum EngineCommand {
    Submit { request_id: RequestId, url: String },
    FetchStatus { task_id: TaskId },
    Download { task_id: TaskId },
    StartPolling { task_id: TaskId, interval: Duration },
    StopPolling,
}

/// Owns the background runtime that performs requests and drives the poll timer.
///
/// Results come back as `EngineEvent`s through `try_recv`/`recv_timeout`.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(client: Arc<dyn ApiClient>, download_dir: PathBuf) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            // At most one timer; replaced on every StartPolling.
            let mut poll_timer: Option<CancellationToken> = None;

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::StartPolling { task_id, interval } => {
                        if let Some(previous) = poll_timer.take() {
                            previous.cancel();
                        }
                        engine_info!("Polling task_id={} every {:?}", task_id, interval);
                        let token = CancellationToken::new();
                        runtime.spawn(run_poll_timer(
                            task_id,
                            interval,
                            token.clone(),
                            event_tx.clone(),
                        ));
                        poll_timer = Some(token);
                    }
                    EngineCommand::StopPolling => {
                        if let Some(previous) = poll_timer.take() {
                            engine_debug!("Polling stopped");
                            previous.cancel();
                        }
                    }
                    command => {
                        let client = client.clone();
                        let event_tx = event_tx.clone();
                        let download_dir = download_dir.clone();
                        runtime.spawn(async move {
                            handle_command(client.as_ref(), command, &download_dir, event_tx)
                                .await;
                        });
                    }
                }
            }

            if let Some(previous) = poll_timer.take() {
                previous.cancel();
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn submit(&self, request_id: RequestId, url: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Submit {
            request_id,
            url: url.into(),
        });
    }

    pub fn fetch_status(&self, task_id: impl Into<TaskId>) {
        let _ = self.cmd_tx.send(EngineCommand::FetchStatus {
            task_id: task_id.into(),
        });
    }

    pub fn download(&self, task_id: impl Into<TaskId>) {
        let _ = self.cmd_tx.send(EngineCommand::Download {
            task_id: task_id.into(),
        });
    }

    /// Emit `PollTick` every `interval`, first one after one interval.
    pub fn start_polling(&self, task_id: impl Into<TaskId>, interval: Duration) {
        let _ = self.cmd_tx.send(EngineCommand::StartPolling {
            task_id: task_id.into(),
            interval,
        });
    }

    pub fn stop_polling(&self) {
        let _ = self.cmd_tx.send(EngineCommand::StopPolling);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    client: &dyn ApiClient,
    command: EngineCommand,
    download_dir: &Path,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::Submit { request_id, url } => EngineEvent::Submitted {
            request_id,
            result: client.submit(&url).await,
        },
        EngineCommand::FetchStatus { task_id } => {
            let result = client.status(&task_id).await;
            EngineEvent::StatusFetched { task_id, result }
        }
        EngineCommand::Download { task_id } => {
            let result = client.download(&task_id, download_dir).await;
            EngineEvent::DownloadFinished { task_id, result }
        }
        EngineCommand::StartPolling { .. } | EngineCommand::StopPolling => return,
    };
    let _ = event_tx.send(event);
}

async fn run_poll_timer(
    task_id: TaskId,
    period: Duration,
    token: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = interval.tick() => {
                let tick = EngineEvent::PollTick { task_id: task_id.clone() };
                if event_tx.send(tick).is_err() {
                    break;
                }
            }
        }
    }
}
