use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use engine_logging::{engine_debug, engine_info, engine_warn};
use extractor_core::{DownloadOutcome, Effect, JobStatus, Msg, RequestFailure, StatusSnapshot};
use extractor_engine::{
    ApiError, EngineEvent, EngineHandle, FailureKind, ReqwestApiClient, StatusResponse,
};

use super::config::ClientConfig;

/// Executes controller effects on the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
    poll_interval: Duration,
}

impl EffectRunner {
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let client = ReqwestApiClient::new(config.client_settings())
            .with_context(|| format!("Invalid server URL {}", config.server))?;
        let engine = EngineHandle::new(Arc::new(client), config.download_dir.clone());
        Ok(Self {
            engine,
            poll_interval: config.poll_interval(),
        })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitJob { request_id, url } => {
                    engine_info!("SubmitJob request_id={} url={}", request_id, url);
                    self.engine.submit(request_id, url);
                }
                Effect::StartPolling { task_id } => {
                    self.engine.start_polling(task_id, self.poll_interval);
                }
                Effect::StopPolling => self.engine.stop_polling(),
                Effect::FetchStatus { task_id } => {
                    engine_debug!("FetchStatus task_id={}", task_id);
                    self.engine.fetch_status(task_id);
                }
                Effect::Download { task_id } => {
                    engine_info!("Download task_id={}", task_id);
                    self.engine.download(task_id);
                }
            }
        }
    }

    /// Messages for every engine event received so far.
    pub fn drain_events(&self) -> Vec<Msg> {
        let mut msgs = Vec::new();
        while let Some(event) = self.engine.try_recv() {
            msgs.push(map_event(event));
        }
        msgs
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Submitted { request_id, result } => match result {
            Ok(task_id) => Msg::SubmitSucceeded {
                request_id,
                task_id,
            },
            Err(err) => Msg::SubmitFailed {
                request_id,
                failure: map_failure(err),
            },
        },
        EngineEvent::PollTick { task_id } => Msg::PollTick { task_id },
        EngineEvent::StatusFetched { task_id, result } => match result {
            Ok(response) => Msg::StatusReceived {
                task_id,
                snapshot: map_snapshot(response),
            },
            Err(err) => Msg::StatusFailed {
                task_id,
                failure: map_failure(err),
            },
        },
        EngineEvent::DownloadFinished { task_id, result } => {
            let outcome = match result {
                Ok(path) => DownloadOutcome::Saved(path),
                Err(err) => {
                    engine_warn!("Download of {} failed: {}", task_id, err);
                    DownloadOutcome::Failed(err.server_message.unwrap_or(err.message))
                }
            };
            Msg::DownloadFinished { task_id, outcome }
        }
    }
}

fn map_failure(err: ApiError) -> RequestFailure {
    match err.kind {
        FailureKind::HttpStatus(status) => RequestFailure::Rejected {
            status,
            message: err.server_message,
        },
        _ => RequestFailure::Transport {
            message: err.to_string(),
        },
    }
}

fn map_snapshot(response: StatusResponse) -> StatusSnapshot {
    StatusSnapshot {
        status: map_status(response.status),
        progress: response.progress,
        title: response.title,
        error: response.error,
    }
}

fn map_status(status: extractor_engine::JobStatus) -> JobStatus {
    match status {
        extractor_engine::JobStatus::Pending => JobStatus::Pending,
        extractor_engine::JobStatus::Processing => JobStatus::Processing,
        extractor_engine::JobStatus::Completed => JobStatus::Completed,
        extractor_engine::JobStatus::Failed => JobStatus::Failed,
        extractor_engine::JobStatus::Unknown => JobStatus::Unknown,
    }
}
