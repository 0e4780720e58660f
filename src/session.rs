//! Presentation side state: the latest result slot and the copy status.

use crate::errors::AppError;
use crate::metadata::{self, Aggregator, VideoMetadata};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum ViewState {
    #[default]
    Idle,
    Loading,
    Ready(VideoMetadata),
    Failed(String),
}

/// Handed out by [`Session::begin`]. Only the newest ticket may publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

#[derive(Default)]
pub struct Session {
    generation: AtomicU64,
    state: RwLock<ViewState>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn begin(&self) -> Ticket {
        let mut state = self.state.write().await;
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *state = ViewState::Loading;
        Ticket { generation }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.generation
    }

    /// Publish a completed request. Returns false, leaving the slot alone,
    /// when a newer request started in the meantime.
    pub async fn finish(&self, ticket: Ticket, result: &Result<VideoMetadata, AppError>) -> bool {
        let mut state = self.state.write().await;
        if !self.is_current(ticket) {
            log::debug!(
                "dropping stale result for generation {} (latest {})",
                ticket.generation,
                self.generation.load(Ordering::SeqCst)
            );
            return false;
        }

        *state = match result {
            Ok(meta) => ViewState::Ready(meta.clone()),
            Err(e) => ViewState::Failed(e.to_string()),
        };
        true
    }

    pub async fn state(&self) -> ViewState {
        self.state.read().await.clone()
    }

    /// Extract, aggregate and publish in one go.
    pub async fn submit(
        &self,
        aggregator: &Aggregator,
        input: &str,
    ) -> Result<VideoMetadata, AppError> {
        let ticket = self.begin().await;
        let result = metadata::fetch_video(aggregator, input)
            .await
            .map(|(meta, report)| {
                for step in report.degraded() {
                    log::debug!("degraded step {}: {:?}", step.name, step.status);
                }
                meta
            });
        self.finish(ticket, &result).await;
        result
    }
}

#[derive(Default)]
struct CopyInner {
    label: Option<String>,
    token: u64,
    timer: Option<JoinHandle<()>>,
}

/// Label of the last copy action, cleared after a fixed delay.
/// Each new action replaces the label and restarts the delay.
#[derive(Clone)]
pub struct CopyStatus {
    inner: Arc<Mutex<CopyInner>>,
    clear_after: Duration,
}

impl CopyStatus {
    pub fn new(clear_after: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CopyInner::default())),
            clear_after,
        }
    }

    /// Must be called from within a tokio runtime.
    pub fn mark(&self, label: &str) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(timer) = inner.timer.take() {
            timer.abort();
        }

        inner.token += 1;
        inner.label = Some(label.to_string());

        let token = inner.token;
        let shared = self.inner.clone();
        let clear_after = self.clear_after;
        inner.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(clear_after).await;
            let mut inner = shared.lock().unwrap_or_else(|e| e.into_inner());
            // an aborted timer may already be past its sleep
            if inner.token == token {
                inner.label = None;
                inner.timer = None;
            }
        }));
    }

    pub fn current(&self) -> Option<String> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .label
            .clone()
    }
}
