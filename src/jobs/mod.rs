// ABOUTME: Scraping job lifecycle: launch, status polling and completion events
// ABOUTME: Keeps at most one poll loop alive per launcher

pub mod launcher;
pub mod poller;
#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

use crate::remote::{ApiClient, JobState, LaunchRequest, LaunchResponse, ScrapeStatus};

pub use launcher::JobLauncher;
pub use poller::{start_polling, PollHandle, PollOutcome};

/// A backend-run scraping task as seen from the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeJob {
    pub process_id: String,
    pub state: JobState,
    pub error: Option<String>,
}

impl ScrapeJob {
    pub fn started(process_id: impl Into<String>) -> Self {
        Self {
            process_id: process_id.into(),
            state: JobState::Pending,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    /// Consecutive failed status checks tolerated before giving up.
    pub max_retries: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_retries: 3,
        }
    }
}

/// Counts consecutive failed status checks against a fixed ceiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryBudget {
    failures: u32,
    ceiling: u32,
}

impl RetryBudget {
    pub fn new(ceiling: u32) -> Self {
        Self {
            failures: 0,
            ceiling,
        }
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Records one failure. Returns `true` when the ceiling is reached, in
    /// which case the counter is already back at zero.
    pub fn record_failure(&mut self) -> bool {
        self.failures += 1;
        if self.failures >= self.ceiling {
            self.reset();
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.failures = 0;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    /// A non-terminal status was observed.
    Progress(ScrapeJob),
    Completed(ScrapeJob),
    Failed { job: ScrapeJob, message: String },
}

impl JobEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobEvent::Progress(_))
    }
}

pub trait JobEventSink: Send + Sync {
    fn emit(&self, event: JobEvent);
}

pub struct ChannelEventSink {
    tx: UnboundedSender<JobEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: UnboundedSender<JobEvent>) -> Self {
        Self { tx }
    }
}

impl JobEventSink for ChannelEventSink {
    fn emit(&self, event: JobEvent) {
        let _ = self.tx.send(event);
    }
}

/// The two backend calls the job lifecycle needs.
#[async_trait]
pub trait ScrapeBackend: Send + Sync {
    async fn launch(&self, request: &LaunchRequest) -> anyhow::Result<LaunchResponse>;
    async fn status(&self) -> anyhow::Result<ScrapeStatus>;
}

#[async_trait]
impl ScrapeBackend for ApiClient {
    async fn launch(&self, request: &LaunchRequest) -> anyhow::Result<LaunchResponse> {
        self.run_scraper(request).await
    }

    async fn status(&self) -> anyhow::Result<ScrapeStatus> {
        self.scraping_status().await
    }
}
