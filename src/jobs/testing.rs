// ABOUTME: Scripted backend and recording sink for job lifecycle tests
// ABOUTME: Status replies are consumed in order; an empty script keeps answering "running"

use anyhow::anyhow;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::{JobEvent, JobEventSink, ScrapeBackend};
use crate::remote::{JobState, LaunchRequest, LaunchResponse, ScrapeStatus};

pub(crate) enum Reply {
    State(JobState),
    ErrorWith(Option<&'static str>),
    TransportFailure,
}

pub(crate) struct ScriptedBackend {
    launch: Mutex<Option<anyhow::Result<LaunchResponse>>>,
    replies: Mutex<VecDeque<Reply>>,
    launches: AtomicUsize,
    polls: Mutex<Vec<Instant>>,
    cancel_on_poll: Mutex<Option<CancellationToken>>,
}

impl ScriptedBackend {
    pub(crate) fn new(replies: Vec<Reply>) -> Self {
        Self {
            launch: Mutex::new(None),
            replies: Mutex::new(replies.into()),
            launches: AtomicUsize::new(0),
            polls: Mutex::new(Vec::new()),
            cancel_on_poll: Mutex::new(None),
        }
    }

    pub(crate) fn with_launch(self, response: anyhow::Result<LaunchResponse>) -> Self {
        *self.launch.lock().unwrap() = Some(response);
        self
    }

    pub(crate) fn fail_next_launch(&self, reason: &'static str) {
        *self.launch.lock().unwrap() = Some(Err(anyhow!(reason)));
    }

    /// Cancels `token` while the next status request is in flight, before
    /// its reply is returned.
    pub(crate) fn cancel_during_next_poll(&self, token: CancellationToken) {
        *self.cancel_on_poll.lock().unwrap() = Some(token);
    }

    pub(crate) fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub(crate) fn polls(&self) -> usize {
        self.polls.lock().unwrap().len()
    }

    pub(crate) fn poll_times(&self) -> Vec<Instant> {
        self.polls.lock().unwrap().clone()
    }
}

pub(crate) fn started(process_id: &str) -> LaunchResponse {
    LaunchResponse {
        status: Some("started".to_string()),
        process_id: Some(process_id.to_string()),
        ..LaunchResponse::default()
    }
}

fn status(state: JobState, error: Option<&str>) -> ScrapeStatus {
    ScrapeStatus {
        status: state,
        message: None,
        error: error.map(str::to_string),
        active_processes: None,
    }
}

#[async_trait]
impl ScrapeBackend for ScriptedBackend {
    async fn launch(&self, _request: &LaunchRequest) -> anyhow::Result<LaunchResponse> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        match self.launch.lock().unwrap().take() {
            Some(response) => response,
            None => Ok(started("1715000000")),
        }
    }

    async fn status(&self) -> anyhow::Result<ScrapeStatus> {
        self.polls.lock().unwrap().push(Instant::now());
        if let Some(token) = self.cancel_on_poll.lock().unwrap().take() {
            token.cancel();
        }
        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::State(state)) => Ok(status(state, None)),
            Some(Reply::ErrorWith(message)) => Ok(status(JobState::Error, message)),
            Some(Reply::TransportFailure) => Err(anyhow!("connection refused")),
            None => Ok(status(JobState::Running, None)),
        }
    }
}

#[derive(Default)]
pub(crate) struct RecordingSink {
    events: Mutex<Vec<JobEvent>>,
}

impl RecordingSink {
    pub(crate) fn events(&self) -> Vec<JobEvent> {
        self.events.lock().unwrap().clone()
    }

    pub(crate) fn terminal_events(&self) -> Vec<JobEvent> {
        self.events()
            .into_iter()
            .filter(JobEvent::is_terminal)
            .collect()
    }
}

impl JobEventSink for RecordingSink {
    fn emit(&self, event: JobEvent) {
        self.events.lock().unwrap().push(event);
    }
}
