// ABOUTME: Status poller that watches one scraping job until it finishes
// ABOUTME: Fixed cadence, bounded consecutive retries, cancellable through a token

use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{JobEvent, JobEventSink, PollSettings, RetryBudget, ScrapeBackend, ScrapeJob};
use crate::error::ConsoleError;
use crate::remote::JobState;

pub const SCRAPE_FAILED_FALLBACK: &str = "Scraping failed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Completed,
    /// The backend reported the job as failed.
    Failed(String),
    /// The status endpoint could not be reached often enough in a row.
    Aborted,
    Cancelled,
}

/// A running poll loop. The loop cancels its own token when it exits, so
/// `is_active` goes false once a terminal state is reached.
#[derive(Debug)]
pub struct PollHandle {
    job: ScrapeJob,
    token: CancellationToken,
    task: JoinHandle<PollOutcome>,
}

impl PollHandle {
    pub fn job(&self) -> &ScrapeJob {
        &self.job
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled()
    }

    pub async fn outcome(self) -> PollOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Poll task for job {} ended abnormally: {}", self.job.process_id, e);
                PollOutcome::Cancelled
            }
        }
    }
}

/// Spawns the poll loop for `job` on the current tokio runtime.
pub fn start_polling(
    backend: Arc<dyn ScrapeBackend>,
    job: ScrapeJob,
    settings: PollSettings,
    sink: Arc<dyn JobEventSink>,
) -> PollHandle {
    let token = CancellationToken::new();
    let task = tokio::spawn(poll_until_terminal(
        backend,
        job.clone(),
        settings,
        token.clone(),
        sink,
    ));

    PollHandle { job, token, task }
}

async fn poll_until_terminal(
    backend: Arc<dyn ScrapeBackend>,
    mut job: ScrapeJob,
    settings: PollSettings,
    token: CancellationToken,
    sink: Arc<dyn JobEventSink>,
) -> PollOutcome {
    let _done = token.clone().drop_guard();
    let mut ticker = interval_at(Instant::now() + settings.interval, settings.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut budget = RetryBudget::new(settings.max_retries);

    info!("Polling scraping status for job {} every {:?}", job.process_id, settings.interval);

    loop {
        let checked = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            checked = async {
                ticker.tick().await;
                backend.status().await
            } => Some(checked),
        };
        let Some(checked) = checked else {
            debug!("Polling for job {} cancelled", job.process_id);
            return PollOutcome::Cancelled;
        };
        // A relaunch may cancel us while a check is in flight.
        if token.is_cancelled() {
            debug!("Dropping status for job {} after cancellation", job.process_id);
            return PollOutcome::Cancelled;
        }

        match checked {
            Ok(status) => {
                budget.reset();
                job.state = status.status;
                if !job.state.is_terminal() {
                    debug!("Scraping job {} still {:?}", job.process_id, job.state);
                    sink.emit(JobEvent::Progress(job.clone()));
                    continue;
                }

                if job.state == JobState::Success {
                    info!("Scraping job {} finished", job.process_id);
                    sink.emit(JobEvent::Completed(job));
                    return PollOutcome::Completed;
                }

                let message = status
                    .error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| SCRAPE_FAILED_FALLBACK.to_string());
                warn!("Scraping job {} failed: {}", job.process_id, message);
                job.error = Some(message.clone());
                sink.emit(JobEvent::Failed { job, message: message.clone() });
                return PollOutcome::Failed(message);
            }
            Err(e) => {
                warn!(
                    "Status check {} of {} for job {} failed: {:#}",
                    budget.failures() + 1,
                    settings.max_retries,
                    job.process_id,
                    e
                );
                if budget.record_failure() {
                    let message = ConsoleError::StatusCheckFailed.to_string();
                    job.error = Some(message.clone());
                    sink.emit(JobEvent::Failed { job, message });
                    return PollOutcome::Aborted;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::testing::{RecordingSink, Reply, ScriptedBackend};
    use std::time::Duration;

    fn spawn(backend: &Arc<ScriptedBackend>, sink: &Arc<RecordingSink>) -> PollHandle {
        start_polling(
            backend.clone(),
            ScrapeJob::started("abc"),
            PollSettings::default(),
            sink.clone(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_fires_once_and_polling_stops() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            Reply::State(JobState::Running),
            Reply::State(JobState::Running),
            Reply::State(JobState::Success),
        ]));
        let sink = Arc::new(RecordingSink::default());

        let outcome = spawn(&backend, &sink).outcome().await;
        assert_eq!(outcome, PollOutcome::Completed);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(backend.polls(), 3);

        let terminal = sink.terminal_events();
        assert_eq!(terminal.len(), 1);
        assert!(matches!(&terminal[0], JobEvent::Completed(job) if job.process_id == "abc"));
        assert_eq!(sink.events().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_check_waits_one_interval() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            Reply::State(JobState::Running),
            Reply::State(JobState::Success),
        ]));
        let sink = Arc::new(RecordingSink::default());
        let start = Instant::now();

        spawn(&backend, &sink).outcome().await;

        let times = backend.poll_times();
        assert_eq!(times[0] - start, Duration::from_secs(5));
        assert_eq!(times[1] - times[0], Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_backend_error_message_is_surfaced() {
        let backend = Arc::new(ScriptedBackend::new(vec![Reply::ErrorWith(Some(
            "LinkedIn login required",
        ))]));
        let sink = Arc::new(RecordingSink::default());

        let outcome = spawn(&backend, &sink).outcome().await;
        assert_eq!(outcome, PollOutcome::Failed("LinkedIn login required".to_string()));
        assert!(matches!(
            &sink.terminal_events()[0],
            JobEvent::Failed { message, .. } if message == "LinkedIn login required"
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_backend_error_without_message_uses_fallback() {
        let backend = Arc::new(ScriptedBackend::new(vec![Reply::ErrorWith(Some(""))]));
        let sink = Arc::new(RecordingSink::default());

        let outcome = spawn(&backend, &sink).outcome().await;
        assert_eq!(outcome, PollOutcome::Failed(SCRAPE_FAILED_FALLBACK.to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failures_do_not_abort() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            Reply::TransportFailure,
            Reply::TransportFailure,
            Reply::State(JobState::Success),
        ]));
        let sink = Arc::new(RecordingSink::default());

        let outcome = spawn(&backend, &sink).outcome().await;
        assert_eq!(outcome, PollOutcome::Completed);
        assert_eq!(backend.polls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_three_consecutive_failures_abort() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            Reply::TransportFailure,
            Reply::TransportFailure,
            Reply::TransportFailure,
            Reply::State(JobState::Success),
        ]));
        let sink = Arc::new(RecordingSink::default());

        let outcome = spawn(&backend, &sink).outcome().await;
        assert_eq!(outcome, PollOutcome::Aborted);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(backend.polls(), 3);
        assert!(matches!(
            &sink.terminal_events()[..],
            [JobEvent::Failed { message, .. }]
                if *message == ConsoleError::StatusCheckFailed.to_string()
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_check_resets_failure_count() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            Reply::TransportFailure,
            Reply::TransportFailure,
            Reply::State(JobState::Running),
            Reply::TransportFailure,
            Reply::TransportFailure,
            Reply::State(JobState::Pending),
            Reply::State(JobState::Success),
        ]));
        let sink = Arc::new(RecordingSink::default());

        let outcome = spawn(&backend, &sink).outcome().await;
        assert_eq!(outcome, PollOutcome::Completed);
        assert_eq!(backend.polls(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_polling_without_terminal_event() {
        let backend = Arc::new(ScriptedBackend::new(Vec::new()));
        let sink = Arc::new(RecordingSink::default());
        let handle = spawn(&backend, &sink);

        tokio::time::sleep(Duration::from_secs(12)).await;
        assert_eq!(backend.polls(), 2);

        handle.cancel();
        assert!(!handle.is_active());
        assert_eq!(handle.outcome().await, PollOutcome::Cancelled);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(backend.polls(), 2);
        assert!(sink.terminal_events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_status_check_emits_no_terminal_event() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            Reply::State(JobState::Running),
            Reply::State(JobState::Success),
        ]));
        let sink = Arc::new(RecordingSink::default());
        let handle = spawn(&backend, &sink);

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(backend.polls(), 1);

        // Cancelled mid-request, the way a relaunch would, and the stale
        // reply reports success.
        backend.cancel_during_next_poll(handle.cancellation_token());
        assert_eq!(handle.outcome().await, PollOutcome::Cancelled);

        assert_eq!(backend.polls(), 2);
        assert!(sink.terminal_events().is_empty());
        assert_eq!(sink.events().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_handle_goes_inactive_after_terminal_state() {
        let backend = Arc::new(ScriptedBackend::new(vec![Reply::State(JobState::Success)]));
        let sink = Arc::new(RecordingSink::default());
        let handle = spawn(&backend, &sink);
        let token = handle.cancellation_token();

        assert_eq!(handle.outcome().await, PollOutcome::Completed);
        assert!(token.is_cancelled());
    }
}
