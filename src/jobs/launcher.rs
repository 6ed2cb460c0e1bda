// ABOUTME: Starts scraping jobs on the backend and owns the single active poll loop
// ABOUTME: Relaunching or dropping the launcher cancels the previous loop

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::poller::{start_polling, PollHandle};
use super::{JobEventSink, PollSettings, ScrapeBackend, ScrapeJob};
use crate::error::ConsoleError;
use crate::remote::LaunchRequest;

pub struct JobLauncher {
    backend: Arc<dyn ScrapeBackend>,
    settings: PollSettings,
    active: Option<CancellationToken>,
}

impl JobLauncher {
    pub fn new(backend: Arc<dyn ScrapeBackend>, settings: PollSettings) -> Self {
        Self {
            backend,
            settings,
            active: None,
        }
    }

    /// Asks the backend to start a scraping run and begins polling it.
    ///
    /// A request that fails local validation leaves any running poll loop
    /// alone. Once it passes, the earlier loop is cancelled before the backend
    /// is contacted, whether or not the launch itself succeeds.
    pub async fn launch(
        &mut self,
        request: &LaunchRequest,
        sink: Arc<dyn JobEventSink>,
    ) -> Result<PollHandle, ConsoleError> {
        if request.search_name.trim().is_empty() {
            return Err(ConsoleError::Validation("search name is required".to_string()));
        }
        if request.urlsearch.trim().is_empty() {
            return Err(ConsoleError::Validation("search URL is required".to_string()));
        }

        self.cancel();

        let response = self.backend.launch(request).await.map_err(|e| {
            warn!("Failed to start scraping: {:#}", e);
            ConsoleError::Transport(format!("Failed to start scraping: {:#}", e))
        })?;

        if let Some(error) = response.error.filter(|e| !e.trim().is_empty()) {
            return Err(ConsoleError::Application(error));
        }
        if response.status.as_deref() != Some("started") {
            return Err(ConsoleError::Application(format!(
                "unexpected launch response status {:?}",
                response.status
            )));
        }

        let process_id = response.process_id.unwrap_or_else(|| {
            warn!("Backend accepted the job without a process id");
            String::new()
        });
        info!(
            "Scraping job {} started for search '{}'",
            process_id, request.search_name
        );

        let handle = start_polling(
            self.backend.clone(),
            ScrapeJob::started(process_id),
            self.settings,
            sink,
        );
        self.active = Some(handle.cancellation_token());
        Ok(handle)
    }

    pub fn cancel(&mut self) {
        if let Some(token) = self.active.take() {
            token.cancel();
        }
    }

    pub fn is_polling(&self) -> bool {
        self.active.as_ref().is_some_and(|t| !t.is_cancelled())
    }
}

impl Drop for JobLauncher {
    fn drop(&mut self) {
        self.cancel();
    }
}
