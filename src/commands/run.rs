// ABOUTME: Launches a scraping job and follows it to completion
// ABOUTME: Shows a spinner while polling and refreshes the profile count when done

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use super::Console;
use crate::error::ConsoleError;
use crate::jobs::{ChannelEventSink, JobEvent, JobLauncher, PollOutcome, ScrapeBackend};
use crate::remote::LaunchRequest;

pub async fn run(console: &Console, request: LaunchRequest) -> Result<()> {
    let backend: Arc<dyn ScrapeBackend> = Arc::new(console.client.clone());
    let mut launcher = JobLauncher::new(backend, console.config.poll_settings());

    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = launcher
        .launch(&request, Arc::new(ChannelEventSink::new(tx)))
        .await?;
    let process_id = handle.job().process_id.clone();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg} [{elapsed}]")?);
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner.set_message(format!(
        "Scraping job {} started. This can take several minutes...",
        process_id
    ));

    let mut checks = 0usize;
    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(JobEvent::Progress(job)) => {
                    checks += 1;
                    spinner.set_message(format!(
                        "Scraping job {} is {:?} ({} status checks)",
                        job.process_id, job.state, checks
                    ));
                }
                Some(JobEvent::Completed(_)) => {
                    spinner.finish_with_message("Scraping completed successfully");
                    match console.client.profiles().await {
                        Ok(profiles) => println!("{} profiles available", profiles.len()),
                        Err(e) => tracing::warn!("Failed to refresh profiles: {:#}", e),
                    }
                }
                Some(JobEvent::Failed { message, .. }) => {
                    spinner.finish_and_clear();
                    tracing::debug!("Job {} failed: {}", process_id, message);
                }
                // The poll task dropped its sink, so it has finished.
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                launcher.cancel();
                spinner.finish_and_clear();
                println!("Stopped following job {}. It keeps running on the backend.", process_id);
                break;
            }
        }
    }

    match handle.outcome().await {
        PollOutcome::Completed | PollOutcome::Cancelled => Ok(()),
        PollOutcome::Failed(message) => Err(ConsoleError::Application(message).into()),
        PollOutcome::Aborted => Err(ConsoleError::StatusCheckFailed.into()),
    }
}
