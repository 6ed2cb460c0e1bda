// ABOUTME: Console command implementations shared by the binary
// ABOUTME: Each command takes the Console context and prints its results

pub mod auth;
pub mod hubspot;
pub mod output;
pub mod profiles;
pub mod run;
pub mod searches;
pub mod status;

use anyhow::Result;

use crate::config::Config;
use crate::error::ConsoleError;
use crate::remote::ApiClient;
use crate::session::Session;

/// Everything a command needs: resolved configuration, the API client and
/// the caller's session.
pub struct Console {
    pub config: Config,
    pub client: ApiClient,
    pub session: Session,
}

impl Console {
    pub fn new(config: Config) -> Result<Self> {
        let client = ApiClient::new(config.api_url.clone(), config.request_timeout())?;
        let session = Session::load(&config.session_path()?)?;
        tracing::debug!("Using backend at {}", client.base_url());

        Ok(Self {
            config,
            client,
            session,
        })
    }

    pub fn require_login(&self) -> Result<(), ConsoleError> {
        if self.session.is_logged_in() {
            Ok(())
        } else {
            Err(ConsoleError::Unauthorized(
                "not logged in. Run `scrape-console login` first".to_string(),
            ))
        }
    }
}
