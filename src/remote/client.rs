// ABOUTME: HTTP client for the scraping backend REST API
// ABOUTME: Handles job launch, status polling, profiles, searches and HubSpot export

use anyhow::{Context, Result};
use reqwest::{header::AUTHORIZATION, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::models::{
    BackendStatus, EmailSearchResponse, ErrorBody, HubspotRequest, HubspotResult,
    LaunchRequest, LaunchResponse, LoginRequest, LoginResponse, NewSearch, Profile,
    ScrapeStatus, Search, SearchStatistics, SearchUpdate,
};
use crate::error::ConsoleError;
use crate::session::Session;

const HUBSPOT_FALLBACK: &str = "Failed to send contacts to HubSpot";

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    api_base_url: String,
}

impl ApiClient {
    pub fn new(api_base_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.api_base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }

    pub async fn run_scraper(&self, request: &LaunchRequest) -> Result<LaunchResponse> {
        let response = self
            .client
            .post(self.url("/api/run-scraper"))
            .json(request)
            .send()
            .await
            .context("Failed to reach the scraping backend. Check that it is running and that api_url is correct")?;

        let response = ensure_success(response, "Scraper launch").await?;
        response
            .json()
            .await
            .context("Failed to parse scraper launch response")
    }

    pub async fn scraping_status(&self) -> Result<ScrapeStatus> {
        self.get_json("/api/scraping-status", "scraping status").await
    }

    pub async fn backend_status(&self) -> Result<BackendStatus> {
        self.get_json("/api/status", "backend status").await
    }

    pub async fn profiles(&self) -> Result<Vec<Profile>> {
        self.get_json("/api/profiles", "profiles").await
    }

    pub async fn searches(&self) -> Result<Vec<Search>> {
        self.get_json("/api/searches", "searches").await
    }

    pub async fn search(&self, search_id: i64) -> Result<Search> {
        self.get_json(&format!("/api/searches/{}", search_id), "search")
            .await
    }

    pub async fn search_profiles(&self, search_id: i64) -> Result<Vec<Profile>> {
        self.get_json(
            &format!("/api/searches/{}/profiles", search_id),
            "search profiles",
        )
        .await
    }

    pub async fn search_statistics(&self) -> Result<SearchStatistics> {
        self.get_json("/api/searches/statistics", "search statistics")
            .await
    }

    pub async fn create_search(&self, search: &NewSearch) -> Result<Search> {
        let response = self
            .client
            .post(self.url("/api/searches"))
            .json(search)
            .send()
            .await
            .context("Failed to send create search request")?;

        let response = ensure_success(response, "Create search").await?;
        response
            .json()
            .await
            .context("Failed to parse created search")
    }

    pub async fn update_search(&self, search_id: i64, update: &SearchUpdate) -> Result<Search> {
        let response = self
            .client
            .put(self.url(&format!("/api/searches/{}", search_id)))
            .json(update)
            .send()
            .await
            .context("Failed to send update search request")?;

        let response = ensure_success(response, "Update search").await?;
        response
            .json()
            .await
            .context("Failed to parse updated search")
    }

    /// Returns the backend's confirmation message.
    pub async fn delete_search(&self, search_id: i64) -> Result<String> {
        #[derive(serde::Deserialize)]
        struct Deleted {
            message: Option<String>,
        }

        let response = self
            .client
            .delete(self.url(&format!("/api/searches/{}", search_id)))
            .send()
            .await
            .context("Failed to send delete search request")?;

        let response = ensure_success(response, "Delete search").await?;
        let deleted: Deleted = response
            .json()
            .await
            .context("Failed to parse delete search response")?;

        Ok(deleted
            .message
            .unwrap_or_else(|| format!("Search {} deleted", search_id)))
    }

    pub async fn run_email_search(&self) -> Result<EmailSearchResponse> {
        let response = self
            .client
            .post(self.url("/api/run-email-search"))
            .send()
            .await
            .context("Failed to start email search")?;

        let response = ensure_success(response, "Email search").await?;
        response
            .json()
            .await
            .context("Failed to parse email search response")
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let response = self
            .client
            .post(self.url("/api/login"))
            .json(&LoginRequest { username, password })
            .send()
            .await
            .context("Failed to reach the login endpoint")?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ConsoleError::Unauthorized("invalid credentials".to_string()).into());
        }
        let response = ensure_success(response, "Login").await?;
        let login: LoginResponse = response
            .json()
            .await
            .context("Failed to parse login response")?;

        match (login.success, login.token) {
            (true, Some(token)) => Ok(Session::with_token(token)),
            _ => Err(ConsoleError::Unauthorized(
                login.error.unwrap_or_else(|| "invalid credentials".to_string()),
            )
            .into()),
        }
    }

    /// Pushes contacts to HubSpot through the backend.
    ///
    /// Every failure is folded into an unsuccessful `HubspotResult` so callers
    /// always have a message to show.
    pub async fn send_to_hubspot(&self, session: &Session, contacts: &[Profile]) -> HubspotResult {
        let mut request = self
            .client
            .post(self.url("/api/send-to-hubspot"))
            .json(&HubspotRequest { contacts });
        if let Some(token) = session.token() {
            request = request.header(AUTHORIZATION, token);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("HubSpot export request failed: {}", e);
                return HubspotResult::failed(HUBSPOT_FALLBACK);
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let message = error_field(response)
                .await
                .unwrap_or_else(|| HUBSPOT_FALLBACK.to_string());
            tracing::warn!("HubSpot export rejected with status {}: {}", status, message);
            return HubspotResult::failed(message);
        }

        match response.json::<HubspotResult>().await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Failed to parse HubSpot export response: {}", e);
                HubspotResult::failed(HUBSPOT_FALLBACK)
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .with_context(|| format!("Failed to fetch {} from the backend", what))?;

        let response = ensure_success(response, what).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse {}", what))
    }
}

impl HubspotResult {
    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            successful_contacts: Vec::new(),
            failed_contacts: Vec::new(),
        }
    }
}

async fn ensure_success(response: Response, what: &str) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let detail = error_field(response).await.unwrap_or_default();
    Err(ConsoleError::Transport(format!("{} failed with status {}: {}", what, status, detail)).into())
}

/// Pulls the `error` field out of a failed response body, if there is one.
async fn error_field(response: Response) -> Option<String> {
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(ErrorBody { error: Some(error) }) => Some(error),
        _ if !body.trim().is_empty() => Some(body),
        _ => None,
    }
}
