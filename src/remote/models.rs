// ABOUTME: Data structures exchanged with the scraping backend
// ABOUTME: These are serialized to JSON for API communication

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /api/run-scraper`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchRequest {
    pub urlsearch: String,
    pub search_name: String,
    pub search_description: String,
}

impl LaunchRequest {
    pub fn new(
        urlsearch: impl Into<String>,
        search_name: impl Into<String>,
        search_description: impl Into<String>,
    ) -> Self {
        Self {
            urlsearch: urlsearch.into(),
            search_name: search_name.into(),
            search_description: search_description.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LaunchResponse {
    pub status: Option<String>, // "started" when accepted
    pub process_id: Option<String>,
    pub message: Option<String>,
    pub search_name: Option<String>,
    pub error: Option<String>,
}

/// Job state as reported by `GET /api/scraping-status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Pending,
    Running,
    Success,
    Error,
    #[serde(other)]
    Unknown,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Success | JobState::Error)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeStatus {
    pub status: JobState,
    pub message: Option<String>,
    pub error: Option<String>,
    pub active_processes: Option<u32>,
}

/// A scraped LinkedIn profile.
///
/// Only the fields the console reads are typed; everything else the backend
/// sends is kept in `extra` so the record can be posted back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    #[serde(rename = "fullName", default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "mobileNumber", default)]
    pub mobile_number: Option<String>,
    #[serde(rename = "profileUrl", default)]
    pub profile_url: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub email_checked: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// SQLite hands booleans back as 0/1, so accept either form.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => matches!(s.as_str(), "1" | "true" | "True"),
        _ => false,
    })
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Search {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub search_url: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewSearch {
    pub name: String,
    pub description: String,
    pub search_url: String,
}

/// Fields left as `None` are sent as `null` and left untouched by the backend.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchStatistics {
    pub total_searches: u64,
    pub active_searches: u64,
    pub unique_profiles: u64,
    pub top_searches: Vec<TopSearch>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TopSearch {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendStatus {
    #[serde(default)]
    pub database_exists: bool,
    pub profile_count: Option<u64>,
    pub database_path: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    pub token: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HubspotRequest<'a> {
    pub contacts: &'a [Profile],
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HubspotResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub successful_contacts: Vec<Value>,
    #[serde(default)]
    pub failed_contacts: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailSearchResponse {
    pub status: Option<String>,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// Error body shared by most endpoints: `{"error": "..."}`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
}
