// ABOUTME: Remote backend module
// ABOUTME: Typed REST client and wire models for the scraping backend

pub mod client;
pub mod models;

pub use client::ApiClient;
pub use models::{
    BackendStatus, EmailSearchResponse, HubspotResult, JobState, LaunchRequest, LaunchResponse,
    NewSearch, Profile, ScrapeStatus, Search, SearchStatistics, SearchUpdate, TopSearch,
};
