// ABOUTME: Library root for the scrape console
// ABOUTME: Exposes the backend client, job lifecycle and console commands

pub mod commands;
pub mod config;
pub mod error;
pub mod jobs;
pub mod remote;
pub mod selection;
pub mod session;

pub use config::Config;
pub use error::ConsoleError;
