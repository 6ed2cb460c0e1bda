// ABOUTME: Error kinds surfaced by the scrape console
// ABOUTME: Separates transport, backend-reported and local validation failures

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    /// Network failure or non-2xx response from the backend.
    Transport(String),
    /// The backend answered but reported a failure of its own.
    Application(String),
    /// The status endpoint kept failing until the retry budget ran out.
    StatusCheckFailed,
    Validation(String),
    Unauthorized(String),
    Config(String),
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConsoleError::Transport(msg) => write!(f, "Transport error: {}", msg),
            ConsoleError::Application(msg) => write!(f, "Backend error: {}", msg),
            ConsoleError::StatusCheckFailed => write!(
                f,
                "Failed to check scraping status. Please try launching the job again"
            ),
            ConsoleError::Validation(msg) => write!(f, "Validation error: {}", msg),
            ConsoleError::Unauthorized(msg) => write!(f, "Not authorized: {}", msg),
            ConsoleError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ConsoleError {}
