use std::time::Duration;

use thiserror::Error;

/// Result type for driver lifecycle operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while starting, configuring or talking to the driver core.
///
/// Command-level failures never use this type; they travel back to the caller
/// as a [`WebDriverErrorResponse`](crate::server::response::WebDriverErrorResponse).
#[derive(Debug, Error)]
pub enum Error {
    /// I/O failure (thread spawn, listener bind)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration parsed but holds unusable values
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The automation thread is gone and can no longer accept work
    #[error("automation thread has shut down")]
    AutomationThreadGone,

    /// The automation thread answered an event with an outcome that does not fit it
    #[error("unexpected event outcome: {0:?}")]
    UnexpectedOutcome(crate::dispatch::EventOutcome),

    /// A window lifecycle event was not acknowledged in time
    #[error("automation thread did not acknowledge the event within {0:?}")]
    Timeout(Duration),
}
