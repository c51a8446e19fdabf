//! Result and error types for Vitrina.

use thiserror::Error;

/// Result type for Vitrina operations
pub type VitrinaResult<T> = Result<T, VitrinaError>;

/// Errors that can occur in Vitrina
#[derive(Debug, Error)]
pub enum VitrinaError {
    /// A named wait condition never became true within its budget
    #[error("timed out after {ms}ms waiting for {waited_for}")]
    Timeout {
        /// Timeout budget in milliseconds
        ms: u64,
        /// Description of the awaited condition
        waited_for: String,
    },

    /// Element lookup failed
    #[error("element not found: {selector}")]
    ElementNotFound {
        /// Selector expression that matched nothing
        selector: String,
    },

    /// Browser driver error (CDP, script evaluation, input dispatch)
    #[error("driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Navigation failed
    #[error("navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Operation called against state it cannot act on
    #[error("invalid state: {message}")]
    InvalidState {
        /// Error message
        message: String,
    },

    /// HTTP transport error (connection, TLS, timeout at the socket level).
    /// Non-2xx responses are NOT errors; they come back as [`crate::ApiResponse`].
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl VitrinaError {
    /// Shorthand for a driver error from any displayable cause
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }
}
