//! Error types for completion calls.

use thiserror::Error;

/// Errors that can occur when talking to a chat-completion backend.
#[derive(Debug, Clone, Error)]
pub enum CompletionError {
    /// The request never reached the backend (DNS, connect, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("upstream error ({status}): {message}")]
    Status { status: u16, message: String },

    /// The backend answered but the reply carried no usable text.
    #[error("empty completion from backend")]
    EmptyResponse,

    /// The client is misconfigured (missing key, bad URL).
    #[error("configuration error: {0}")]
    Configuration(String),
}
