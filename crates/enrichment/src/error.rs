//! Error types for enrichment operations.

use database::DatabaseError;
use thiserror::Error;

/// Errors that can occur while triggering or awaiting enrichment.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    /// The webhook request never reached the endpoint.
    #[error("webhook request failed: {0}")]
    Network(String),

    /// The webhook endpoint answered with a non-success status.
    #[error("webhook returned status {status}: {message}")]
    WebhookStatus { status: u16, message: String },

    /// The polling budget ran out before both raw fields appeared.
    ///
    /// The record itself is not corrupt, only not-yet-ready; callers surface
    /// this distinctly from data and network errors.
    #[error("enrichment did not complete after {attempts} attempts")]
    Timeout { attempts: u32 },

    /// The wait was cancelled by the caller's shutdown signal.
    #[error("polling cancelled")]
    Cancelled,

    /// Reading the persona row failed (beyond a transient missing row).
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// Missing or malformed configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}
