//! Error types for orchestration operations.

use database::DatabaseError;
use enrichment::EnrichmentError;
use persona_core::CompletionError;
use thiserror::Error;

/// What happened to a partial persona row after a failed creation flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The partial row was preserved for a later retry.
    Kept,
    /// The partial row was deleted.
    Deleted,
}

impl std::fmt::Display for Disposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Disposition::Kept => write!(f, "kept"),
            Disposition::Deleted => write!(f, "deleted"),
        }
    }
}

/// Errors that can occur during orchestration.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Input rejected before any external call.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The persona has no derived summary yet; chat cannot start.
    #[error("persona {0} is not chat-ready")]
    PersonaNotReady(String),

    /// The persona is missing one or both raw enrichment documents.
    #[error("persona {0} is missing raw enrichment data")]
    MissingRawData(String),

    /// Completion backend failed.
    #[error(transparent)]
    Completion(#[from] CompletionError),

    /// Enrichment trigger or poller failed.
    #[error(transparent)]
    Enrichment(#[from] EnrichmentError),

    /// Record store failed.
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// The creation flow failed after the row was inserted.
    ///
    /// Names what was done with the partial row, so the caller knows whether
    /// a retry should reuse it or start over.
    #[error("persona creation failed, partial row {disposition}: {source}")]
    CreationFailed {
        persona_id: String,
        disposition: Disposition,
        #[source]
        source: Box<OrchestratorError>,
    },
}

impl From<database::ValidationError> for OrchestratorError {
    fn from(e: database::ValidationError) -> Self {
        OrchestratorError::Validation(e.to_string())
    }
}
