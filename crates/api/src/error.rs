//! Error types for the API server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use database::DatabaseError;
use enrichment::EnrichmentError;
use orchestrator::OrchestratorError;
use persona_core::CompletionError;
use thiserror::Error;

/// Errors that can occur while serving a request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid credentials.
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Engine-level error.
    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),

    /// Direct database error (sign-in path).
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            ApiError::Orchestrator(err) => orchestrator_status(err),
            ApiError::Database(err) => database_status(err),
        }
    }
}

fn orchestrator_status(err: &OrchestratorError) -> StatusCode {
    match err {
        OrchestratorError::Validation(_) => StatusCode::BAD_REQUEST,
        OrchestratorError::PersonaNotReady(_) | OrchestratorError::MissingRawData(_) => {
            StatusCode::CONFLICT
        }
        OrchestratorError::Completion(err) => completion_status(err),
        OrchestratorError::Enrichment(err) => enrichment_status(err),
        OrchestratorError::Database(err) => database_status(err),
        // The creation wrapper reports the underlying failure's status; the
        // disposition only changes the message.
        OrchestratorError::CreationFailed { source, .. } => orchestrator_status(source),
    }
}

fn completion_status(err: &CompletionError) -> StatusCode {
    match err {
        CompletionError::Network(_)
        | CompletionError::Status { .. }
        | CompletionError::EmptyResponse => StatusCode::BAD_GATEWAY,
        CompletionError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn enrichment_status(err: &EnrichmentError) -> StatusCode {
    match err {
        EnrichmentError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        EnrichmentError::Network(_) | EnrichmentError::WebhookStatus { .. } => {
            StatusCode::BAD_GATEWAY
        }
        EnrichmentError::Database(db) => database_status(db),
        EnrichmentError::Cancelled | EnrichmentError::Configuration(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn database_status(err: &DatabaseError) -> StatusCode {
    match err {
        DatabaseError::NotFound { .. } => StatusCode::NOT_FOUND,
        DatabaseError::AlreadyExists { .. } => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(%status, error = %message, "Request failed");
        } else {
            tracing::debug!(%status, error = %message, "Request rejected");
        }

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
