//! Application state shared across handlers.

use std::sync::Arc;

use database::Database;
use orchestrator::PersonaEngine;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Persona engine.
    pub engine: Arc<PersonaEngine>,
    /// Shared-secret bearer token, if configured.
    pub api_token: Option<String>,
}

impl AppState {
    /// Create new application state.
    pub fn new(db: Database, engine: Arc<PersonaEngine>, api_token: Option<String>) -> Self {
        Self {
            db,
            engine,
            api_token,
        }
    }
}
