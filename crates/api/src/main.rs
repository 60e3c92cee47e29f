//! Hatch JSON API server.
//!
//! Exposes sign-in, persona creation/lookup/deletion, panels, and the chat
//! entry point over HTTP, backed by the persona engine.

mod auth;
mod config;
mod error;
mod routes;
mod state;

use std::sync::Arc;

use database::Database;
use enrichment::{CompletionPoller, EnrichmentTrigger, PollerConfig, TriggerConfig};
use llm_gateway::GatewayClient;
use orchestrator::{PersonaEngine, RetryPolicy};
use tracing::{info, warn};

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting Hatch API server");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Completion gateway
    let client = Arc::new(GatewayClient::from_env()?);

    // Enrichment webhook is optional; without it, raw payloads must arrive
    // through some other path and creation relies on the poller alone.
    let trigger = match TriggerConfig::from_env() {
        Ok(trigger_config) => Some(EnrichmentTrigger::new(trigger_config)?),
        Err(err) => {
            warn!(error = %err, "Enrichment trigger disabled");
            None
        }
    };

    let poller = CompletionPoller::new(PollerConfig::from_env());
    let engine = Arc::new(PersonaEngine::new(
        db.clone(),
        client,
        trigger,
        poller,
        RetryPolicy::from_env(),
    ));

    // Build application state and router
    let state = AppState::new(db, engine, config.api_token.clone());
    let app = routes::router().with_state(state);

    // Start server
    info!(addr = %config.addr, "Hatch API listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
