//! Outbound enrichment webhook.

use std::env;
use std::time::Duration;

use database::Persona;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::EnrichmentError;

/// Configuration for the enrichment webhook.
#[derive(Debug, Clone)]
pub struct TriggerConfig {
    /// Webhook endpoint URL.
    pub webhook_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl TriggerConfig {
    /// Create configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `ENRICHMENT_WEBHOOK_URL` | Webhook endpoint | (required) |
    /// | `ENRICHMENT_TIMEOUT_SECS` | Request timeout in seconds | `30` |
    pub fn from_env() -> Result<Self, EnrichmentError> {
        let webhook_url = env::var("ENRICHMENT_WEBHOOK_URL").map_err(|_| {
            EnrichmentError::Configuration("ENRICHMENT_WEBHOOK_URL not set".to_string())
        })?;

        let timeout = env::var("ENRICHMENT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        Ok(Self {
            webhook_url,
            timeout,
        })
    }
}

/// The webhook body: an envelope around the persona submission.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichmentNotification {
    /// ISO-8601 send time.
    pub timestamp: String,
    /// Fixed source tag.
    pub source: &'static str,
    /// The submitted persona fields.
    pub data: PersonaSubmission,
}

/// Persona fields the enrichment workflow needs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaSubmission {
    pub persona_id: String,
    pub name: String,
    pub source_url: String,
    pub owner_id: String,
    pub created_at: String,
}

impl EnrichmentNotification {
    /// Build the notification for a freshly created persona row.
    pub fn for_persona(persona: &Persona) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            source: "hatch.ai",
            data: PersonaSubmission {
                persona_id: persona.id.clone(),
                name: persona.name.clone(),
                source_url: persona.source_url.clone(),
                owner_id: persona.owner_id.clone(),
                created_at: persona.created_at.clone(),
            },
        }
    }
}

/// Fires the one-way enrichment notification.
///
/// The creation flow does not block its success path on this call: a failed
/// notification is logged and swallowed by the caller, because missing
/// enrichment is detected later by the poller's timeout.
#[derive(Clone)]
pub struct EnrichmentTrigger {
    client: Client,
    config: TriggerConfig,
}

impl EnrichmentTrigger {
    /// Create a trigger with the given configuration.
    pub fn new(config: TriggerConfig) -> Result<Self, EnrichmentError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                EnrichmentError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    /// Create a trigger from environment variables.
    pub fn from_env() -> Result<Self, EnrichmentError> {
        Self::new(TriggerConfig::from_env()?)
    }

    /// Send the notification for one persona.
    pub async fn notify(&self, persona: &Persona) -> Result<(), EnrichmentError> {
        let payload = EnrichmentNotification::for_persona(persona);

        info!(
            persona_id = %persona.id,
            webhook = %self.config.webhook_url,
            "Triggering enrichment webhook"
        );

        let response = self
            .client
            .post(&self.config.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| EnrichmentError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EnrichmentError::WebhookStatus {
                status: status.as_u16(),
                message,
            });
        }

        debug!(persona_id = %persona.id, "Enrichment webhook accepted");
        Ok(())
    }
}
