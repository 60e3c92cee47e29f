//! Bounded completion polling.

use std::env;
use std::future::Future;
use std::time::Duration;

use database::{persona, DatabaseError};
use serde_json::Value;
use sqlx::SqlitePool;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::error::EnrichmentError;

/// Polling cadence and budget.
///
/// Observed deployments vary these 3x-5x, so both knobs are configuration
/// rather than literals.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Fixed sleep before each fetch.
    pub interval: Duration,
    /// Retry budget.
    pub max_attempts: u32,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 20,
        }
    }
}

impl PollerConfig {
    /// Create configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `HATCH_POLL_INTERVAL_SECS` | Sleep between fetches | `5` |
    /// | `HATCH_POLL_MAX_ATTEMPTS` | Retry budget | `20` |
    pub fn from_env() -> Self {
        let interval = env::var("HATCH_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(5));

        let max_attempts = env::var("HATCH_POLL_MAX_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(20);

        Self {
            interval,
            max_attempts,
        }
    }

    /// Set the poll interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the retry budget.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

/// Both raw documents, normalized, plus the number of fetches it took.
#[derive(Debug, Clone, PartialEq)]
pub struct Enriched {
    /// Normalized professional-profile document.
    pub profile: Value,
    /// Normalized published-works document.
    pub articles: Value,
    /// Fetches consumed (1-based; remaining budget is untouched).
    pub attempts: u32,
}

/// Waits for the enrichment workflow to populate a persona's raw payload.
#[derive(Debug, Clone)]
pub struct CompletionPoller {
    config: PollerConfig,
}

impl CompletionPoller {
    /// Create a poller with the given configuration.
    pub fn new(config: PollerConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Block until both raw fields are present, or the budget runs out.
    pub async fn wait_ready(
        &self,
        pool: &SqlitePool,
        persona_id: &str,
    ) -> Result<Enriched, EnrichmentError> {
        self.wait_ready_with_shutdown(pool, persona_id, std::future::pending())
            .await
    }

    /// Like [`wait_ready`](Self::wait_ready), stopping early when the
    /// shutdown signal completes (e.g. the invoking context is torn down).
    pub async fn wait_ready_with_shutdown<S>(
        &self,
        pool: &SqlitePool,
        persona_id: &str,
        shutdown_signal: S,
    ) -> Result<Enriched, EnrichmentError>
    where
        S: Future<Output = ()> + Send,
    {
        debug!(
            persona_id = %persona_id,
            interval = ?self.config.interval,
            max_attempts = self.config.max_attempts,
            "Waiting for enrichment"
        );

        tokio::pin!(shutdown_signal);

        for attempt in 1..=self.config.max_attempts {
            tokio::select! {
                biased;

                () = &mut shutdown_signal => {
                    info!(persona_id = %persona_id, "Shutdown signal received, stopping poller");
                    return Err(EnrichmentError::Cancelled);
                }

                () = sleep(self.config.interval) => {}
            }

            match persona::get_persona(pool, persona_id).await {
                Ok(row) => {
                    let profile = persona_core::raw::normalize_text(row.profile_raw.as_deref());
                    let articles = persona_core::raw::normalize_text(row.articles_raw.as_deref());

                    if let (Some(profile), Some(articles)) = (profile, articles) {
                        info!(persona_id = %persona_id, attempts = attempt, "Enrichment complete");
                        return Ok(Enriched {
                            profile,
                            articles,
                            attempts: attempt,
                        });
                    }

                    debug!(persona_id = %persona_id, attempt, "Raw payload not ready yet");
                }
                // A missing row is replication lag, not a hard failure.
                Err(DatabaseError::NotFound { .. }) => {
                    debug!(persona_id = %persona_id, attempt, "Row not visible yet, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(EnrichmentError::Timeout {
            attempts: self.config.max_attempts,
        })
    }
}
