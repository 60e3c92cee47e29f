//! Enrichment coordination for Hatch.
//!
//! The enrichment workflow is opaque and externally operated: this crate only
//! fires the outbound webhook that asks it to populate a persona's raw
//! payload ([`EnrichmentTrigger`]), then waits for those columns to appear by
//! re-reading the row on a fixed cadence ([`CompletionPoller`]). Polling is
//! the only coordination primitive available because there is no callback
//! channel from the workflow.
//!
//! # Example
//!
//! ```no_run
//! use database::Database;
//! use enrichment::{CompletionPoller, PollerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("sqlite:hatch.db?mode=rwc").await?;
//!
//! let poller = CompletionPoller::new(PollerConfig::default());
//! let enriched = poller.wait_ready(db.pool(), "persona-id").await?;
//! println!("ready after {} attempts", enriched.attempts);
//! # Ok(())
//! # }
//! ```

mod error;
mod poller;
mod trigger;

pub use error::EnrichmentError;
pub use poller::{CompletionPoller, Enriched, PollerConfig};
pub use trigger::{EnrichmentNotification, EnrichmentTrigger, TriggerConfig};
