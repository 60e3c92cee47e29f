//! The persona engine: creation, lookup, and deletion flows.

use std::env;
use std::future::Future;
use std::sync::Arc;

use database::{conversation, persona, user, validation, Database, Persona};
use enrichment::{CompletionPoller, EnrichmentTrigger};
use persona_core::CompletionClient;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{Disposition, OrchestratorError};

/// The signed-in identity an operation runs as.
///
/// Threaded explicitly into every call; the engine has no ambient auth state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// User id, as stored in the users table.
    pub user_id: String,
}

impl Identity {
    /// Create an identity for a user id.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// What to do with a partial persona row when the creation flow fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryPolicy {
    /// Leave the partial row for a manual retry.
    #[default]
    KeepPartial,
    /// Delete the partial row (and any turns) outright.
    DeletePartial,
}

impl RetryPolicy {
    /// Read the policy from `HATCH_RETRY_POLICY` (`keep` or `delete`).
    pub fn from_env() -> Self {
        match env::var("HATCH_RETRY_POLICY").as_deref() {
            Ok("delete") => RetryPolicy::DeletePartial,
            _ => RetryPolicy::KeepPartial,
        }
    }
}

/// A persona submission.
#[derive(Debug, Clone)]
pub struct CreatePersonaRequest {
    /// Display name of the person to emulate.
    pub name: String,
    /// External profile URL.
    pub source_url: String,
}

/// Result of a successful creation flow.
#[derive(Debug, Clone)]
pub struct CreatedPersona {
    /// The persona row, including the persisted summary.
    pub persona: Persona,
    /// The in-character opening greeting.
    pub greeting: String,
    /// Session the greeting was logged under.
    pub session_id: String,
    /// Fetches the completion poller consumed.
    pub poll_attempts: u32,
}

/// Result of re-running synthesis for an existing persona.
#[derive(Debug, Clone)]
pub struct Initialized {
    /// The fresh in-character greeting.
    pub greeting: String,
    /// Session the greeting was logged under.
    pub session_id: String,
}

/// Coordinates persona creation, synthesis, chat, and deletion.
pub struct PersonaEngine {
    pub(crate) db: Database,
    pub(crate) client: Arc<dyn CompletionClient>,
    trigger: Option<EnrichmentTrigger>,
    poller: CompletionPoller,
    retry_policy: RetryPolicy,
}

impl PersonaEngine {
    /// Create an engine over explicit handles.
    pub fn new(
        db: Database,
        client: Arc<dyn CompletionClient>,
        trigger: Option<EnrichmentTrigger>,
        poller: CompletionPoller,
        retry_policy: RetryPolicy,
    ) -> Self {
        info!(
            backend = client.name(),
            trigger_configured = trigger.is_some(),
            ?retry_policy,
            "Persona engine ready"
        );
        Self {
            db,
            client,
            trigger,
            poller,
            retry_policy,
        }
    }

    /// Get the database handle.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Run the full creation flow: insert, trigger, poll, synthesize, greet.
    pub async fn create_persona(
        &self,
        identity: &Identity,
        request: CreatePersonaRequest,
    ) -> Result<CreatedPersona, OrchestratorError> {
        self.create_persona_with_shutdown(identity, request, std::future::pending())
            .await
    }

    /// Like [`create_persona`](Self::create_persona), aborting the polling
    /// wait early when the shutdown signal completes.
    pub async fn create_persona_with_shutdown<S>(
        &self,
        identity: &Identity,
        request: CreatePersonaRequest,
        shutdown_signal: S,
    ) -> Result<CreatedPersona, OrchestratorError>
    where
        S: Future<Output = ()> + Send,
    {
        validation::validate_persona_name(&request.name)?;
        validation::validate_source_url(&request.source_url)?;
        user::get_user(self.db.pool(), &identity.user_id).await?;

        let persona_id = Uuid::new_v4().to_string();
        let persona = persona::create_persona(
            self.db.pool(),
            &persona_id,
            &identity.user_id,
            request.name.trim(),
            request.source_url.trim(),
        )
        .await?;
        info!(persona_id = %persona.id, name = %persona.name, "Persona created");

        // Fire-and-continue: enrichment is asynchronous by design, and its
        // absence surfaces later as a polling timeout.
        match &self.trigger {
            Some(trigger) => {
                if let Err(err) = trigger.notify(&persona).await {
                    warn!(persona_id = %persona.id, error = %err, "Enrichment trigger failed, continuing");
                }
            }
            None => debug!("No enrichment trigger configured"),
        }

        let enriched = match self
            .poller
            .wait_ready_with_shutdown(self.db.pool(), &persona.id, shutdown_signal)
            .await
        {
            Ok(enriched) => enriched,
            Err(err) => return Err(self.fail_creation(&persona.id, err.into(), false).await),
        };

        let summary = match self.synthesize(&persona, &enriched).await {
            Ok(summary) => summary,
            Err(err) => return Err(self.fail_creation(&persona.id, err, false).await),
        };

        // The summary is persisted; from here the row is chat-ready and is
        // never deleted on failure.
        let (greeting, session_id) = match self.greet(&persona, &enriched, &summary).await {
            Ok(result) => result,
            Err(err) => return Err(self.fail_creation(&persona.id, err, true).await),
        };

        let persona = persona::get_persona(self.db.pool(), &persona.id).await?;
        Ok(CreatedPersona {
            persona,
            greeting,
            session_id,
            poll_attempts: enriched.attempts,
        })
    }

    /// Re-run synthesis and greeting for an already-enriched persona.
    ///
    /// Overwrites the prior summary and appends a new greeting under a fresh
    /// session id; sessions are not deduplicated.
    pub async fn initialize_persona(
        &self,
        identity: &Identity,
        persona_id: &str,
    ) -> Result<Initialized, OrchestratorError> {
        let persona = self.fetch_owned(identity, persona_id).await?;
        let enriched = self.require_raw(&persona)?;

        let summary = self.synthesize(&persona, &enriched).await?;
        let (greeting, session_id) = self.greet(&persona, &enriched, &summary).await?;

        Ok(Initialized {
            greeting,
            session_id,
        })
    }

    /// A user's personas, newest first.
    pub async fn list_personas(
        &self,
        identity: &Identity,
    ) -> Result<Vec<Persona>, OrchestratorError> {
        Ok(persona::list_personas(self.db.pool(), &identity.user_id).await?)
    }

    /// One persona, owner-checked.
    pub async fn get_persona(
        &self,
        identity: &Identity,
        persona_id: &str,
    ) -> Result<Persona, OrchestratorError> {
        self.fetch_owned(identity, persona_id).await
    }

    /// Delete a persona and its conversation log.
    ///
    /// Turns are removed before the row itself, so a crash in between never
    /// leaves orphaned turns.
    pub async fn delete_persona(
        &self,
        identity: &Identity,
        persona_id: &str,
    ) -> Result<(), OrchestratorError> {
        let persona = self.fetch_owned(identity, persona_id).await?;

        let removed = conversation::delete_for_persona(self.db.pool(), &persona.id).await?;
        persona::delete_persona(self.db.pool(), &persona.id).await?;

        info!(persona_id = %persona.id, turns_removed = removed, "Persona deleted");
        Ok(())
    }

    /// Fetch a persona and verify ownership.
    ///
    /// A persona owned by someone else reads as not-found, so ids do not leak
    /// across users.
    pub(crate) async fn fetch_owned(
        &self,
        identity: &Identity,
        persona_id: &str,
    ) -> Result<Persona, OrchestratorError> {
        let persona = persona::get_persona(self.db.pool(), persona_id).await?;
        if persona.owner_id != identity.user_id {
            return Err(database::DatabaseError::NotFound {
                entity: "Persona",
                id: persona_id.to_string(),
            }
            .into());
        }
        Ok(persona)
    }

    /// Normalize both raw documents off a row, or fail with MissingRawData.
    pub(crate) fn require_raw(
        &self,
        persona: &Persona,
    ) -> Result<enrichment::Enriched, OrchestratorError> {
        let profile = persona_core::raw::normalize_text(persona.profile_raw.as_deref());
        let articles = persona_core::raw::normalize_text(persona.articles_raw.as_deref());

        match (profile, articles) {
            (Some(profile), Some(articles)) => Ok(enrichment::Enriched {
                profile,
                articles,
                attempts: 0,
            }),
            _ => Err(OrchestratorError::MissingRawData(persona.id.clone())),
        }
    }

    /// Apply the retry policy to a failed creation flow.
    async fn fail_creation(
        &self,
        persona_id: &str,
        source: OrchestratorError,
        summary_persisted: bool,
    ) -> OrchestratorError {
        let disposition = match self.retry_policy {
            RetryPolicy::DeletePartial if !summary_persisted => {
                let turns = conversation::delete_for_persona(self.db.pool(), persona_id).await;
                let row = persona::delete_persona(self.db.pool(), persona_id).await;
                match (turns, row) {
                    (Ok(_), Ok(())) => Disposition::Deleted,
                    (turns, row) => {
                        warn!(
                            persona_id = %persona_id,
                            turns_ok = turns.is_ok(),
                            row_ok = row.is_ok(),
                            "Failed to delete partial persona, leaving it in place"
                        );
                        Disposition::Kept
                    }
                }
            }
            _ => Disposition::Kept,
        };

        warn!(
            persona_id = %persona_id,
            %disposition,
            error = %source,
            "Persona creation failed"
        );

        OrchestratorError::CreationFailed {
            persona_id: persona_id.to_string(),
            disposition,
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use database::{conversation, persona, user};
    use persona_core::ScriptedClient;
    use serde_json::json;
    use std::time::Duration;

    use enrichment::PollerConfig;

    pub(crate) async fn test_engine(policy: RetryPolicy) -> (PersonaEngine, Arc<ScriptedClient>) {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1).await.unwrap();
        db.migrate().await.unwrap();
        user::upsert_user(db.pool(), "owner-1", "Alice", "alice@example.com")
            .await
            .unwrap();

        let client = Arc::new(ScriptedClient::new());
        let poller = CompletionPoller::new(
            PollerConfig::default()
                .with_interval(Duration::from_millis(40))
                .with_max_attempts(4),
        );
        let engine = PersonaEngine::new(db, client.clone(), None, poller, policy);
        (engine, client)
    }

    fn identity() -> Identity {
        Identity::new("owner-1")
    }

    fn request() -> CreatePersonaRequest {
        CreatePersonaRequest {
            name: "Jane Doe".to_string(),
            source_url: "https://linkedin.com/in/janedoe".to_string(),
        }
    }

    /// Populate the newest persona's raw columns after a delay, emulating the
    /// external workflow.
    fn spawn_enricher(engine: &PersonaEngine, delay: Duration) {
        let pool = engine.db.pool().clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let rows = persona::list_personas(&pool, "owner-1").await.unwrap();
            for row in rows {
                persona::set_raw_payload(
                    &pool,
                    &row.id,
                    &json!({"headline": "VP of Product"}),
                    &json!([{"title": "Shipping is a feature"}]),
                )
                .await
                .unwrap();
            }
        });
    }

    #[tokio::test]
    async fn test_create_flow_end_to_end() {
        let (engine, client) = test_engine(RetryPolicy::KeepPartial).await;
        client.push_reply("Jane is a product leader who writes plainly.");
        client.push_reply("Hi, I'm Jane. What shall we dig into?");

        // Raw payload lands while the second poll sleep is in flight.
        spawn_enricher(&engine, Duration::from_millis(60));

        let created = engine
            .create_persona(&identity(), request())
            .await
            .unwrap();

        assert_eq!(created.poll_attempts, 2);
        assert_eq!(created.greeting, "Hi, I'm Jane. What shall we dig into?");

        // Synthesis ran exactly once: one study call plus one greeting call.
        assert_eq!(client.call_count(), 2);

        // Summary persisted before the greeting, with provenance.
        let summary = created.persona.summary.unwrap();
        assert!(summary.contains("product leader"));
        assert!(summary.contains("synthesizer/"));

        // Exactly one AI-authored greeting turn under a fresh session.
        let turns = conversation::list_turns(engine.db.pool(), &created.session_id)
            .await
            .unwrap();
        assert_eq!(turns.len(), 1);
        assert!(turns[0].by_ai);
        assert_eq!(turns[0].message, created.greeting);
    }

    #[tokio::test]
    async fn test_create_requires_known_user() {
        let (engine, _client) = test_engine(RetryPolicy::KeepPartial).await;

        let result = engine
            .create_persona(&Identity::new("stranger"), request())
            .await;
        assert!(matches!(
            result,
            Err(OrchestratorError::Database(
                database::DatabaseError::NotFound { .. }
            ))
        ));

        // No persona row was created.
        let personas = persona::list_personas(engine.db.pool(), "stranger")
            .await
            .unwrap();
        assert!(personas.is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input_before_any_row() {
        let (engine, _client) = test_engine(RetryPolicy::KeepPartial).await;

        let result = engine
            .create_persona(
                &identity(),
                CreatePersonaRequest {
                    name: " ".to_string(),
                    source_url: "https://linkedin.com/in/janedoe".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(OrchestratorError::Validation(_))));

        let result = engine
            .create_persona(
                &identity(),
                CreatePersonaRequest {
                    name: "Jane".to_string(),
                    source_url: "ftp://nope".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(OrchestratorError::Validation(_))));

        assert!(persona::list_personas(engine.db.pool(), "owner-1")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_poll_timeout_keeps_partial_row_by_default() {
        let (engine, _client) = test_engine(RetryPolicy::KeepPartial).await;

        let err = engine
            .create_persona(&identity(), request())
            .await
            .unwrap_err();

        match err {
            OrchestratorError::CreationFailed {
                persona_id,
                disposition,
                source,
            } => {
                assert_eq!(disposition, Disposition::Kept);
                assert!(matches!(
                    *source,
                    OrchestratorError::Enrichment(enrichment::EnrichmentError::Timeout {
                        attempts: 4
                    })
                ));
                // The partial row survives for retry.
                assert!(persona::get_persona(engine.db.pool(), &persona_id)
                    .await
                    .is_ok());
            }
            other => panic!("expected CreationFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_poll_timeout_deletes_partial_row_when_configured() {
        let (engine, _client) = test_engine(RetryPolicy::DeletePartial).await;

        let err = engine
            .create_persona(&identity(), request())
            .await
            .unwrap_err();

        match err {
            OrchestratorError::CreationFailed {
                persona_id,
                disposition,
                ..
            } => {
                assert_eq!(disposition, Disposition::Deleted);
                assert!(matches!(
                    persona::get_persona(engine.db.pool(), &persona_id).await,
                    Err(database::DatabaseError::NotFound { .. })
                ));
            }
            other => panic!("expected CreationFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_synthesis_failure_never_leaves_greeting_without_summary() {
        let (engine, client) = test_engine(RetryPolicy::KeepPartial).await;
        client.push_error(persona_core::CompletionError::Status {
            status: 502,
            message: "bad gateway".to_string(),
        });

        spawn_enricher(&engine, Duration::from_millis(5));

        let err = engine
            .create_persona(&identity(), request())
            .await
            .unwrap_err();

        let persona_id = match err {
            OrchestratorError::CreationFailed { persona_id, .. } => persona_id,
            other => panic!("expected CreationFailed, got {:?}", other),
        };

        // Only the synthesis call happened; no greeting was attempted.
        assert_eq!(client.call_count(), 1);

        let row = persona::get_persona(engine.db.pool(), &persona_id)
            .await
            .unwrap();
        assert!(row.summary.is_none());
    }

    #[tokio::test]
    async fn test_greeting_failure_keeps_chat_ready_row() {
        let (engine, client) = test_engine(RetryPolicy::DeletePartial).await;
        client.push_reply("The study.");
        client.push_error(persona_core::CompletionError::Network("down".to_string()));

        spawn_enricher(&engine, Duration::from_millis(5));

        let err = engine
            .create_persona(&identity(), request())
            .await
            .unwrap_err();

        match err {
            OrchestratorError::CreationFailed {
                persona_id,
                disposition,
                ..
            } => {
                // Even under DeletePartial: the summary is already persisted,
                // so the row is chat-ready and stays.
                assert_eq!(disposition, Disposition::Kept);
                let row = persona::get_persona(engine.db.pool(), &persona_id)
                    .await
                    .unwrap();
                assert!(row.summary.is_some());
            }
            other => panic!("expected CreationFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_removes_turns_before_row() {
        let (engine, client) = test_engine(RetryPolicy::KeepPartial).await;
        client.push_reply("The study.");
        client.push_reply("Hello there.");

        spawn_enricher(&engine, Duration::from_millis(5));

        let created = engine
            .create_persona(&identity(), request())
            .await
            .unwrap();
        let persona_id = created.persona.id.clone();

        engine.delete_persona(&identity(), &persona_id).await.unwrap();

        assert!(conversation::list_turns(engine.db.pool(), &created.session_id)
            .await
            .unwrap()
            .is_empty());
        assert!(matches!(
            engine.get_persona(&identity(), &persona_id).await,
            Err(OrchestratorError::Database(
                database::DatabaseError::NotFound { .. }
            ))
        ));
    }

    #[tokio::test]
    async fn test_other_owners_personas_read_as_not_found() {
        let (engine, client) = test_engine(RetryPolicy::KeepPartial).await;
        client.push_reply("The study.");
        client.push_reply("Hello there.");
        spawn_enricher(&engine, Duration::from_millis(5));

        let created = engine
            .create_persona(&identity(), request())
            .await
            .unwrap();

        user::upsert_user(engine.db.pool(), "owner-2", "Bob", "bob@example.com")
            .await
            .unwrap();
        let result = engine
            .get_persona(&Identity::new("owner-2"), &created.persona.id)
            .await;
        assert!(matches!(
            result,
            Err(OrchestratorError::Database(
                database::DatabaseError::NotFound { .. }
            ))
        ));
    }
}
