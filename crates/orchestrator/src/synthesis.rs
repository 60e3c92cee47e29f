//! Persona synthesis: derived summary plus opening greeting.

use chrono::Utc;
use database::{conversation, persona, NewTurn, Persona};
use enrichment::Enriched;
use persona_core::prompt::{CHAT_TEMPERATURE, GREETING_TEMPERATURE};
use persona_core::{
    hash_prompt, CompletionRequest, NarrativeSummary, PersonaDossier, PromptMode, Summary,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::engine::PersonaEngine;
use crate::error::OrchestratorError;

impl PersonaEngine {
    /// Ask the model for a persona study and persist it as the summary.
    ///
    /// The reply is stored verbatim, with a synthesis timestamp and a
    /// provenance tag derived from the instruction fingerprint.
    pub(crate) async fn synthesize(
        &self,
        persona: &Persona,
        enriched: &Enriched,
    ) -> Result<NarrativeSummary, OrchestratorError> {
        let dossier = PersonaDossier {
            name: persona.name.clone(),
            profile: enriched.profile.clone(),
            articles: enriched.articles.clone(),
            summary: None,
        };

        let messages = dossier.one_shot_messages(PromptMode::Synthesize);
        let fingerprint = hash_prompt(&messages[0].content);

        debug!(persona_id = %persona.id, "Requesting persona study");
        let study = self
            .client
            .complete(CompletionRequest::new(messages, CHAT_TEMPERATURE))
            .await?;

        let summary = NarrativeSummary {
            profile: study,
            synthesized_at: Utc::now().to_rfc3339(),
            source: format!("synthesizer/{}", &fingerprint[..12]),
        };

        let value = serde_json::to_value(Summary::Narrative(summary.clone()))
            .map_err(database::DatabaseError::Json)?;
        persona::set_summary(self.db.pool(), &persona.id, &value).await?;

        info!(persona_id = %persona.id, source = %summary.source, "Summary persisted");
        Ok(summary)
    }

    /// Ask the model for the in-character opening greeting and log it as an
    /// AI-authored turn under a fresh session.
    ///
    /// Only called after the summary write has completed, so a persona is
    /// never observably "has greeting but no summary".
    pub(crate) async fn greet(
        &self,
        persona: &Persona,
        enriched: &Enriched,
        summary: &NarrativeSummary,
    ) -> Result<(String, String), OrchestratorError> {
        let dossier = PersonaDossier {
            name: persona.name.clone(),
            profile: enriched.profile.clone(),
            articles: enriched.articles.clone(),
            summary: Some(summary.profile.clone()),
        };

        let messages = dossier.one_shot_messages(PromptMode::Greet);
        let greeting = self
            .client
            .complete(CompletionRequest::new(messages, GREETING_TEMPERATURE))
            .await?;

        let session_id = Uuid::new_v4().to_string();
        conversation::insert_turn(
            self.db.pool(),
            &NewTurn {
                persona_id: &persona.id,
                owner_id: &persona.owner_id,
                session_id: &session_id,
                by_ai: true,
                message: &greeting,
            },
        )
        .await?;

        info!(persona_id = %persona.id, session_id = %session_id, "Greeting logged");
        Ok((greeting, session_id))
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::tests::test_engine;
    use crate::engine::{Identity, RetryPolicy};
    use database::{persona, user};
    use persona_core::prompt::{CHAT_TEMPERATURE, GREETING_TEMPERATURE};
    use serde_json::json;

    async fn enriched_persona(engine: &crate::PersonaEngine) -> String {
        persona::create_persona(
            engine.db().pool(),
            "p1",
            "owner-1",
            "Jane Doe",
            "https://linkedin.com/in/janedoe",
        )
        .await
        .unwrap();
        persona::set_raw_payload(
            engine.db().pool(),
            "p1",
            &json!({"headline": "VP of Product"}),
            &json!([{"title": "Shipping is a feature"}]),
        )
        .await
        .unwrap();
        "p1".to_string()
    }

    #[tokio::test]
    async fn test_initialize_uses_both_temperatures_and_embeds_dossier() {
        let (engine, client) = test_engine(RetryPolicy::KeepPartial).await;
        client.push_reply("The study.");
        client.push_reply("Hello!");

        let id = enriched_persona(&engine).await;
        let initialized = engine
            .initialize_persona(&Identity::new("owner-1"), &id)
            .await
            .unwrap();
        assert_eq!(initialized.greeting, "Hello!");

        let requests = client.requests();
        assert_eq!(requests.len(), 2);

        // Synthesis call: chat temperature, raw dossier embedded verbatim.
        assert_eq!(requests[0].temperature, CHAT_TEMPERATURE);
        let synthesis_text = requests[0].joined_content();
        assert!(synthesis_text.contains("VP of Product"));
        assert!(synthesis_text.contains("Shipping is a feature"));
        assert!(synthesis_text.contains("persona study"));

        // Greeting call: hotter, and carries the fresh study.
        assert_eq!(requests[1].temperature, GREETING_TEMPERATURE);
        let greet_text = requests[1].joined_content();
        assert!(greet_text.contains("The study."));
        assert!(greet_text.contains("in-character greeting"));
    }

    #[tokio::test]
    async fn test_reinitialize_overwrites_summary_and_starts_new_session() {
        let (engine, client) = test_engine(RetryPolicy::KeepPartial).await;
        client.push_reply("Study one.");
        client.push_reply("Greeting one.");
        client.push_reply("Study two.");
        client.push_reply("Greeting two.");

        let id = enriched_persona(&engine).await;
        let identity = Identity::new("owner-1");

        let first = engine.initialize_persona(&identity, &id).await.unwrap();
        let second = engine.initialize_persona(&identity, &id).await.unwrap();

        assert_ne!(first.session_id, second.session_id);

        let row = persona::get_persona(engine.db().pool(), &id).await.unwrap();
        let summary = row.summary.unwrap();
        assert!(summary.contains("Study two."));
        assert!(!summary.contains("Study one."));
    }

    #[tokio::test]
    async fn test_initialize_requires_raw_payload() {
        let (engine, _client) = test_engine(RetryPolicy::KeepPartial).await;
        user::get_user(engine.db().pool(), "owner-1").await.unwrap();
        persona::create_persona(
            engine.db().pool(),
            "bare",
            "owner-1",
            "Jane",
            "https://linkedin.com/in/janedoe",
        )
        .await
        .unwrap();

        let result = engine
            .initialize_persona(&Identity::new("owner-1"), "bare")
            .await;
        assert!(matches!(
            result,
            Err(crate::OrchestratorError::MissingRawData(_))
        ));
    }
}
