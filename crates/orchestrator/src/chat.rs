//! Per-turn conversation orchestration.

use database::{conversation, NewTurn};
use persona_core::prompt::CHAT_TEMPERATURE;
use persona_core::{ChatMessage, CompletionRequest, PersonaDossier, PromptMode, Summary};
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::engine::{Identity, PersonaEngine};
use crate::error::OrchestratorError;

/// One transcript entry as supplied by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    /// "user" or "assistant".
    pub role: String,
    /// Message text.
    pub content: String,
}

/// A chat turn request: the running transcript plus the new human message
/// (the final entry, which must be user-authored).
#[derive(Debug, Clone)]
pub struct SendMessageRequest {
    /// Persona to converse with.
    pub persona_id: String,
    /// Ordered transcript, new human message last.
    pub messages: Vec<IncomingMessage>,
    /// Session to append to; the latest session is continued when absent.
    pub session_id: Option<String>,
}

/// The reply plus the session the exchange was logged under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    /// In-character AI reply.
    pub message: String,
    /// Session id the turns were appended to.
    pub session_id: String,
}

impl PersonaEngine {
    /// Produce the next in-character reply and append both turns to the log.
    ///
    /// The persona row is re-fetched on every call, so replies reflect the
    /// latest stored state even if synthesis re-ran mid-conversation. Nothing
    /// is persisted unless the completion call succeeds; on success the human
    /// turn is appended strictly before the AI turn.
    pub async fn send_message(
        &self,
        identity: &Identity,
        request: SendMessageRequest,
    ) -> Result<ChatReply, OrchestratorError> {
        let new_message = validate_transcript(&request.messages)?;

        let persona = self.fetch_owned(identity, &request.persona_id).await?;

        let summary = Summary::from_stored(persona.summary.as_deref())
            .ok_or_else(|| OrchestratorError::PersonaNotReady(persona.id.clone()))?;
        let enriched = self.require_raw(&persona)?;

        let dossier = PersonaDossier {
            name: persona.name.clone(),
            profile: enriched.profile,
            articles: enriched.articles,
            summary: Some(summary.as_prompt_text()),
        };

        let mut messages = vec![ChatMessage::system(dossier.instruction(PromptMode::Chat))];
        for entry in &request.messages {
            messages.push(ChatMessage {
                role: entry.role.clone(),
                content: entry.content.clone(),
            });
        }

        debug!(
            persona_id = %persona.id,
            transcript_len = request.messages.len(),
            "Requesting chat reply"
        );
        let reply = self
            .client
            .complete(CompletionRequest::new(messages, CHAT_TEMPERATURE))
            .await?;

        let session_id = match request.session_id {
            Some(session_id) => session_id,
            None => {
                match conversation::latest_session_id(self.db.pool(), &persona.id, &identity.user_id)
                    .await?
                {
                    Some(session_id) => session_id,
                    None => Uuid::new_v4().to_string(),
                }
            }
        };

        // Human first, AI second: a crash in between never logs an orphaned
        // AI reply without its prompt.
        conversation::insert_turn(
            self.db.pool(),
            &NewTurn {
                persona_id: &persona.id,
                owner_id: &identity.user_id,
                session_id: &session_id,
                by_ai: false,
                message: new_message,
            },
        )
        .await?;
        conversation::insert_turn(
            self.db.pool(),
            &NewTurn {
                persona_id: &persona.id,
                owner_id: &identity.user_id,
                session_id: &session_id,
                by_ai: true,
                message: &reply,
            },
        )
        .await?;

        info!(persona_id = %persona.id, session_id = %session_id, "Chat turn logged");
        Ok(ChatReply {
            message: reply,
            session_id,
        })
    }
}

/// Check the transcript shape and return the new human message.
fn validate_transcript(messages: &[IncomingMessage]) -> Result<&str, OrchestratorError> {
    let last = messages
        .last()
        .ok_or_else(|| OrchestratorError::Validation("messages cannot be empty".to_string()))?;

    for entry in messages {
        if entry.role != "user" && entry.role != "assistant" {
            return Err(OrchestratorError::Validation(format!(
                "unknown message role: {}",
                entry.role
            )));
        }
    }

    if last.role != "user" {
        return Err(OrchestratorError::Validation(
            "last message must be user-authored".to_string(),
        ));
    }
    if last.content.trim().is_empty() {
        return Err(OrchestratorError::Validation(
            "message cannot be empty".to_string(),
        ));
    }

    Ok(&last.content)
}
