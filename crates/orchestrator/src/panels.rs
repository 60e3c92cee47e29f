//! Panel generation: about, interests, and suggested questions.

use persona_core::prompt::CHAT_TEMPERATURE;
use persona_core::{ChatMessage, CompletionRequest, Summary};
use tracing::debug;

use crate::engine::{Identity, PersonaEngine};
use crate::error::OrchestratorError;

/// The three derived panels for a chat-ready persona.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaPanels {
    /// Single-paragraph introduction.
    pub about: String,
    /// Key interests, as the model returned them (a JSON array of strings).
    pub interests_raw: String,
    /// Suggested opening questions, as a numbered list.
    pub questions_raw: String,
}

impl PersonaEngine {
    /// Generate the about/interests/questions panels from the stored summary.
    ///
    /// The three completion calls run concurrently; nothing is persisted.
    pub async fn panels(
        &self,
        identity: &Identity,
        persona_id: &str,
    ) -> Result<PersonaPanels, OrchestratorError> {
        let persona = self.fetch_owned(identity, persona_id).await?;
        let summary = Summary::from_stored(persona.summary.as_deref())
            .ok_or_else(|| OrchestratorError::PersonaNotReady(persona.id.clone()))?;
        let summary_text = summary.as_prompt_text();

        let about_prompt = format!(
            "You are a professional biographer tasked with writing a concise, single-paragraph \
             introduction for a detailed character summary. Your output must be professional, \
             focused, and not exceed 75 words.\n\n\
             Based on the following persona summary, write a concise, compelling 'About' section \
             that captures their core identity, primary role, and key life context.\n\n\
             Persona Summary:\n---\n{summary_text}\n---"
        );

        let interests_prompt = format!(
            "You are a behavioral analyst. Your task is to analyze the following persona summary \
             and identify exactly 4 distinct and highly relevant key interests, hobbies, or \
             professional focus areas.\n\n\
             Format the response STRICTLY as a JSON array of strings. Do not include any \
             introductory or concluding text.\n\n\
             Example output: [\"Interest 1\", \"Interest 2\", \"Interest 3\", \"Interest 4\"]\n\n\
             Persona Summary:\n---\n{summary_text}\n---"
        );

        let questions_prompt = format!(
            "You are an expert interviewer and conversation starter. Based on the background and \
             details in the persona summary below, generate exactly 3 highly specific, \
             insightful, and open-ended questions that would lead to a deep, meaningful \
             conversation with this person.\n\n\
             Format the response STRICTLY as a numbered list (1., 2., 3.) without any \
             surrounding or concluding text.\n\n\
             Persona Summary:\n---\n{summary_text}\n---"
        );

        debug!(persona_id = %persona.id, "Generating persona panels");
        let (about, interests_raw, questions_raw) = tokio::join!(
            self.complete_prompt(about_prompt),
            self.complete_prompt(interests_prompt),
            self.complete_prompt(questions_prompt),
        );

        Ok(PersonaPanels {
            about: about?,
            interests_raw: interests_raw?,
            questions_raw: questions_raw?,
        })
    }

    async fn complete_prompt(&self, prompt: String) -> Result<String, OrchestratorError> {
        let request = CompletionRequest::new(vec![ChatMessage::user(prompt)], CHAT_TEMPERATURE);
        Ok(self.client.complete(request).await?)
    }
}
