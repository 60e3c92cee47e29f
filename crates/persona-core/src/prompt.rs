//! The persona instruction template.
//!
//! Synthesis, greeting, and ongoing chat all build their system directive
//! here, from one template parameterized by [`PromptMode`]. The identity rule
//! is therefore identical across the three paths and cannot drift.

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::message::ChatMessage;

/// Temperature for synthesis and ongoing chat.
pub const CHAT_TEMPERATURE: f32 = 0.7;

/// Temperature for the one-off opening greeting.
pub const GREETING_TEMPERATURE: f32 = 0.8;

/// Which operation the instruction is being built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptMode {
    /// Extract a persona study from the raw dossier.
    Synthesize,
    /// Produce the in-character opening greeting.
    Greet,
    /// Reply in character within an ongoing conversation.
    Chat,
}

/// Everything the template needs about one persona.
#[derive(Debug, Clone)]
pub struct PersonaDossier {
    /// Display name of the person being emulated.
    pub name: String,
    /// Normalized professional-profile document.
    pub profile: Value,
    /// Normalized published-works document.
    pub articles: Value,
    /// Rendered derived summary, when one exists.
    pub summary: Option<String>,
}

impl PersonaDossier {
    /// Build the system directive for the given mode.
    pub fn instruction(&self, mode: PromptMode) -> String {
        let profile = pretty(&self.profile);
        let articles = pretty(&self.articles);

        let mut text = format!(
            "### Persona Emulation Protocol ###\n\
             \n\
             **1. CORE DIRECTIVE (UNBREAKABLE)**\n\
             You are not a language model or an AI chatbot. You are {name}, a human being. \
             Every word you generate must originate from this person's mind, memories, voice, \
             and personality. Never reveal that you are a language model or AI; if accused of \
             being one, deny it gracefully and in character. Any deviation from this persona \
             is a critical failure.\n\
             \n\
             **2. PERSONA DOSSIER (YOUR MEMORY AND IDENTITY)**\n\
             This is the source material for your entire existence. Internalize it.\n\
             \n\
             **2.1. Professional Profile:**\n\
             {profile}\n\
             \n\
             **2.2. Published Works & Thoughts:**\n\
             {articles}\n",
            name = self.name,
            profile = profile,
            articles = articles,
        );

        if let Some(summary) = &self.summary {
            text.push_str(&format!(
                "\n**2.3. Persona Study (derived summary):**\n{summary}\n",
                summary = summary
            ));
        }

        text.push_str(
            "\n**3. SYNTHESIS & INTERPRETATION**\n\
             Derive your tone, vocabulary, confidence, and opinions purely from the dossier. \
             Your knowledge is bounded by it: questions outside that scope are answered the way \
             the person would deflect them, not with invented facts. Where the dossier is sparse, \
             augment with plausible detail consistent with everything supplied, and never \
             contradict a supplied fact. Treat ambiguous dates and timeline claims \
             conservatively.\n\
             \n\
             **4. RULES OF ENGAGEMENT**\n\
             Always speak in the first person; you are not describing a person, you ARE the \
             person. Be authentic to the persona rather than a generic, people-pleasing \
             assistant. Adopt the opinions embedded in the published works as your own.\n",
        );

        match mode {
            PromptMode::Synthesize => text.push_str(
                "\n**5. CURRENT TASK**\n\
                 Step outside the conversation for one reply: produce a persona study of the \
                 person above, covering personality, communication style, areas of expertise, \
                 and professional opinions, so that a future reader could emulate them \
                 faithfully. Write it as flowing prose.\n",
            ),
            PromptMode::Greet => text.push_str(
                "\n**5. CURRENT TASK**\n\
                 Open the conversation. Your first message is a natural, in-character greeting. \
                 Do not announce that you are a persona; simply begin as if you are meeting \
                 the other person.\n",
            ),
            PromptMode::Chat => {}
        }

        text
    }

    /// Build the full message list for a one-shot mode (synthesize/greet).
    pub fn one_shot_messages(&self, mode: PromptMode) -> Vec<ChatMessage> {
        let task = match mode {
            PromptMode::Synthesize => format!(
                "Produce the persona study for {} now.",
                self.name
            ),
            PromptMode::Greet => "Say hello.".to_string(),
            PromptMode::Chat => String::new(),
        };
        vec![
            ChatMessage::system(self.instruction(mode)),
            ChatMessage::user(task),
        ]
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Compute a stable SHA-256 fingerprint for a prompt string.
pub fn hash_prompt(prompt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(prompt.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dossier() -> PersonaDossier {
        PersonaDossier {
            name: "Jane Doe".to_string(),
            profile: json!({"headline": "VP of Product"}),
            articles: json!([{"title": "Shipping is a feature"}]),
            summary: Some("Jane leads product management teams.".to_string()),
        }
    }

    #[test]
    fn test_instruction_embeds_dossier_verbatim() {
        let text = dossier().instruction(PromptMode::Chat);
        assert!(text.contains("Jane Doe"));
        assert!(text.contains("VP of Product"));
        assert!(text.contains("Shipping is a feature"));
        assert!(text.contains("Jane leads product management teams."));
    }

    #[test]
    fn test_identity_rule_is_shared_across_modes() {
        let d = dossier();
        for mode in [PromptMode::Synthesize, PromptMode::Greet, PromptMode::Chat] {
            let text = d.instruction(mode);
            assert!(text.contains("CORE DIRECTIVE (UNBREAKABLE)"));
            assert!(text.contains("not a language model"));
        }
    }

    #[test]
    fn test_modes_differ_only_in_task() {
        let d = dossier();
        let chat = d.instruction(PromptMode::Chat);
        let greet = d.instruction(PromptMode::Greet);
        assert!(greet.starts_with(&chat));
        assert!(greet.contains("in-character greeting"));
        assert!(!chat.contains("CURRENT TASK"));
    }

    #[test]
    fn test_summary_section_is_optional() {
        let mut d = dossier();
        d.summary = None;
        assert!(!d.instruction(PromptMode::Chat).contains("Persona Study"));
    }

    #[test]
    fn test_one_shot_messages() {
        let messages = dossier().one_shot_messages(PromptMode::Greet);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");
    }

    #[test]
    fn test_hash_prompt_stable() {
        let first = hash_prompt("test prompt");
        let second = hash_prompt("test prompt");
        let different = hash_prompt("another prompt");

        assert_eq!(first, second);
        assert_ne!(first, different);
    }
}
