//! The derived-summary union.
//!
//! Two summary shapes exist in stored data depending on which synthesis path
//! produced the row: a structured extraction (bio, tone, expertise lists) and
//! a single free-text narrative with provenance. Consumers match on the
//! variant rather than assuming one shape.

use serde::{Deserialize, Serialize};

/// A structured persona summary (tag/list shape).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredSummary {
    /// 1-2 sentence bio.
    pub short_bio: String,
    /// Personality and communication style.
    #[serde(default)]
    pub personality_tone: Option<String>,
    /// Areas of expertise.
    #[serde(default)]
    pub expertise: Vec<String>,
    /// Characteristic phrases.
    #[serde(default)]
    pub common_phrases: Vec<String>,
    /// Writing/speaking style.
    #[serde(default)]
    pub writing_style: Option<String>,
    /// Topics the persona gravitates to.
    #[serde(default)]
    pub core_topics: Vec<String>,
    /// Sample replies in the persona's voice.
    #[serde(default)]
    pub example_responses: Vec<String>,
}

/// A narrative persona summary: the synthesizer's reply stored verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeSummary {
    /// The model reply, unmodified.
    pub profile: String,
    /// ISO-8601 synthesis time.
    pub synthesized_at: String,
    /// Provenance tag: generator name plus prompt fingerprint prefix.
    pub source: String,
}

/// The derived summary stored on a persona row.
///
/// Untagged: a document with a `profile` field deserializes as narrative,
/// a document with a `shortBio` field as structured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Summary {
    Narrative(NarrativeSummary),
    Structured(StructuredSummary),
}

impl Summary {
    /// Parse a summary from its stored TEXT form.
    ///
    /// Rows whose summary column does not hold either known shape count as
    /// not chat-ready, so this returns `None` rather than an error.
    pub fn from_stored(text: Option<&str>) -> Option<Self> {
        let text = text?;
        let summary: Summary = serde_json::from_str(text).ok()?;
        if summary.is_empty() {
            return None;
        }
        Some(summary)
    }

    /// Whether the summary carries no usable content.
    pub fn is_empty(&self) -> bool {
        match self {
            Summary::Narrative(n) => n.profile.trim().is_empty(),
            Summary::Structured(s) => s.short_bio.trim().is_empty(),
        }
    }

    /// Render the summary as plain text for prompt embedding.
    pub fn as_prompt_text(&self) -> String {
        match self {
            Summary::Narrative(n) => n.profile.clone(),
            Summary::Structured(s) => {
                serde_json::to_string_pretty(s).unwrap_or_else(|_| s.short_bio.clone())
            }
        }
    }
}
