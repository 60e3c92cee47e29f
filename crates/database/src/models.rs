//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// User UUID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email address (unique; the sign-in key).
    pub email: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// A persona row.
///
/// The three JSON-bearing columns are stored as TEXT and normalized by
/// `persona_core::raw` / `persona_core::Summary` on read; enrichment writes
/// them in inconsistent shapes, so raw column text is never trusted directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Persona {
    /// Persona UUID.
    pub id: String,
    /// Owning user id.
    pub owner_id: String,
    /// Display name of the person being emulated.
    pub name: String,
    /// External profile URL supplied at submission.
    pub source_url: String,
    /// Raw professional-profile document (JSON text), written by enrichment.
    pub profile_raw: Option<String>,
    /// Raw published-works document (JSON text), written by enrichment.
    pub articles_raw: Option<String>,
    /// Derived summary document (JSON text), written by synthesis.
    pub summary: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

/// One message in a conversation session. Insert-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ConversationTurn {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Persona the session belongs to.
    pub persona_id: String,
    /// Owning user id.
    pub owner_id: String,
    /// Session grouping id.
    pub session_id: String,
    /// True when the persona authored the message.
    pub by_ai: bool,
    /// Message text.
    pub message: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// Fields for inserting a new turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTurn<'a> {
    pub persona_id: &'a str,
    pub owner_id: &'a str,
    pub session_id: &'a str,
    pub by_ai: bool,
    pub message: &'a str,
}
