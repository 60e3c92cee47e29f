//! Conversation turn persistence.
//!
//! Turns are insert-only and ordered by creation time (id breaks ties within
//! the same second). The human/AI ordering invariant is the orchestrator's
//! job; this module only appends and reads.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::{ConversationTurn, NewTurn};

/// Append one turn and return its row id.
pub async fn insert_turn(pool: &SqlitePool, turn: &NewTurn<'_>) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO conversations (persona_id, owner_id, session_id, by_ai, message)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(turn.persona_id)
    .bind(turn.owner_id)
    .bind(turn.session_id)
    .bind(turn.by_ai)
    .bind(turn.message)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// All turns of one session, oldest first.
pub async fn list_turns(pool: &SqlitePool, session_id: &str) -> Result<Vec<ConversationTurn>> {
    let turns = sqlx::query_as::<_, ConversationTurn>(
        r#"
        SELECT id, persona_id, owner_id, session_id, by_ai, message, created_at
        FROM conversations
        WHERE session_id = ?
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?;

    Ok(turns)
}

/// The most recently started session for a persona/owner pair, if any.
pub async fn latest_session_id(
    pool: &SqlitePool,
    persona_id: &str,
    owner_id: &str,
) -> Result<Option<String>> {
    let session_id = sqlx::query_scalar::<_, String>(
        r#"
        SELECT session_id
        FROM conversations
        WHERE persona_id = ? AND owner_id = ?
        ORDER BY created_at DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(persona_id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;

    Ok(session_id)
}

/// Delete all turns referencing a persona. Returns the number removed.
pub async fn delete_for_persona(pool: &SqlitePool, persona_id: &str) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM conversations
        WHERE persona_id = ?
        "#,
    )
    .bind(persona_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
