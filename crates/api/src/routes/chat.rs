//! The chat entry point.

use axum::extract::State;
use axum::Json;
use orchestrator::{IncomingMessage, SendMessageRequest};
use serde::{Deserialize, Serialize};

use crate::auth::AuthedUser;
use crate::error::Result;
use crate::state::AppState;

/// Chat request.
///
/// An empty `messages` array signals "initialize this persona" (re-run
/// synthesis and greet); a non-empty array continues the conversation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub persona_id: String,
    #[serde(default)]
    pub messages: Vec<IncomingMessage>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Chat response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub message: String,
    pub session_id: String,
}

/// Dispatch a chat call to initialization or conversation.
pub async fn chat(
    State(state): State<AppState>,
    AuthedUser(identity): AuthedUser,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    if request.messages.is_empty() {
        let initialized = state
            .engine
            .initialize_persona(&identity, &request.persona_id)
            .await?;
        return Ok(Json(ChatResponse {
            message: initialized.greeting,
            session_id: initialized.session_id,
        }));
    }

    let reply = state
        .engine
        .send_message(
            &identity,
            SendMessageRequest {
                persona_id: request.persona_id,
                messages: request.messages,
                session_id: request.session_id,
            },
        )
        .await?;

    Ok(Json(ChatResponse {
        message: reply.message,
        session_id: reply.session_id,
    }))
}
