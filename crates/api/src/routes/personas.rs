//! Persona routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use orchestrator::{CreatePersonaRequest, Persona, PersonaPanels};
use persona_core::Summary;
use serde::{Deserialize, Serialize};

use crate::auth::AuthedUser;
use crate::error::Result;
use crate::state::AppState;

/// Persona submission body.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    pub name: String,
    pub source_url: String,
}

/// A persona as presented to clients.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaDoc {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub source_url: String,
    pub created_at: String,
    pub chat_ready: bool,
    /// Whichever summary variant is stored, parsed; absent until synthesis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<serde_json::Value>,
}

impl From<Persona> for PersonaDoc {
    fn from(persona: Persona) -> Self {
        let summary = Summary::from_stored(persona.summary.as_deref())
            .and_then(|s| serde_json::to_value(s).ok());
        Self {
            id: persona.id,
            owner_id: persona.owner_id,
            name: persona.name,
            source_url: persona.source_url,
            created_at: persona.created_at,
            chat_ready: summary.is_some(),
            summary,
        }
    }
}

/// Creation response: the persona plus its opening greeting.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResponse {
    #[serde(flatten)]
    pub persona: PersonaDoc,
    pub greeting: String,
    pub session_id: String,
}

/// Panels response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelsResponse {
    pub about: String,
    pub interests_raw: String,
    pub questions_raw: String,
}

impl From<PersonaPanels> for PanelsResponse {
    fn from(panels: PersonaPanels) -> Self {
        Self {
            about: panels.about,
            interests_raw: panels.interests_raw,
            questions_raw: panels.questions_raw,
        }
    }
}

/// Run the full creation flow: insert, trigger, poll, synthesize, greet.
pub async fn create(
    State(state): State<AppState>,
    AuthedUser(identity): AuthedUser,
    Json(request): Json<CreateRequest>,
) -> Result<Json<CreateResponse>> {
    let created = state
        .engine
        .create_persona(
            &identity,
            CreatePersonaRequest {
                name: request.name,
                source_url: request.source_url,
            },
        )
        .await?;

    Ok(Json(CreateResponse {
        persona: created.persona.into(),
        greeting: created.greeting,
        session_id: created.session_id,
    }))
}

/// List the caller's personas.
pub async fn list(
    State(state): State<AppState>,
    AuthedUser(identity): AuthedUser,
) -> Result<Json<Vec<PersonaDoc>>> {
    let personas = state.engine.list_personas(&identity).await?;
    Ok(Json(personas.into_iter().map(PersonaDoc::from).collect()))
}

/// Fetch one persona.
pub async fn get(
    State(state): State<AppState>,
    AuthedUser(identity): AuthedUser,
    Path(id): Path<String>,
) -> Result<Json<PersonaDoc>> {
    let persona = state.engine.get_persona(&identity, &id).await?;
    Ok(Json(persona.into()))
}

/// Delete a persona and its conversation log.
pub async fn delete(
    State(state): State<AppState>,
    AuthedUser(identity): AuthedUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.engine.delete_persona(&identity, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Generate the about/interests/questions panels.
pub async fn panels(
    State(state): State<AppState>,
    AuthedUser(identity): AuthedUser,
    Path(id): Path<String>,
) -> Result<Json<PanelsResponse>> {
    let panels = state.engine.panels(&identity, &id).await?;
    Ok(Json(panels.into()))
}
