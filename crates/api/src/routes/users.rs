//! Sign-in route.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use database::{user, validation};
use orchestrator::OrchestratorError;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::require_token;
use crate::error::Result;
use crate::state::AppState;

/// Sign-in request: the identity provider's resolved claims.
#[derive(Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub name: String,
}

/// Sign-in response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub user_id: String,
    pub name: String,
    pub email: String,
}

/// Upsert the user row as a side effect of sign-in.
///
/// First sign-in inserts; later sign-ins refresh the display name and keep
/// the original id.
pub async fn sign_in(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SignInRequest>,
) -> Result<Json<SignInResponse>> {
    require_token(&state, &headers)?;

    validation::validate_email(&request.email)
        .map_err(|e| OrchestratorError::Validation(e.to_string()))?;
    validation::validate_persona_name(&request.name)
        .map_err(|e| OrchestratorError::Validation(e.to_string()))?;

    let candidate_id = Uuid::new_v4().to_string();
    let user = user::upsert_user(
        state.db.pool(),
        &candidate_id,
        request.name.trim(),
        request.email.trim(),
    )
    .await?;

    info!(user_id = %user.id, "User signed in");
    Ok(Json(SignInResponse {
        user_id: user.id,
        name: user.name,
        email: user.email,
    }))
}
