//! Request authentication.
//!
//! The real identity provider sits in front of this service; requests arrive
//! with a shared-secret bearer token plus the resolved user id in an
//! `x-user-id` header. Both are checked before any row is touched, and the
//! identity is threaded into engine calls as an explicit value.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use database::user;
use orchestrator::Identity;

use crate::error::ApiError;
use crate::state::AppState;

/// Verify the bearer token against the configured shared secret.
///
/// With no token configured the check is skipped (local development).
pub fn require_token(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(expected) = &state.api_token else {
        return Ok(());
    };

    let provided = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    if provided != Some(expected.as_str()) {
        return Err(ApiError::AuthenticationRequired);
    }

    Ok(())
}

/// Extractor yielding the authenticated identity.
pub struct AuthedUser(pub Identity);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_token(state, &parts.headers)?;

        let user_id = parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .ok_or(ApiError::AuthenticationRequired)?;

        // An unknown user id is a credential problem, not a lookup miss.
        user::get_user(state.db.pool(), user_id)
            .await
            .map_err(|_| ApiError::AuthenticationRequired)?;

        Ok(AuthedUser(Identity::new(user_id)))
    }
}
