//! Route definitions.

pub mod chat;
pub mod health;
pub mod personas;
pub mod users;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the application router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/v1/sign-in", post(users::sign_in))
        .route("/v1/personas", post(personas::create).get(personas::list))
        .route(
            "/v1/personas/:id",
            get(personas::get).delete(personas::delete),
        )
        .route("/v1/personas/:id/panels", post(personas::panels))
        .route("/v1/chat", post(chat::chat))
}
