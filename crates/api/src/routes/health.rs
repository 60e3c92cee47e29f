//! Health check route.

use axum::Json;
use serde::Serialize;

/// Health response.
#[derive(Serialize)]
pub struct Health {
    status: &'static str,
}

/// Liveness probe.
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}
