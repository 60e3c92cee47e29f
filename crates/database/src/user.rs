//! User operations.
//!
//! Users are keyed by email at sign-in time: the first sign-in inserts the
//! row (using the caller-supplied candidate id), later sign-ins refresh the
//! display name and keep the original id.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::User;

/// Upsert a user by email and return the stored row.
pub async fn upsert_user(
    pool: &SqlitePool,
    candidate_id: &str,
    name: &str,
    email: &str,
) -> Result<User> {
    sqlx::query(
        r#"
        INSERT INTO users (id, name, email)
        VALUES (?, ?, ?)
        ON CONFLICT(email) DO UPDATE SET name = excluded.name
        "#,
    )
    .bind(candidate_id)
    .bind(name)
    .bind(email)
    .execute(pool)
    .await?;

    get_user_by_email(pool, email).await
}

/// Get a user by ID.
pub async fn get_user(pool: &SqlitePool, id: &str) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "User",
        id: id.to_string(),
    })
}

/// Get a user by email.
pub async fn get_user_by_email(pool: &SqlitePool, email: &str) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, created_at
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "User",
        id: email.to_string(),
    })
}
