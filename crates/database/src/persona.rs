//! Persona CRUD operations.

use serde_json::Value;
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::Persona;

/// Create a bare persona (name + source only) and return the stored row.
pub async fn create_persona(
    pool: &SqlitePool,
    id: &str,
    owner_id: &str,
    name: &str,
    source_url: &str,
) -> Result<Persona> {
    sqlx::query(
        r#"
        INSERT INTO personas (id, owner_id, name, source_url)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(owner_id)
    .bind(name)
    .bind(source_url)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "Persona",
                    id: id.to_string(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    get_persona(pool, id).await
}

/// Get a persona by ID.
pub async fn get_persona(pool: &SqlitePool, id: &str) -> Result<Persona> {
    sqlx::query_as::<_, Persona>(
        r#"
        SELECT id, owner_id, name, source_url, profile_raw, articles_raw, summary, created_at
        FROM personas
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Persona",
        id: id.to_string(),
    })
}

/// List a user's personas, newest first.
pub async fn list_personas(pool: &SqlitePool, owner_id: &str) -> Result<Vec<Persona>> {
    let personas = sqlx::query_as::<_, Persona>(
        r#"
        SELECT id, owner_id, name, source_url, profile_raw, articles_raw, summary, created_at
        FROM personas
        WHERE owner_id = ?
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(personas)
}

/// Write both raw enrichment documents onto a persona row.
pub async fn set_raw_payload(
    pool: &SqlitePool,
    id: &str,
    profile: &Value,
    articles: &Value,
) -> Result<()> {
    let profile_text = serde_json::to_string(profile)?;
    let articles_text = serde_json::to_string(articles)?;

    let result = sqlx::query(
        r#"
        UPDATE personas
        SET profile_raw = ?, articles_raw = ?
        WHERE id = ?
        "#,
    )
    .bind(profile_text)
    .bind(articles_text)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Persona",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Write the derived summary onto a persona row.
pub async fn set_summary(pool: &SqlitePool, id: &str, summary: &Value) -> Result<()> {
    let summary_text = serde_json::to_string(summary)?;

    let result = sqlx::query(
        r#"
        UPDATE personas
        SET summary = ?
        WHERE id = ?
        "#,
    )
    .bind(summary_text)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Persona",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Delete a persona row.
///
/// Dependent conversation rows must be deleted first; the foreign key
/// constraint rejects the delete otherwise.
pub async fn delete_persona(pool: &SqlitePool, id: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM personas
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Persona",
            id: id.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{user, Database};
    use serde_json::json;

    async fn test_db() -> Database {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1).await.unwrap();
        db.migrate().await.unwrap();
        user::upsert_user(db.pool(), "owner-1", "Alice", "alice@example.com")
            .await
            .unwrap();
        db
    }

    #[tokio::test]
    async fn test_duplicate_id_is_already_exists() {
        let db = test_db().await;
        create_persona(db.pool(), "p1", "owner-1", "Jane", "https://example.com/jane")
            .await
            .unwrap();
        let result =
            create_persona(db.pool(), "p1", "owner-1", "Jane", "https://example.com/jane").await;
        assert!(matches!(
            result,
            Err(DatabaseError::AlreadyExists { entity: "Persona", .. })
        ));
    }

    #[tokio::test]
    async fn test_list_is_owner_scoped() {
        let db = test_db().await;
        user::upsert_user(db.pool(), "owner-2", "Bob", "bob@example.com")
            .await
            .unwrap();
        create_persona(db.pool(), "p1", "owner-1", "Jane", "https://example.com/jane")
            .await
            .unwrap();
        create_persona(db.pool(), "p2", "owner-2", "John", "https://example.com/john")
            .await
            .unwrap();

        let personas = list_personas(db.pool(), "owner-1").await.unwrap();
        assert_eq!(personas.len(), 1);
        assert_eq!(personas[0].id, "p1");
    }

    #[tokio::test]
    async fn test_set_raw_payload_on_missing_row() {
        let db = test_db().await;
        let result =
            set_raw_payload(db.pool(), "missing", &json!({"a": 1}), &json!([1])).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }
}
