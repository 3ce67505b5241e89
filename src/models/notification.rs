//! Notification model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub username: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateNotification {
    pub message: Option<String>,
}

impl Notification {
    pub async fn create(pool: &PgPool, username: &str, message: &str) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (username, message)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(message)
        .fetch_one(pool)
        .await
    }

    pub async fn list(pool: &PgPool, username: &str, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE username = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(username)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Returns true if a row was deleted
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
