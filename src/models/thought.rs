//! Thought model (floating notes from the mobile client)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Thought {
    pub id: Uuid,
    pub username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateThought {
    pub text: Option<String>,
}

impl Thought {
    pub async fn create(pool: &PgPool, username: &str, text: &str) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Thought>(
            r#"
            INSERT INTO thoughts (username, text)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(text)
        .fetch_one(pool)
        .await
    }

    pub async fn list(pool: &PgPool, username: &str, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Thought>(
            "SELECT * FROM thoughts WHERE username = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(username)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
