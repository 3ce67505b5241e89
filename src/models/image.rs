//! Image prediction records

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool, Row};
use uuid::Uuid;

use crate::ml::Prediction;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ImageRecord {
    pub id: Uuid,
    pub username: String,
    pub file_name: String,
    pub fruit: String,
    pub freshness: String,
    pub confidence: f32,
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ImageRecord {
    pub async fn create(
        pool: &PgPool,
        username: &str,
        file_name: &str,
        prediction: &Prediction,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, ImageRecord>(
            r#"
            INSERT INTO image_results (username, file_name, fruit, freshness, confidence)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(file_name)
        .bind(&prediction.food)
        .bind(prediction.status.as_str())
        .bind(prediction.confidence)
        .fetch_one(pool)
        .await
    }

    pub async fn recent(
        pool: &PgPool,
        username: &str,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, ImageRecord>(
            "SELECT * FROM image_results WHERE username = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(username)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    pub async fn count_by_status(
        pool: &PgPool,
        username: &str,
        freshness: &str,
    ) -> Result<i64, sqlx::Error> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM image_results WHERE username = $1 AND freshness = $2",
        )
        .bind(username)
        .bind(freshness)
        .fetch_one(pool)
        .await?;

        Ok(row.get::<i64, _>("count"))
    }
}
