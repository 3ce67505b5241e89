//! Blog model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    pub author: Option<String>,
    pub read_time: Option<String>,
    pub tags: Option<serde_json::Value>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBlog {
    #[validate(length(min = 1, max = 500, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,
    pub category: Option<String>,
    pub author: Option<String>,
    pub read_time: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub image_url: Option<String>,
}

impl Blog {
    pub async fn create(pool: &PgPool, data: CreateBlog) -> Result<Self, sqlx::Error> {
        let tags = serde_json::to_value(&data.tags).ok();

        sqlx::query_as::<_, Blog>(
            r#"
            INSERT INTO blogs (title, content, category, author, read_time, tags, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(&data.content)
        .bind(&data.category)
        .bind(&data.author)
        .bind(&data.read_time)
        .bind(&tags)
        .bind(&data.image_url)
        .fetch_one(pool)
        .await
    }

    pub async fn list(pool: &PgPool, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Blog>("SELECT * FROM blogs ORDER BY created_at DESC LIMIT $1")
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Blog>("SELECT * FROM blogs WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
