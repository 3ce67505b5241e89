//! Calendar event model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CalendarEvent {
    pub id: Uuid,
    pub username: String,
    pub title: String,
    pub start_at: DateTime<Utc>,
    pub end_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCalendarEvent {
    #[validate(length(min = 1, max = 500, message = "title is required"))]
    pub title: String,
    pub start_at: DateTime<Utc>,
    pub end_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct CalendarFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
}

impl CalendarEvent {
    pub async fn create(
        pool: &PgPool,
        username: &str,
        data: CreateCalendarEvent,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, CalendarEvent>(
            r#"
            INSERT INTO calendar_events (username, title, start_at, end_at, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(&data.title)
        .bind(data.start_at)
        .bind(data.end_at)
        .bind(&data.notes)
        .fetch_one(pool)
        .await
    }

    pub async fn list(
        pool: &PgPool,
        username: &str,
        filter: CalendarFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let limit = filter.limit.unwrap_or(100).min(1000);

        sqlx::query_as::<_, CalendarEvent>(
            r#"
            SELECT * FROM calendar_events
            WHERE username = $1
              AND ($2::timestamptz IS NULL OR start_at >= $2)
              AND ($3::timestamptz IS NULL OR start_at <= $3)
            ORDER BY start_at DESC
            LIMIT $4
            "#,
        )
        .bind(username)
        .bind(filter.from)
        .bind(filter.to)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM calendar_events WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
