//! Expense model (the mobile app's food-waste calculator records)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Row};
use uuid::Uuid;
use validator::Validate;

/// Record kinds accepted by the calculator
pub const EXPENSE_KINDS: [&str; 2] = ["entry", "bonus"];

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Expense {
    pub id: Uuid,
    pub username: String,
    pub food: String,
    pub amount: f64,
    pub kind: String,
    pub spent_on: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateExpense {
    #[validate(length(min = 1, max = 255, message = "food is required"))]
    pub food: String,
    #[validate(range(min = 0.0, message = "amount must be non-negative"))]
    pub amount: f64,
    pub kind: String,
    #[validate(length(min = 1, max = 50, message = "spent_on is required"))]
    pub spent_on: String,
}

#[derive(Debug, Serialize)]
pub struct ExpenseSummary {
    pub total: f64,
    pub entry_total: f64,
    pub bonus_total: f64,
    pub record_count: i64,
}

impl Expense {
    pub async fn create(
        pool: &PgPool,
        username: &str,
        data: CreateExpense,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Expense>(
            r#"
            INSERT INTO expenses (username, food, amount, kind, spent_on)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(&data.food)
        .bind(data.amount)
        .bind(&data.kind)
        .bind(&data.spent_on)
        .fetch_one(pool)
        .await
    }

    pub async fn list(pool: &PgPool, username: &str, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Expense>(
            "SELECT * FROM expenses WHERE username = $1 ORDER BY spent_on DESC, created_at DESC LIMIT $2",
        )
        .bind(username)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    pub async fn summary(pool: &PgPool, username: &str) -> Result<ExpenseSummary, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT
                COALESCE(SUM(amount), 0) AS total,
                COALESCE(SUM(amount) FILTER (WHERE kind = 'entry'), 0) AS entry_total,
                COALESCE(SUM(amount) FILTER (WHERE kind = 'bonus'), 0) AS bonus_total,
                COUNT(*) AS record_count
            FROM expenses
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_one(pool)
        .await?;

        Ok(ExpenseSummary {
            total: row.get::<f64, _>("total"),
            entry_total: row.get::<f64, _>("entry_total"),
            bonus_total: row.get::<f64, _>("bonus_total"),
            record_count: row.get::<i64, _>("record_count"),
        })
    }
}
