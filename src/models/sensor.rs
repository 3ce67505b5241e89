//! Sensor prediction records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Row};
use uuid::Uuid;
use validator::Validate;

use crate::ml::Prediction;

/// Persisted prediction result. Written once, never mutated.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SensorRecord {
    pub id: Uuid,
    pub username: String,
    pub nh3_ppm: f64,
    pub r: i32,
    pub g: i32,
    pub b: i32,
    pub label: String,
    pub food: String,
    pub status: String,
    pub confidence: f32,
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Incoming reading. Out-of-range values are rejected here, before the
/// model ever sees them.
#[derive(Debug, Deserialize, Validate)]
pub struct SensorReadingRequest {
    #[validate(range(min = 0.0, max = 1000.0, message = "nh3_ppm must be within 0..=1000"))]
    pub nh3_ppm: f64,
    #[validate(range(min = 0, max = 255, message = "r must be within 0..=255"))]
    pub r: i64,
    #[validate(range(min = 0, max = 255, message = "g must be within 0..=255"))]
    pub g: i64,
    #[validate(range(min = 0, max = 255, message = "b must be within 0..=255"))]
    pub b: i64,
}

impl SensorRecord {
    pub async fn create(
        pool: &PgPool,
        username: &str,
        reading: &SensorReadingRequest,
        prediction: &Prediction,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, SensorRecord>(
            r#"
            INSERT INTO sensor_readings (username, nh3_ppm, r, g, b, label, food, status, confidence)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(reading.nh3_ppm)
        .bind(reading.r as i32)
        .bind(reading.g as i32)
        .bind(reading.b as i32)
        .bind(&prediction.label)
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
        sqlx::query_as::<_, SensorRecord>(
            "SELECT * FROM sensor_readings WHERE username = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(username)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    pub async fn count_by_status(
        pool: &PgPool,
        username: &str,
        status: &str,
    ) -> Result<i64, sqlx::Error> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM sensor_readings WHERE username = $1 AND status = $2",
        )
        .bind(username)
        .bind(status)
        .fetch_one(pool)
        .await?;

        Ok(row.get::<i64, _>("count"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> serde_json::Value {
        serde_json::json!({"nh3_ppm": 120.0, "r": 200, "g": 180, "b": 50})
    }

    #[test]
    fn test_valid_reading_passes() {
        let req: SensorReadingRequest = serde_json::from_value(valid()).unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_missing_field_fails_deserialization() {
        let mut body = valid();
        body.as_object_mut().unwrap().remove("nh3_ppm");
        assert!(serde_json::from_value::<SensorReadingRequest>(body).is_err());
    }

    #[test]
    fn test_non_numeric_field_fails_deserialization() {
        let mut body = valid();
        body["r"] = serde_json::json!("high");
        assert!(serde_json::from_value::<SensorReadingRequest>(body).is_err());
    }

    #[test]
    fn test_out_of_range_channel_rejected() {
        let mut body = valid();
        body["g"] = serde_json::json!(300);
        let req: SensorReadingRequest = serde_json::from_value(body).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_negative_nh3_rejected() {
        let mut body = valid();
        body["nh3_ppm"] = serde_json::json!(-1.5);
        let req: SensorReadingRequest = serde_json::from_value(body).unwrap();
        assert!(req.validate().is_err());
    }
}
