//! Sensor prediction handler
//!
//! The request pipeline: validate presence/type/range, scale, classify,
//! decode, persist, respond. Validation failures never reach the model or
//! the database.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use validator::Validate;

use crate::ml::FreshnessStatus;
use crate::models::{SensorReadingRequest, SensorRecord};
use crate::{AppResult, AppState};

#[derive(Debug, Serialize)]
pub struct SensorPredictionResponse {
    pub label: String,
    pub confidence: f32,
    pub food: String,
    pub status: FreshnessStatus,
}

/// POST /predict-sensor
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<SensorReadingRequest>, JsonRejection>,
) -> AppResult<Json<SensorPredictionResponse>> {
    let Json(reading) = payload?;
    reading.validate()?;

    let features = [
        reading.nh3_ppm as f32,
        reading.r as f32,
        reading.g as f32,
        reading.b as f32,
    ];
    let prediction = state.models.sensor.predict(features)?;

    let record = SensorRecord::create(
        &state.pool,
        &state.config.default_user,
        &reading,
        &prediction,
    )
    .await?;

    tracing::info!(
        "Sensor prediction {} ({:.3}) persisted as {}",
        prediction.label,
        prediction.confidence,
        record.id
    );

    Ok(Json(SensorPredictionResponse {
        label: prediction.label,
        confidence: prediction.confidence,
        food: prediction.food,
        status: prediction.status,
    }))
}
