//! Dashboard read handlers: scan stats and a merged history feed

use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::notify::ListQuery;
use crate::models::{ImageRecord, SensorRecord};
use crate::{AppResult, AppState};

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_scans: i64,
    pub fresh_count: i64,
    pub spoiled_count: i64,
}

/// GET /stats
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<StatsResponse>> {
    let user = &state.config.default_user;

    let fresh_count = SensorRecord::count_by_status(&state.pool, user, "Fresh").await?
        + ImageRecord::count_by_status(&state.pool, user, "Fresh").await?;
    let spoiled_count = SensorRecord::count_by_status(&state.pool, user, "Spoiled").await?
        + ImageRecord::count_by_status(&state.pool, user, "Spoiled").await?;

    Ok(Json(StatsResponse {
        total_scans: fresh_count + spoiled_count,
        fresh_count,
        spoiled_count,
    }))
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HistoryItem {
    Sensor {
        id: Uuid,
        food: String,
        status: String,
        nh3_ppm: f64,
        rgb: [i32; 3],
        confidence: f32,
        created_at: DateTime<Utc>,
    },
    Image {
        id: Uuid,
        food: String,
        status: String,
        confidence: f32,
        created_at: DateTime<Utc>,
    },
}

impl HistoryItem {
    fn created_at(&self) -> DateTime<Utc> {
        match self {
            Self::Sensor { created_at, .. } | Self::Image { created_at, .. } => *created_at,
        }
    }
}

/// GET /history: newest-first merge of sensor and image results
pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<HistoryItem>>> {
    let limit = query.limit.unwrap_or(30).clamp(1, 500);
    let user = &state.config.default_user;

    let sensors = SensorRecord::recent(&state.pool, user, limit).await?;
    let images = ImageRecord::recent(&state.pool, user, limit).await?;

    let mut items: Vec<HistoryItem> = sensors
        .into_iter()
        .map(|s| HistoryItem::Sensor {
            id: s.id,
            food: s.food,
            status: s.status,
            nh3_ppm: s.nh3_ppm,
            rgb: [s.r, s.g, s.b],
            confidence: s.confidence,
            created_at: s.created_at,
        })
        .chain(images.into_iter().map(|i| HistoryItem::Image {
            id: i.id,
            food: i.fruit,
            status: i.freshness,
            confidence: i.confidence,
            created_at: i.created_at,
        }))
        .collect();

    items.sort_by_key(|item| std::cmp::Reverse(item.created_at()));
    items.truncate(limit as usize);

    Ok(Json(items))
}
