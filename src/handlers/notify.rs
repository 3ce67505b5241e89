//! Notification handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{CreateNotification, Notification};
use crate::{AppError, AppResult, AppState};

#[derive(Debug, Deserialize, Default)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub ok: bool,
    pub id: Uuid,
}

/// POST /notify
pub async fn add(
    State(state): State<AppState>,
    payload: Result<Json<CreateNotification>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let Json(req) = payload?;
    let message = req
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| AppError::ValidationError("message is required".to_string()))?;

    let notification = Notification::create(&state.pool, &state.config.default_user, message).await?;
    tracing::info!("Notification added: {}", notification.id);

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            ok: true,
            id: notification.id,
        }),
    ))
}

/// GET /notifications
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Notification>>> {
    let limit = clamp_limit(query.limit, 50, 500);
    let items = Notification::list(&state.pool, &state.config.default_user, limit).await?;
    Ok(Json(items))
}

/// DELETE /notifications/:id
///
/// Idempotent in the CRUD sense: deleting an id that is already gone is a
/// 404, not a failure.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    if !Notification::delete(&state.pool, id).await? {
        return Err(AppError::NotFound(format!("Notification {} not found", id)));
    }
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_limit_defaults_and_caps() {
        assert_eq!(clamp_limit(None, 50, 500), 50);
        assert_eq!(clamp_limit(Some(10), 50, 500), 10);
        assert_eq!(clamp_limit(Some(9999), 50, 500), 500);
        assert_eq!(clamp_limit(Some(0), 50, 500), 1);
        assert_eq!(clamp_limit(Some(-5), 50, 500), 1);
    }
}
