//! Calendar handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use super::notify::CreatedResponse;
use crate::models::{CalendarEvent, CalendarFilter, CreateCalendarEvent};
use crate::{AppError, AppResult, AppState};

/// POST /calendar/add
pub async fn add(
    State(state): State<AppState>,
    payload: Result<Json<CreateCalendarEvent>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let Json(req) = payload?;
    req.validate()?;

    let event = CalendarEvent::create(&state.pool, &state.config.default_user, req).await?;
    tracing::info!("Calendar event added: {} ({})", event.id, event.title);

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            ok: true,
            id: event.id,
        }),
    ))
}

/// GET /calendar/events
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<CalendarFilter>,
) -> AppResult<Json<Vec<CalendarEvent>>> {
    let events = CalendarEvent::list(&state.pool, &state.config.default_user, filter).await?;
    Ok(Json(events))
}

/// DELETE /calendar/delete/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    if !CalendarEvent::delete(&state.pool, id).await? {
        return Err(AppError::NotFound(format!("Calendar event {} not found", id)));
    }
    Ok(Json(serde_json::json!({ "ok": true })))
}
