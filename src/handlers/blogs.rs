//! Blog handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use super::notify::{CreatedResponse, ListQuery};
use crate::models::{Blog, CreateBlog};
use crate::{AppError, AppResult, AppState};

/// POST /blogs/add
pub async fn add(
    State(state): State<AppState>,
    payload: Result<Json<CreateBlog>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let Json(req) = payload?;
    req.validate()?;

    let blog = Blog::create(&state.pool, req).await?;
    tracing::info!("Blog added: {} ({})", blog.id, blog.title);

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            ok: true,
            id: blog.id,
        }),
    ))
}

/// GET /blogs/list
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Blog>>> {
    let limit = query.limit.unwrap_or(50).clamp(1, 500);
    let blogs = Blog::list(&state.pool, limit).await?;
    Ok(Json(blogs))
}

/// GET /blogs/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Blog>> {
    let blog = Blog::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Blog {} not found", id)))?;
    Ok(Json(blog))
}

/// DELETE /blogs/delete/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    if !Blog::delete(&state.pool, id).await? {
        return Err(AppError::NotFound(format!("Blog {} not found", id)));
    }
    Ok(Json(serde_json::json!({ "ok": true })))
}
