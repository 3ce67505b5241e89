//! Expense handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use super::notify::{CreatedResponse, ListQuery};
use crate::models::{CreateExpense, Expense, ExpenseSummary, EXPENSE_KINDS};
use crate::{AppError, AppResult, AppState};

/// POST /expenses/add
pub async fn add(
    State(state): State<AppState>,
    payload: Result<Json<CreateExpense>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let Json(req) = payload?;
    req.validate()?;

    if !EXPENSE_KINDS.contains(&req.kind.as_str()) {
        return Err(AppError::ValidationError(
            "kind must be 'entry' or 'bonus'".to_string(),
        ));
    }

    let expense = Expense::create(&state.pool, &state.config.default_user, req).await?;
    tracing::info!("Expense added: {} ({})", expense.id, expense.food);

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            ok: true,
            id: expense.id,
        }),
    ))
}

/// GET /expenses/list
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Expense>>> {
    let limit = query.limit.unwrap_or(50).clamp(1, 500);
    let expenses = Expense::list(&state.pool, &state.config.default_user, limit).await?;
    Ok(Json(expenses))
}

/// GET /expenses/summary
pub async fn summary(State(state): State<AppState>) -> AppResult<Json<ExpenseSummary>> {
    let summary = Expense::summary(&state.pool, &state.config.default_user).await?;
    Ok(Json(summary))
}
