//! Thought handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;

use super::notify::{CreatedResponse, ListQuery};
use crate::models::{CreateThought, Thought};
use crate::{AppError, AppResult, AppState};

/// Server-side cap; the mobile client enforces the same limit.
const MAX_WORDS: usize = 60;

fn cap_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() > max_words {
        words[..max_words].join(" ")
    } else {
        words.join(" ")
    }
}

/// POST /thoughts/add
pub async fn add(
    State(state): State<AppState>,
    payload: Result<Json<CreateThought>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let Json(req) = payload?;
    let text = req
        .text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::ValidationError("text is required".to_string()))?;

    let text = cap_words(text, MAX_WORDS);
    let thought = Thought::create(&state.pool, &state.config.default_user, &text).await?;
    tracing::info!("Thought added: {} ({} chars)", thought.id, text.len());

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            ok: true,
            id: thought.id,
        }),
    ))
}

/// GET /thoughts/list
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Thought>>> {
    let limit = query.limit.unwrap_or(50).clamp(1, 500);
    let thoughts = Thought::list(&state.pool, &state.config.default_user, limit).await?;
    Ok(Json(thoughts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cap_words_passes_short_text() {
        assert_eq!(cap_words("eat fried rice", 60), "eat fried rice");
    }

    #[test]
    fn test_cap_words_truncates_long_text() {
        let long = (0..100).map(|i| i.to_string()).collect::<Vec<_>>().join(" ");
        let capped = cap_words(&long, 60);
        assert_eq!(capped.split_whitespace().count(), 60);
    }

    #[test]
    fn test_cap_words_collapses_whitespace() {
        assert_eq!(cap_words("a   b \t c", 60), "a b c");
    }
}
