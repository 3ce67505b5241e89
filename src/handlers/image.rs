//! Image prediction handler

use std::path::Path;

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::ml::FreshnessStatus;
use crate::models::ImageRecord;
use crate::{AppError, AppResult, AppState};

const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Debug, Serialize)]
pub struct ImagePredictionResponse {
    pub fruit: String,
    pub freshness: FreshnessStatus,
    pub confidence: f32,
}

/// POST /predict-image (multipart, field `file`)
pub async fn predict(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<ImagePredictionResponse>> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::ValidationError(e.to_string()))?
    {
        if field.name() == Some("file") {
            let original_name = field.file_name().unwrap_or("upload.jpg").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::ValidationError(e.to_string()))?;
            upload = Some((original_name, data.to_vec()));
        }
    }

    let (original_name, data) =
        upload.ok_or_else(|| AppError::ValidationError("No image provided".to_string()))?;

    if data.is_empty() {
        return Err(AppError::ValidationError("Uploaded image is empty".to_string()));
    }

    let img = image::load_from_memory(&data)
        .map_err(|_| AppError::ValidationError("Invalid or unsupported image".to_string()))?;

    let prediction = state.models.fruit.predict(&img)?;

    let file_name = stored_file_name(&original_name);
    let path = Path::new(&state.config.upload_dir).join(&file_name);
    if let Err(e) = tokio::fs::write(&path, &data).await {
        tracing::warn!("Failed to store upload {}: {}", path.display(), e);
    }

    let record = ImageRecord::create(
        &state.pool,
        &state.config.default_user,
        &file_name,
        &prediction,
    )
    .await?;

    tracing::info!(
        "Image prediction {} ({:.3}) persisted as {}",
        prediction.label,
        prediction.confidence,
        record.id
    );

    Ok(Json(ImagePredictionResponse {
        fruit: prediction.food,
        freshness: prediction.status,
        confidence: prediction.confidence,
    }))
}

/// Uploads get a generated name; only the (whitelisted) extension of the
/// client's file name survives.
fn stored_file_name(original: &str) -> String {
    let ext = Path::new(original)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .filter(|e| ALLOWED_EXTENSIONS.contains(&e.as_str()))
        .unwrap_or_else(|| "jpg".to_string());

    format!("{}.{}", Uuid::new_v4().simple(), ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_file_name_keeps_allowed_extension() {
        assert!(stored_file_name("banana.PNG").ends_with(".png"));
        assert!(stored_file_name("pic.jpeg").ends_with(".jpeg"));
    }

    #[test]
    fn test_stored_file_name_rejects_unknown_extension() {
        assert!(stored_file_name("evil.exe").ends_with(".jpg"));
        assert!(stored_file_name("noextension").ends_with(".jpg"));
    }

    #[test]
    fn test_stored_file_name_discards_client_path() {
        let name = stored_file_name("../../etc/passwd.png");
        assert!(!name.contains('/'));
        assert!(!name.contains(".."));
    }
}
