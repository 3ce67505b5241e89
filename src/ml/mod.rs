//! ML module - model artifact loading and inference
//!
//! The classifiers are externally supplied, pre-trained artifacts: ONNX
//! graphs for the models, JSON files for the fitted scaler and the label
//! encoders. Everything is loaded once at startup and read-only afterwards.

pub mod image;
pub mod labels;
pub mod scaler;
pub mod sensor;

use std::path::Path;

use ort::session::{builder::GraphOptimizationLevel, Session};
use serde::Serialize;
use thiserror::Error;

pub use image::FruitModel;
pub use labels::{FreshnessStatus, LabelEncoder};
pub use scaler::StandardScaler;
pub use sensor::SensorModel;

/// Number of features the sensor classifier consumes: NH3 ppm + R + G + B
pub const SENSOR_FEATURES: usize = 4;

/// Fatal startup error: the process must not serve traffic with a
/// partially loaded model.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("artifact not found: {0}")]
    Missing(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to build ONNX session for {path}: {message}")]
    Session { path: String, message: String },

    #[error("incompatible artifact: {0}")]
    Incompatible(String),
}

/// Request-scoped inference failure (post-startup, surfaced as a 500)
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("tensor error: {0}")]
    Tensor(String),

    #[error("inference failed: {0}")]
    Session(String),

    #[error("model output malformed: {0}")]
    BadOutput(String),
}

/// All model artifacts held for the process lifetime
pub struct ModelBundle {
    pub sensor: SensorModel,
    pub fruit: FruitModel,
}

impl ModelBundle {
    /// Load every artifact or fail the startup
    pub fn load(config: &crate::config::Config) -> Result<Self, ModelLoadError> {
        let sensor = SensorModel::load(
            &config.sensor_model_path,
            &config.sensor_scaler_path,
            &config.sensor_labels_path,
        )?;
        let fruit = FruitModel::load(&config.image_model_path, &config.image_labels_path)?;
        Ok(Self { sensor, fruit })
    }
}

/// Build an ONNX session from a model file
pub(crate) fn build_session(path: &str) -> Result<Session, ModelLoadError> {
    if !Path::new(path).exists() {
        return Err(ModelLoadError::Missing(path.to_string()));
    }

    tracing::info!("Loading ONNX model from: {}", path);

    let session = Session::builder()
        .map_err(|e| ModelLoadError::Session {
            path: path.to_string(),
            message: e.to_string(),
        })?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| ModelLoadError::Session {
            path: path.to_string(),
            message: e.to_string(),
        })?
        .commit_from_file(path)
        .map_err(|e| ModelLoadError::Session {
            path: path.to_string(),
            message: e.to_string(),
        })?;

    tracing::info!("ONNX model loaded successfully: {}", path);
    Ok(session)
}

/// Read the single `[1, n_classes]` probability vector out of a session run
/// and reduce it to (class index, confidence).
///
/// Confidence is the winning share of the total mass, so it stays in [0, 1]
/// even when the graph emits unnormalized scores.
pub(crate) fn top_class(probabilities: &[f32]) -> Result<(usize, f32), InferenceError> {
    if probabilities.is_empty() {
        return Err(InferenceError::BadOutput("empty probability vector".to_string()));
    }

    let mut sum = 0.0f32;
    let mut best_index = 0usize;
    let mut best_value = f32::NEG_INFINITY;

    for (i, &p) in probabilities.iter().enumerate() {
        if !p.is_finite() || p < 0.0 {
            return Err(InferenceError::BadOutput(format!(
                "probability out of range at index {}: {}",
                i, p
            )));
        }
        sum += p;
        if p > best_value {
            best_value = p;
            best_index = i;
        }
    }

    if sum <= 0.0 {
        return Err(InferenceError::BadOutput("no probability mass".to_string()));
    }

    Ok((best_index, best_value / sum))
}

/// Prediction output shared by both classifiers
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub label: String,
    pub food: String,
    pub status: FreshnessStatus,
    pub class_index: usize,
    pub confidence: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_class_picks_argmax() {
        let (idx, conf) = top_class(&[0.1, 0.7, 0.2]).unwrap();
        assert_eq!(idx, 1);
        assert!((conf - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_top_class_normalizes_unscaled_scores() {
        let (idx, conf) = top_class(&[1.0, 3.0]).unwrap();
        assert_eq!(idx, 1);
        assert!((conf - 0.75).abs() < 1e-6);
        assert!((0.0..=1.0).contains(&conf));
    }

    #[test]
    fn test_top_class_rejects_empty() {
        assert!(top_class(&[]).is_err());
    }

    #[test]
    fn test_top_class_rejects_nan() {
        assert!(top_class(&[0.5, f32::NAN]).is_err());
    }

    #[test]
    fn test_top_class_rejects_negative_mass() {
        assert!(top_class(&[-1.0, 0.5]).is_err());
        assert!(top_class(&[0.0, 0.0]).is_err());
    }
}
