//! Fitted feature scaler
//!
//! JSON artifact exported alongside the sensor classifier. Holds the
//! per-feature mean and scale fitted at training time; raw readings must go
//! through it before they reach the model.

use std::fs;

use serde::{Deserialize, Serialize};

use super::{ModelLoadError, SENSOR_FEATURES};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f32>,
    pub scale: Vec<f32>,
}

impl StandardScaler {
    /// Load and validate the scaler artifact
    pub fn load(path: &str) -> Result<Self, ModelLoadError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ModelLoadError::Missing(path.to_string())
            } else {
                ModelLoadError::Io {
                    path: path.to_string(),
                    source: e,
                }
            }
        })?;

        let scaler: StandardScaler = serde_json::from_str(&raw).map_err(|e| ModelLoadError::Parse {
            path: path.to_string(),
            source: e,
        })?;

        scaler.validate(SENSOR_FEATURES)?;
        Ok(scaler)
    }

    fn validate(&self, expected: usize) -> Result<(), ModelLoadError> {
        if self.mean.len() != expected || self.scale.len() != expected {
            return Err(ModelLoadError::Incompatible(format!(
                "scaler expects {} features, artifact has mean={} scale={}",
                expected,
                self.mean.len(),
                self.scale.len()
            )));
        }
        if self.scale.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(ModelLoadError::Incompatible(
                "scaler scale entries must be finite and positive".to_string(),
            ));
        }
        if self.mean.iter().any(|m| !m.is_finite()) {
            return Err(ModelLoadError::Incompatible(
                "scaler mean entries must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply the fitted transform: (x - mean) / scale per feature
    pub fn transform(&self, features: &[f32; SENSOR_FEATURES]) -> [f32; SENSOR_FEATURES] {
        let mut scaled = [0.0f32; SENSOR_FEATURES];
        for i in 0..SENSOR_FEATURES {
            scaled[i] = (features[i] - self.mean[i]) / self.scale[i];
        }
        scaled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn scaler() -> StandardScaler {
        StandardScaler {
            mean: vec![100.0, 128.0, 128.0, 128.0],
            scale: vec![50.0, 64.0, 64.0, 64.0],
        }
    }

    #[test]
    fn test_transform_is_exact() {
        let s = scaler();
        let out = s.transform(&[150.0, 192.0, 128.0, 64.0]);
        assert_eq!(out, [1.0, 1.0, 0.0, -1.0]);
    }

    #[test]
    fn test_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scaler.json");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, "{}", serde_json::to_string(&scaler()).unwrap()).unwrap();

        let loaded = StandardScaler::load(path.to_str().unwrap()).unwrap();
        assert_eq!(loaded.mean, scaler().mean);
        assert_eq!(loaded.scale, scaler().scale);
    }

    #[test]
    fn test_load_missing_is_fatal() {
        let err = StandardScaler::load("does/not/exist.json").unwrap_err();
        assert!(matches!(err, ModelLoadError::Missing(_)));
    }

    #[test]
    fn test_reject_dimension_mismatch() {
        let bad = StandardScaler {
            mean: vec![0.0; 3],
            scale: vec![1.0; 3],
        };
        assert!(bad.validate(SENSOR_FEATURES).is_err());
    }

    #[test]
    fn test_reject_zero_scale() {
        let bad = StandardScaler {
            mean: vec![0.0; 4],
            scale: vec![1.0, 0.0, 1.0, 1.0],
        };
        assert!(bad.validate(SENSOR_FEATURES).is_err());
    }
}
