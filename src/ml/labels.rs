//! Label encoder
//!
//! Bidirectional mapping between model output indices and human-readable
//! class names. Labels follow the `<food>_<state>` convention used by the
//! training pipeline ("banana_spoiled", "apple_fresh").

use std::fs;

use serde::{Deserialize, Serialize};

use super::{InferenceError, ModelLoadError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoder {
    pub classes: Vec<String>,
}

impl LabelEncoder {
    /// Load and validate the encoder artifact
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

        let encoder: LabelEncoder = serde_json::from_str(&raw).map_err(|e| ModelLoadError::Parse {
            path: path.to_string(),
            source: e,
        })?;

        if encoder.classes.is_empty() {
            return Err(ModelLoadError::Incompatible(format!(
                "label encoder at {} has an empty vocabulary",
                path
            )));
        }
        Ok(encoder)
    }

    /// Decode a class index into its label
    pub fn decode(&self, index: usize) -> Result<&str, InferenceError> {
        self.classes
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| {
                InferenceError::BadOutput(format!(
                    "class index {} outside vocabulary of {} labels",
                    index,
                    self.classes.len()
                ))
            })
    }

    /// Index of a label, if present
    pub fn encode(&self, label: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == label)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FreshnessStatus {
    Fresh,
    Spoiled,
}

impl FreshnessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fresh => "Fresh",
            Self::Spoiled => "Spoiled",
        }
    }
}

/// Split a class label into its display parts.
///
/// "banana_spoiled" -> ("Banana", Spoiled). Labels without the underscore
/// convention fall back to the generic food name; anything not containing
/// "fresh" counts as spoiled.
pub fn split_label(label: &str) -> (String, FreshnessStatus) {
    let status = if label.to_lowercase().contains("fresh") {
        FreshnessStatus::Fresh
    } else {
        FreshnessStatus::Spoiled
    };

    let food = match label.split_once('_') {
        Some((first, _)) => capitalize(first),
        None => "Food".to_string(),
    };

    (food, status)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> LabelEncoder {
        LabelEncoder {
            classes: vec![
                "apple_fresh".to_string(),
                "apple_spoiled".to_string(),
                "banana_fresh".to_string(),
                "banana_spoiled".to_string(),
            ],
        }
    }

    #[test]
    fn test_decode_in_vocabulary() {
        assert_eq!(encoder().decode(3).unwrap(), "banana_spoiled");
    }

    #[test]
    fn test_decode_out_of_vocabulary() {
        assert!(encoder().decode(4).is_err());
    }

    #[test]
    fn test_encode_round_trip() {
        let e = encoder();
        assert_eq!(e.encode("banana_fresh"), Some(2));
        assert_eq!(e.encode("durian_fresh"), None);
    }

    #[test]
    fn test_split_label_structured() {
        let (food, status) = split_label("banana_spoiled");
        assert_eq!(food, "Banana");
        assert_eq!(status, FreshnessStatus::Spoiled);

        let (food, status) = split_label("APPLE_FRESH");
        assert_eq!(food, "Apple");
        assert_eq!(status, FreshnessStatus::Fresh);
    }

    #[test]
    fn test_split_label_unstructured() {
        let (food, status) = split_label("fresh");
        assert_eq!(food, "Food");
        assert_eq!(status, FreshnessStatus::Fresh);

        let (food, status) = split_label("rotten");
        assert_eq!(food, "Food");
        assert_eq!(status, FreshnessStatus::Spoiled);
    }
}
