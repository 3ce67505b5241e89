//! Fruit classifier
//!
//! Wraps the pre-trained CNN (MobileNetV2 head) exported to ONNX. Uploads
//! are decoded, resized to the model's input size and normalized to the
//! [-1, 1] range the network was trained on, NHWC layout.

use image::{imageops::FilterType, DynamicImage};
use ndarray::Array4;
use ort::session::Session;
use ort::value::Value;
use parking_lot::Mutex;

use super::labels::split_label;
use super::{
    build_session, top_class, InferenceError, LabelEncoder, ModelLoadError, Prediction,
};

/// Input edge length the CNN expects
pub const IMAGE_SIZE: u32 = 224;

pub struct FruitModel {
    session: Mutex<Session>,
    labels: LabelEncoder,
}

impl FruitModel {
    /// Load the CNN and its label encoder
    pub fn load(model_path: &str, labels_path: &str) -> Result<Self, ModelLoadError> {
        let session = build_session(model_path)?;
        let labels = LabelEncoder::load(labels_path)?;

        tracing::info!(
            "Fruit model ready ({} classes: {:?})",
            labels.len(),
            labels.classes
        );

        Ok(Self {
            session: Mutex::new(session),
            labels,
        })
    }

    pub fn vocabulary(&self) -> &LabelEncoder {
        &self.labels
    }

    /// Classify a decoded upload
    pub fn predict(&self, img: &DynamicImage) -> Result<Prediction, InferenceError> {
        let input_array = preprocess(img);

        let mut session = self.session.lock();

        let output_name = session
            .outputs()
            .first()
            .map(|o| o.name().to_string())
            .ok_or_else(|| InferenceError::BadOutput("model defines no output".to_string()))?;

        let input_tensor =
            Value::from_array(input_array).map_err(|e| InferenceError::Tensor(e.to_string()))?;

        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError::Session(e.to_string()))?;

        let output = outputs
            .get(&output_name)
            .ok_or_else(|| InferenceError::BadOutput("no output tensor".to_string()))?;

        let output_tensor = output
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::Tensor(e.to_string()))?;

        let probabilities = output_tensor.1;

        if probabilities.len() != self.labels.len() {
            return Err(InferenceError::BadOutput(format!(
                "model emitted {} classes, encoder has {}",
                probabilities.len(),
                self.labels.len()
            )));
        }

        let (class_index, confidence) = top_class(probabilities)?;
        let label = self.labels.decode(class_index)?.to_string();
        let (food, status) = split_label(&label);

        Ok(Prediction {
            label,
            food,
            status,
            class_index,
            confidence,
        })
    }
}

/// Resize to the network's input size and normalize pixels to [-1, 1],
/// `[1, H, W, 3]` NHWC.
fn preprocess(img: &DynamicImage) -> Array4<f32> {
    let resized = img
        .resize_exact(IMAGE_SIZE, IMAGE_SIZE, FilterType::Triangle)
        .to_rgb8();

    let mut input = Array4::<f32>::zeros((1, IMAGE_SIZE as usize, IMAGE_SIZE as usize, 3));
    for (x, y, pixel) in resized.enumerate_pixels() {
        for c in 0..3 {
            input[[0, y as usize, x as usize, c]] = pixel.0[c] as f32 / 127.5 - 1.0;
        }
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_preprocess_shape_and_range() {
        let mut img = RgbImage::new(64, 48);
        img.put_pixel(0, 0, Rgb([255, 0, 128]));
        let tensor = preprocess(&DynamicImage::ImageRgb8(img));

        assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
        assert!(tensor.iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn test_preprocess_normalization_endpoints() {
        let img = RgbImage::from_pixel(10, 10, Rgb([255, 0, 255]));
        let tensor = preprocess(&DynamicImage::ImageRgb8(img));

        assert!((tensor[[0, 0, 0, 0]] - 1.0).abs() < 1e-6);
        assert!((tensor[[0, 0, 0, 1]] + 1.0).abs() < 1e-6);
    }
}
