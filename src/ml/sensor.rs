//! Sensor classifier
//!
//! Wraps the pre-trained logistic-regression ONNX graph. Raw readings are
//! pushed through the fitted scaler, the session emits a `[1, n_classes]`
//! probability vector, and the label encoder turns the winning index into a
//! class name.

use ndarray::Array2;
use ort::session::Session;
use ort::value::Value;
use parking_lot::Mutex;

use super::labels::split_label;
use super::{
    build_session, top_class, InferenceError, LabelEncoder, ModelLoadError, Prediction,
    StandardScaler, SENSOR_FEATURES,
};

pub struct SensorModel {
    // ort sessions need exclusive access to run
    session: Mutex<Session>,
    scaler: StandardScaler,
    labels: LabelEncoder,
}

impl SensorModel {
    /// Load the classifier, scaler and encoder artifacts
    pub fn load(
        model_path: &str,
        scaler_path: &str,
        labels_path: &str,
    ) -> Result<Self, ModelLoadError> {
        let session = build_session(model_path)?;
        let scaler = StandardScaler::load(scaler_path)?;
        let labels = LabelEncoder::load(labels_path)?;

        tracing::info!(
            "Sensor model ready ({} classes: {:?})",
            labels.len(),
            labels.classes
        );

        Ok(Self {
            session: Mutex::new(session),
            scaler,
            labels,
        })
    }

    pub fn vocabulary(&self) -> &LabelEncoder {
        &self.labels
    }

    /// Classify one reading: scale, run the session, decode the label.
    ///
    /// Deterministic for a fixed artifact set and input.
    pub fn predict(&self, features: [f32; SENSOR_FEATURES]) -> Result<Prediction, InferenceError> {
        let scaled = self.scaler.transform(&features);

        let input_array = Array2::<f32>::from_shape_vec((1, SENSOR_FEATURES), scaled.to_vec())
            .map_err(|e| InferenceError::Tensor(e.to_string()))?;

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
