//! ONNX risk model backend.
//!
//! Runs a readmission classifier exported to ONNX via the `ort` crate.
//! The graph takes a `[1, NUM_FEATURES]` float32 row and returns class
//! probabilities; only the positive class reaches callers.

use async_trait::async_trait;
use ndarray::Array2;
use ort::session::Session;
use ort::value::Tensor;
use std::sync::{Arc, Mutex};

use crate::features::{PatientFeatures, NUM_FEATURES};
use crate::model::{checked_probability, ModelError, OnnxModelConfig, RiskModel};

/// Local ONNX classifier session shared across requests.
pub struct OnnxRiskModel {
    session: Arc<Mutex<Session>>,
    input_name: String,
    output_name: String,
}

impl std::fmt::Debug for OnnxRiskModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxRiskModel")
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .finish_non_exhaustive()
    }
}

impl OnnxRiskModel {
    /// Create a new ONNX risk model.
    ///
    /// Loads the classifier from the path specified in `config`. Returns
    /// `ModelError::ArtifactNotFound` if the file is missing.
    pub fn new(config: OnnxModelConfig) -> Result<Self, ModelError> {
        if !config.artifact_path.exists() {
            return Err(ModelError::ArtifactNotFound {
                path: config.artifact_path.display().to_string(),
            });
        }

        let session = Session::builder()
            .and_then(|b| b.with_intra_threads(1))
            .and_then(|b| b.commit_from_file(&config.artifact_path))
            .map_err(|e| ModelError::Inference(e.to_string()))?;

        tracing::info!(path = %config.artifact_path.display(), "ONNX risk model loaded");

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name: config.input_name,
            output_name: config.output_name,
        })
    }
}

#[async_trait]
impl RiskModel for OnnxRiskModel {
    async fn predict_probability(&self, patient: &PatientFeatures) -> Result<f64, ModelError> {
        // CPU-bound inference runs on the blocking thread pool.
        let session = Arc::clone(&self.session);
        let input_name = self.input_name.clone();
        let output_name = self.output_name.clone();
        let table = patient.to_matrix();

        tokio::task::spawn_blocking(move || {
            let mut session_guard = session
                .lock()
                .map_err(|e| ModelError::Inference(format!("session lock poisoned: {e}")))?;
            predict_sync(&mut session_guard, &input_name, &output_name, table)
        })
        .await
        .map_err(|e| ModelError::Inference(format!("spawn_blocking join error: {e}")))?
    }

    fn name(&self) -> &str {
        "onnx"
    }
}

/// Run ONNX inference synchronously.
fn predict_sync(
    session: &mut Session,
    input_name: &str,
    output_name: &str,
    table: Array2<f32>,
) -> Result<f64, ModelError> {
    // 1. Flatten the one-row table into tensor data (batch_size=1)
    let data: Vec<f32> = table.iter().copied().collect();
    let shape = vec![1i64, NUM_FEATURES as i64];

    let input_tensor =
        Tensor::from_array((shape, data)).map_err(|e| ModelError::Inference(e.to_string()))?;

    let inputs = ort::inputs! {
        input_name => input_tensor,
    };

    // 2. Run session
    let outputs = session
        .run(inputs)
        .map_err(|e| ModelError::Inference(e.to_string()))?;

    // 3. Extract class probabilities
    // try_extract_tensor returns (&Shape, &[f32])
    // Shape derefs to [i64] for dimension access
    let (out_shape, values) = outputs[output_name]
        .try_extract_tensor::<f32>()
        .map_err(|e| ModelError::Inference(e.to_string()))?;

    positive_class_probability(out_shape, values)
}

/// Pick the positive-class probability out of a classifier output.
///
/// Binary classifiers exported with per-class probabilities produce a
/// `[1, 2]` tensor where the positive class is the second column. Models
/// exported with a single sigmoid output produce `[1, 1]` or `[1]`.
fn positive_class_probability(dims: &[i64], values: &[f32]) -> Result<f64, ModelError> {
    let probability = match (dims, values) {
        ([1, 2], [_, positive]) => f64::from(*positive),
        ([1, 1], [only]) | ([1], [only]) => f64::from(*only),
        _ => {
            return Err(ModelError::InvalidOutput(format!(
                "unexpected output shape {dims:?} with {} values",
                values.len()
            )))
        }
    };

    checked_probability(probability)
}

// ============================================================================
// TESTS
// ============================================================================
