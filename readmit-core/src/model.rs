//! Risk model backends for readmission prediction.
//!
//! Provides a `RiskModel` trait with implementations for:
//! - **ONNX**: a classifier exported to ONNX, run locally via `ort`
//! - **Linear**: logistic-regression coefficients stored as JSON
//!
//! Both consume the canonical feature row from [`crate::features`] and
//! return the positive-class probability in `[0, 1]`.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::features::{column_index, PatientFeatures, FEATURE_COLUMNS, NUM_FEATURES};

// ============================================================================
// RiskModel trait
// ============================================================================

/// Abstraction over trained readmission classifiers.
#[async_trait]
pub trait RiskModel: Send + Sync {
    /// Probability that the patient will be readmitted, in `[0, 1]`.
    async fn predict_probability(&self, patient: &PatientFeatures) -> Result<f64, ModelError>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}

/// Guard a backend's raw output: anything outside `[0, 1]`, including
/// `NaN`, is an `InvalidOutput` error rather than a prediction.
pub fn checked_probability(probability: f64) -> Result<f64, ModelError> {
    if !(0.0..=1.0).contains(&probability) {
        return Err(ModelError::InvalidOutput(format!(
            "probability {probability} outside [0, 1]"
        )));
    }
    Ok(probability)
}

// ============================================================================
// Error types
// ============================================================================

/// Model loading and inference errors
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("model artifact not found at {path} (place the trained model there or set model.artifact_path)")]
    ArtifactNotFound { path: String },

    #[error("failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed model artifact: {0}")]
    Format(#[from] serde_json::Error),

    #[error("artifact has {actual} weights, expected {expected}")]
    InvalidWeights { expected: usize, actual: usize },

    #[error("artifact names unknown feature column '{name}'")]
    UnknownColumn { name: String },

    #[error("artifact is missing feature column '{name}'")]
    MissingColumn { name: String },

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("model produced invalid output: {0}")]
    InvalidOutput(String),
}

// ============================================================================
// Config types
// ============================================================================

/// ONNX backend configuration
#[derive(Debug, Clone)]
pub struct OnnxModelConfig {
    pub artifact_path: PathBuf,
    /// Graph input tensor name, typically `float_input` for exported models.
    pub input_name: String,
    /// Graph output tensor name holding class probabilities.
    pub output_name: String,
}

/// Linear backend configuration
#[derive(Debug, Clone)]
pub struct LinearModelConfig {
    pub artifact_path: PathBuf,
}

/// Configuration union for the backend factory.
pub enum BackendConfig {
    Onnx(OnnxModelConfig),
    Linear(LinearModelConfig),
}

/// Create the appropriate backend from configuration.
pub fn create_model(config: BackendConfig) -> Result<Box<dyn RiskModel>, ModelError> {
    match config {
        BackendConfig::Onnx(c) => Ok(Box::new(crate::onnx_model::OnnxRiskModel::new(c)?)),
        BackendConfig::Linear(c) => Ok(Box::new(LinearRiskModel::load(&c.artifact_path)?)),
    }
}

// ============================================================================
// Linear artifact format (private)
// ============================================================================

/// On-disk shape of a linear artifact: one coefficient per feature column
/// plus an intercept. An optional `features` list records the column order
/// the coefficients were trained in.
#[derive(Debug, Deserialize)]
struct LinearArtifact {
    weights: Vec<f64>,
    intercept: f64,
    features: Option<Vec<String>>,
}

// ============================================================================
// LinearRiskModel
// ============================================================================

/// Logistic regression over the canonical feature row.
///
/// Weights are stored in canonical column order after loading, regardless of
/// the order the artifact listed them in.
#[derive(Debug, Clone)]
pub struct LinearRiskModel {
    weights: [f64; NUM_FEATURES],
    intercept: f64,
}

impl LinearRiskModel {
    pub fn load(path: &std::path::Path) -> Result<Self, ModelError> {
        if !path.exists() {
            return Err(ModelError::ArtifactNotFound {
                path: path.display().to_string(),
            });
        }

        let raw = std::fs::read_to_string(path)?;
        let artifact: LinearArtifact = serde_json::from_str(&raw)?;

        if artifact.weights.len() != NUM_FEATURES {
            return Err(ModelError::InvalidWeights {
                expected: NUM_FEATURES,
                actual: artifact.weights.len(),
            });
        }

        let weights = match &artifact.features {
            Some(columns) => realign_weights(&artifact.weights, columns)?,
            None => {
                let mut weights = [0.0; NUM_FEATURES];
                weights.copy_from_slice(&artifact.weights);
                weights
            }
        };

        tracing::info!(path = %path.display(), "Linear risk model loaded");

        Ok(Self {
            weights,
            intercept: artifact.intercept,
        })
    }

    fn decision_value(&self, patient: &PatientFeatures) -> f64 {
        let row = patient.to_row();
        let dot: f64 = self
            .weights
            .iter()
            .zip(row.iter())
            .map(|(w, x)| w * f64::from(*x))
            .sum();
        dot + self.intercept
    }
}

/// Reorder artifact weights into canonical column order.
fn realign_weights(
    weights: &[f64],
    columns: &[String],
) -> Result<[f64; NUM_FEATURES], ModelError> {
    if columns.len() != NUM_FEATURES {
        return Err(ModelError::InvalidWeights {
            expected: NUM_FEATURES,
            actual: columns.len(),
        });
    }

    let mut aligned = [0.0; NUM_FEATURES];
    let mut seen = [false; NUM_FEATURES];

    for (weight, name) in weights.iter().zip(columns.iter()) {
        let idx = column_index(name).ok_or_else(|| ModelError::UnknownColumn {
            name: name.clone(),
        })?;
        aligned[idx] = *weight;
        seen[idx] = true;
    }

    if let Some(missing) = seen.iter().position(|s| !s) {
        return Err(ModelError::MissingColumn {
            name: FEATURE_COLUMNS[missing].to_string(),
        });
    }

    Ok(aligned)
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

#[async_trait]
impl RiskModel for LinearRiskModel {
    async fn predict_probability(&self, patient: &PatientFeatures) -> Result<f64, ModelError> {
        checked_probability(sigmoid(self.decision_value(patient)))
    }

    fn name(&self) -> &str {
        "linear"
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn write_artifact(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("model.json");
        std::fs::write(&path, body).expect("write artifact");
        path
    }

    fn sample_patient() -> PatientFeatures {
        PatientFeatures {
            age: 65,
            has_diabetes: true,
            has_hypertension: false,
            previous_admissions: 3,
            avg_blood_sugar_last_7_days: 9.2,
        }
    }

    #[tokio::test]
    async fn test_linear_model_predicts_sigmoid_of_dot_product() {
        let dir = tempfile::tempdir().expect("tmpdir");
        let path = write_artifact(
            &dir,
            r#"{"weights": [0.02, 0.8, 0.4, 0.3, 0.05], "intercept": -3.0}"#,
        );

        let model = LinearRiskModel::load(&path).expect("load");
        let p = model
            .predict_probability(&sample_patient())
            .await
            .expect("predict");

        // z = 0.02*65 + 0.8*1 + 0.3*3 + 0.05*9.2 - 3.0 = 0.46
        assert!((p - 0.613).abs() < 1e-3, "got {p}");
        assert_eq!(model.name(), "linear");
    }

    #[tokio::test]
    async fn test_linear_model_realigns_named_columns() {
        let dir = tempfile::tempdir().expect("tmpdir");
        // Same coefficients as above, listed in a shuffled order.
        let path = write_artifact(
            &dir,
            r#"{
                "weights": [0.05, 0.02, 0.3, 0.8, 0.4],
                "intercept": -3.0,
                "features": [
                    "avg_blood_sugar_last_7_days",
                    "age",
                    "previous_admissions",
                    "has_diabetes",
                    "has_hypertension"
                ]
            }"#,
        );

        let model = LinearRiskModel::load(&path).expect("load");
        let p = model
            .predict_probability(&sample_patient())
            .await
            .expect("predict");

        assert!((p - 0.613).abs() < 1e-3, "got {p}");
    }

    #[test]
    fn test_load_rejects_unknown_column() {
        let dir = tempfile::tempdir().expect("tmpdir");
        let path = write_artifact(
            &dir,
            r#"{
                "weights": [0.1, 0.1, 0.1, 0.1, 0.1],
                "intercept": 0.0,
                "features": ["age", "has_diabetes", "has_hypertension", "previous_admissions", "bmi"]
            }"#,
        );

        match LinearRiskModel::load(&path) {
            Err(ModelError::UnknownColumn { name }) => assert_eq!(name, "bmi"),
            other => panic!("expected UnknownColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_load_rejects_duplicate_column() {
        let dir = tempfile::tempdir().expect("tmpdir");
        let path = write_artifact(
            &dir,
            r#"{
                "weights": [0.1, 0.1, 0.1, 0.1, 0.1],
                "intercept": 0.0,
                "features": ["age", "age", "has_hypertension", "previous_admissions", "avg_blood_sugar_last_7_days"]
            }"#,
        );

        match LinearRiskModel::load(&path) {
            Err(ModelError::MissingColumn { name }) => assert_eq!(name, "has_diabetes"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_load_rejects_wrong_weight_count() {
        let dir = tempfile::tempdir().expect("tmpdir");
        let path = write_artifact(&dir, r#"{"weights": [0.1, 0.2], "intercept": 0.0}"#);

        match LinearRiskModel::load(&path) {
            Err(ModelError::InvalidWeights { expected, actual }) => {
                assert_eq!(expected, NUM_FEATURES);
                assert_eq!(actual, 2);
            }
            other => panic!("expected InvalidWeights, got {other:?}"),
        }
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempfile::tempdir().expect("tmpdir");
        let path = write_artifact(&dir, "not json");

        assert!(matches!(
            LinearRiskModel::load(&path),
            Err(ModelError::Format(_))
        ));
    }

    #[test]
    fn test_load_fails_when_artifact_missing() {
        let result = LinearRiskModel::load(std::path::Path::new("/nonexistent/model.json"));

        match result {
            Err(ModelError::ArtifactNotFound { path }) => {
                assert!(path.contains("/nonexistent/model.json"));
            }
            other => panic!("expected ArtifactNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_linear_model_rejects_nan_probability() {
        let dir = tempfile::tempdir().expect("tmpdir");
        // Overflowing coefficients drive the decision value to inf + -inf,
        // which sums to NaN.
        let path = write_artifact(
            &dir,
            r#"{"weights": [1e308, 0.0, 0.0, 0.0, -1e308], "intercept": 0.0}"#,
        );

        let model = LinearRiskModel::load(&path).expect("load");
        let result = model.predict_probability(&PatientFeatures::default()).await;

        match result {
            Err(ModelError::InvalidOutput(message)) => {
                assert!(message.contains("outside [0, 1]"), "message was: {message}");
            }
            other => panic!("expected InvalidOutput, got {other:?}"),
        }
    }

    #[test]
    fn test_sigmoid_midpoint_and_monotonicity() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!(sigmoid(4.0) > 0.9);
        assert!(sigmoid(-4.0) < 0.1);
        assert!(sigmoid(1.0) > sigmoid(0.5));
    }

    #[test]
    fn test_checked_probability_accepts_unit_interval_only() {
        assert!(checked_probability(0.0).is_ok());
        assert!(checked_probability(1.0).is_ok());
        assert!(matches!(
            checked_probability(1.2),
            Err(ModelError::InvalidOutput(_))
        ));
        assert!(matches!(
            checked_probability(-0.1),
            Err(ModelError::InvalidOutput(_))
        ));
        assert!(matches!(
            checked_probability(f64::NAN),
            Err(ModelError::InvalidOutput(_))
        ));
    }

    #[tokio::test]
    async fn test_factory_builds_linear_backend() {
        let dir = tempfile::tempdir().expect("tmpdir");
        let path = write_artifact(
            &dir,
            r#"{"weights": [0.0, 0.0, 0.0, 0.0, 0.0], "intercept": 0.0}"#,
        );

        let model = create_model(BackendConfig::Linear(LinearModelConfig {
            artifact_path: path,
        }))
        .expect("create");

        assert_eq!(model.name(), "linear");
        let p = model
            .predict_probability(&PatientFeatures::default())
            .await
            .expect("predict");
        assert!((p - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_factory_propagates_missing_onnx_artifact() {
        let result = create_model(BackendConfig::Onnx(OnnxModelConfig {
            artifact_path: PathBuf::from("/nonexistent/model.onnx"),
            input_name: "float_input".to_string(),
            output_name: "probabilities".to_string(),
        }));

        assert!(matches!(result, Err(ModelError::ArtifactNotFound { .. })));
    }
}
