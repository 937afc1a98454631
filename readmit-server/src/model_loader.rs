//! Model artifact resolution and backend construction.

use readmit_core::config::ModelConfig;
use readmit_core::model::{
    create_model, BackendConfig, LinearModelConfig, ModelError, OnnxModelConfig, RiskModel,
};
use std::path::PathBuf;

/// Default ONNX artifact filename, looked up in the working directory.
pub const DEFAULT_ONNX_ARTIFACT: &str = "readmission_risk_model.onnx";

/// Default linear artifact filename, looked up in the working directory.
pub const DEFAULT_LINEAR_ARTIFACT: &str = "readmission_risk_model.json";

/// Resolve the artifact path for the configured backend.
///
/// An empty `artifact_path` falls back to the backend's default filename;
/// a `~` prefix expands to the home directory.
pub fn resolve_artifact_path(config: &ModelConfig) -> PathBuf {
    if config.artifact_path.is_empty() {
        let default = match config.backend.as_str() {
            "linear" => DEFAULT_LINEAR_ARTIFACT,
            _ => DEFAULT_ONNX_ARTIFACT,
        };
        PathBuf::from(default)
    } else {
        PathBuf::from(shellexpand::tilde(&config.artifact_path).to_string())
    }
}

/// Create a risk model from the application config.
///
/// Reads `[model] backend` to select ONNX or linear.
pub fn create_model_from_config(config: &ModelConfig) -> Result<Box<dyn RiskModel>, ModelError> {
    let artifact_path = resolve_artifact_path(config);

    let backend_cfg = match config.backend.as_str() {
        "linear" => BackendConfig::Linear(LinearModelConfig { artifact_path }),
        _ => {
            // Default: "onnx"
            BackendConfig::Onnx(OnnxModelConfig {
                artifact_path,
                input_name: config.input_name.clone(),
                output_name: config.output_name.clone(),
            })
        }
    };

    create_model(backend_cfg)
}

// ============================================================================
// TESTS
// ============================================================================
