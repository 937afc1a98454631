pub mod assessment;
pub mod config;
pub mod features;
pub mod model;
pub mod onnx_model;

pub use assessment::{RiskAssessment, RiskLevel, RISK_THRESHOLD};
pub use config::ReadmitConfig;
pub use features::{FeatureError, PatientFeatures, FEATURE_COLUMNS, NUM_FEATURES};
pub use model::{
    create_model, BackendConfig, LinearModelConfig, LinearRiskModel, ModelError, OnnxModelConfig,
    RiskModel,
};
pub use onnx_model::OnnxRiskModel;
