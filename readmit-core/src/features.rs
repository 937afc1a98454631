//! Patient feature vector and its canonical column order.
//!
//! Every model backend consumes a single-row table whose columns appear in
//! [`FEATURE_COLUMNS`] order. Reordering these breaks any trained artifact,
//! so all row assembly goes through [`PatientFeatures::to_row`].

use ndarray::{arr2, Array2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical feature column order. Trained artifacts expect exactly this.
pub const FEATURE_COLUMNS: [&str; 5] = [
    "age",
    "has_diabetes",
    "has_hypertension",
    "previous_admissions",
    "avg_blood_sugar_last_7_days",
];

/// Number of input features per patient.
pub const NUM_FEATURES: usize = FEATURE_COLUMNS.len();

/// Inclusive age bounds accepted for a prediction.
pub const MIN_AGE: u32 = 18;
pub const MAX_AGE: u32 = 100;

/// Position of a named column in the canonical order, if it is one of ours.
pub fn column_index(name: &str) -> Option<usize> {
    FEATURE_COLUMNS.iter().position(|c| *c == name)
}

#[derive(Debug, Error, PartialEq)]
pub enum FeatureError {
    #[error("age {age} is out of range ({MIN_AGE}-{MAX_AGE})")]
    AgeOutOfRange { age: u32 },
    #[error("average blood sugar {value} must be a finite value >= 0")]
    BloodSugarOutOfRange { value: f64 },
}

/// One patient's inputs, as entered on the form.
///
/// Field defaults mirror the form's initial state, so a fully-defaulted
/// request is a valid prediction for the baseline patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientFeatures {
    #[serde(default = "default_age")]
    pub age: u32,
    #[serde(default)]
    pub has_diabetes: bool,
    #[serde(default)]
    pub has_hypertension: bool,
    #[serde(default)]
    pub previous_admissions: u32,
    #[serde(default = "default_blood_sugar")]
    pub avg_blood_sugar_last_7_days: f64,
}

fn default_age() -> u32 {
    50
}

fn default_blood_sugar() -> f64 {
    5.0
}

impl Default for PatientFeatures {
    fn default() -> Self {
        Self {
            age: default_age(),
            has_diabetes: false,
            has_hypertension: false,
            previous_admissions: 0,
            avg_blood_sugar_last_7_days: default_blood_sugar(),
        }
    }
}

fn bool_to_flag(value: bool) -> f32 {
    if value {
        1.0
    } else {
        0.0
    }
}

impl PatientFeatures {
    /// Check the same bounds the form enforces.
    ///
    /// The HTTP surface accepts any deserializable payload, so bounds are
    /// re-checked here before a row ever reaches a model.
    pub fn validate(&self) -> Result<(), FeatureError> {
        if self.age < MIN_AGE || self.age > MAX_AGE {
            return Err(FeatureError::AgeOutOfRange { age: self.age });
        }
        if !self.avg_blood_sugar_last_7_days.is_finite() || self.avg_blood_sugar_last_7_days < 0.0 {
            return Err(FeatureError::BloodSugarOutOfRange {
                value: self.avg_blood_sugar_last_7_days,
            });
        }
        Ok(())
    }

    /// The single feature row in [`FEATURE_COLUMNS`] order.
    ///
    /// Booleans are coerced to 0/1 here; trained models never see `true`.
    pub fn to_row(&self) -> [f32; NUM_FEATURES] {
        [
            self.age as f32,
            bool_to_flag(self.has_diabetes),
            bool_to_flag(self.has_hypertension),
            self.previous_admissions as f32,
            self.avg_blood_sugar_last_7_days as f32,
        ]
    }

    /// The row as a 1 x NUM_FEATURES table, the shape model runtimes expect.
    pub fn to_matrix(&self) -> Array2<f32> {
        arr2(&[self.to_row()])
    }
}
