//! Turning a raw probability into the advisory shown to clinicians.

use serde::{Deserialize, Serialize};

/// Probabilities strictly above this are flagged as higher risk.
pub const RISK_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Higher,
    Lower,
}

impl RiskLevel {
    /// Strictly-greater comparison; exactly 0.5 reads as lower risk.
    pub fn from_probability(probability: f64) -> Self {
        if probability > RISK_THRESHOLD {
            RiskLevel::Higher
        } else {
            RiskLevel::Lower
        }
    }

    /// The advisory sentence shown alongside the numeric result.
    pub fn advisory(&self) -> &'static str {
        match self {
            RiskLevel::Higher => "This patient has a higher predicted risk of readmission.",
            RiskLevel::Lower => "This patient has a lower predicted risk of readmission.",
        }
    }

    /// Banner style for the advisory, mirroring warning/info styling.
    pub fn banner(&self) -> &'static str {
        match self {
            RiskLevel::Higher => "warning",
            RiskLevel::Lower => "info",
        }
    }
}

/// A completed prediction: the raw probability plus its threshold verdict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub probability: f64,
    pub level: RiskLevel,
}

impl RiskAssessment {
    pub fn from_probability(probability: f64) -> Self {
        Self {
            probability,
            level: RiskLevel::from_probability(probability),
        }
    }

    /// The probability rendered to two decimal places for display.
    pub fn formatted(&self) -> String {
        format!("{:.2}", self.probability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_above_threshold_is_higher() {
        assert_eq!(RiskLevel::from_probability(0.73), RiskLevel::Higher);
        assert_eq!(RiskLevel::from_probability(1.0), RiskLevel::Higher);
    }

    #[test]
    fn test_at_or_below_threshold_is_lower() {
        assert_eq!(RiskLevel::from_probability(0.5), RiskLevel::Lower);
        assert_eq!(RiskLevel::from_probability(0.1), RiskLevel::Lower);
        assert_eq!(RiskLevel::from_probability(0.0), RiskLevel::Lower);
    }

    #[test]
    fn test_threshold_comparison_is_strict() {
        assert_eq!(RiskLevel::from_probability(0.5000001), RiskLevel::Higher);
        assert_eq!(RiskLevel::from_probability(0.4999999), RiskLevel::Lower);
    }

    #[test]
    fn test_advisory_sentences() {
        assert_eq!(
            RiskLevel::Higher.advisory(),
            "This patient has a higher predicted risk of readmission."
        );
        assert_eq!(
            RiskLevel::Lower.advisory(),
            "This patient has a lower predicted risk of readmission."
        );
    }

    #[test]
    fn test_banner_styles() {
        assert_eq!(RiskLevel::Higher.banner(), "warning");
        assert_eq!(RiskLevel::Lower.banner(), "info");
    }

    #[test]
    fn test_formatted_rounds_to_two_decimals() {
        assert_eq!(RiskAssessment::from_probability(0.7312).formatted(), "0.73");
        assert_eq!(RiskAssessment::from_probability(0.005).formatted(), "0.01");
        assert_eq!(RiskAssessment::from_probability(0.0).formatted(), "0.00");
        assert_eq!(RiskAssessment::from_probability(1.0).formatted(), "1.00");
    }

    #[test]
    fn test_level_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(RiskLevel::Higher).expect("serialize"),
            serde_json::json!("higher")
        );
        assert_eq!(
            serde_json::to_value(RiskLevel::Lower).expect("serialize"),
            serde_json::json!("lower")
        );
    }
}
