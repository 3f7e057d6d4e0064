//! Decision layer
//!
//! Turns a probability of failure into the reported outcome: a binary label,
//! an integer risk score, and a coarse risk band. Pure and total.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Probability at or above which a company is labelled [`Label::Failed`].
pub const THRESHOLD: f64 = 0.35;

/// Binary outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum Label {
    /// Probability at or above [`THRESHOLD`]
    #[display("Failed")]
    Failed,
    /// Probability below [`THRESHOLD`]
    #[display("Alive")]
    Alive,
}

impl Label {
    /// Label for a probability.
    pub fn from_probability(probability: f64) -> Self {
        if probability >= THRESHOLD {
            Self::Failed
        } else {
            Self::Alive
        }
    }
}

/// Risk band, ordered from lowest to highest risk.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
pub enum RiskCategory {
    /// Score below 20
    #[display("Very Low Risk")]
    #[serde(rename = "Very Low Risk")]
    VeryLow,
    /// Score 20 to 34
    #[display("Low Risk")]
    #[serde(rename = "Low Risk")]
    Low,
    /// Score 35 to 49
    #[display("Moderate Risk")]
    #[serde(rename = "Moderate Risk")]
    Moderate,
    /// Score 50 to 69
    #[display("High Risk")]
    #[serde(rename = "High Risk")]
    High,
    /// Score 70 and above
    #[display("Very High Risk")]
    #[serde(rename = "Very High Risk")]
    VeryHigh,
}

impl RiskCategory {
    /// Band for a risk score.
    pub const fn from_score(score: u8) -> Self {
        match score {
            0..20 => Self::VeryLow,
            20..35 => Self::Low,
            35..50 => Self::Moderate,
            50..70 => Self::High,
            _ => Self::VeryHigh,
        }
    }

    /// All bands, lowest first.
    pub const fn all() -> [Self; 5] {
        [
            Self::VeryLow,
            Self::Low,
            Self::Moderate,
            Self::High,
            Self::VeryHigh,
        ]
    }
}

/// Outcome for one record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Binary outcome
    #[serde(rename = "prediction")]
    pub label: Label,
    /// Probability of failure, rounded to 4 decimals
    pub probability: f64,
    /// `floor(probability * 100)`
    pub risk_score: u8,
    /// Band of `risk_score`
    pub risk_category: RiskCategory,
    /// Decision threshold in force
    pub threshold: f64,
}

impl fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (probability {:.4}, risk score {}, {})",
            self.label, self.probability, self.risk_score, self.risk_category
        )
    }
}

/// Integer risk score in `0..=100` for a probability.
pub fn risk_score(probability: f64) -> u8 {
    // NaN casts to 0
    (probability * 100.0).floor().clamp(0.0, 100.0) as u8
}

/// Round to 4 decimal places, ties to even.
///
/// Probabilities come from `f32` arithmetic, so exact ties such as `0.53125`
/// do occur.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round_ties_even() / 10_000.0
}

/// Map a probability to the reported outcome.
///
/// The label and score are computed from the unrounded probability; only the
/// reported probability is rounded.
///
/// # Examples
///
/// ```
/// use safebalance::{Label, RiskCategory, decide};
///
/// let result = decide(0.7502601);
/// assert_eq!(result.label, Label::Failed);
/// assert_eq!(result.probability, 0.7503);
/// assert_eq!(result.risk_score, 75);
/// assert_eq!(result.risk_category, RiskCategory::VeryHigh);
/// ```
pub fn decide(probability: f64) -> PredictionResult {
    let risk_score = risk_score(probability);
    PredictionResult {
        label: Label::from_probability(probability),
        probability: round4(probability),
        risk_score,
        risk_category: RiskCategory::from_score(risk_score),
        threshold: THRESHOLD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::at_threshold(0.35, Label::Failed)]
    #[case::just_below(0.349999, Label::Alive)]
    #[case::zero(0.0, Label::Alive)]
    #[case::one(1.0, Label::Failed)]
    fn test_threshold_boundary(#[case] p: f64, #[case] expected: Label) {
        assert_eq!(decide(p).label, expected);
    }

    #[rstest]
    #[case(19, RiskCategory::VeryLow)]
    #[case(20, RiskCategory::Low)]
    #[case(34, RiskCategory::Low)]
    #[case(35, RiskCategory::Moderate)]
    #[case(49, RiskCategory::Moderate)]
    #[case(50, RiskCategory::High)]
    #[case(69, RiskCategory::High)]
    #[case(70, RiskCategory::VeryHigh)]
    #[case(0, RiskCategory::VeryLow)]
    #[case(100, RiskCategory::VeryHigh)]
    fn test_category_boundaries(#[case] score: u8, #[case] expected: RiskCategory) {
        assert_eq!(RiskCategory::from_score(score), expected);
    }

    #[rstest]
    #[case(0.35, 35)]
    #[case(0.349999, 34)]
    #[case(0.29, 28)]
    #[case(0.999, 99)]
    #[case(1.0, 100)]
    #[case(0.0, 0)]
    fn test_risk_score_floors(#[case] p: f64, #[case] expected: u8) {
        assert_eq!(risk_score(p), expected);
    }

    #[rstest]
    #[case(-0.5, 0)]
    #[case(3.0, 100)]
    #[case(f64::NAN, 0)]
    fn test_risk_score_clamps(#[case] p: f64, #[case] expected: u8) {
        assert_eq!(risk_score(p), expected);
    }

    #[rstest]
    #[case::tie_rounds_down_to_even(0.53125, 0.5312)]
    #[case::small_tie(0.03125, 0.0312)]
    #[case::tie_rounds_up_to_even(0.96875, 0.9688)]
    #[case::no_tie(0.7502601, 0.7503)]
    fn test_round4_ties_to_even(#[case] p: f64, #[case] expected: f64) {
        assert_eq!(round4(p), expected);
        assert_eq!(decide(p).probability, expected);
    }

    #[test]
    fn test_probability_rounded() {
        let result = decide(0.354343_7);
        assert_eq!(result.probability, 0.3543);
        assert_eq!(result.risk_score, 35);
        assert_eq!(result.risk_category, RiskCategory::Moderate);
        assert_eq!(result.threshold, THRESHOLD);
    }

    #[test]
    fn test_categories_are_ordered() {
        let all = RiskCategory::all();
        assert!(all.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_display_strings() {
        assert_eq!(Label::Failed.to_string(), "Failed");
        assert_eq!(Label::Alive.to_string(), "Alive");
        let names: Vec<String> = RiskCategory::all().iter().map(ToString::to_string).collect();
        assert_eq!(
            names,
            vec!["Very Low Risk", "Low Risk", "Moderate Risk", "High Risk", "Very High Risk"]
        );
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(decide(0.7502601)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "prediction": "Failed",
                "probability": 0.7503,
                "risk_score": 75,
                "risk_category": "Very High Risk",
                "threshold": 0.35
            })
        );
    }

    #[test]
    fn test_display_result() {
        assert_eq!(
            decide(0.1).to_string(),
            "Alive (probability 0.1000, risk score 10, Very Low Risk)"
        );
    }
}
