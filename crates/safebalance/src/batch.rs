//! Batch items and batch configuration.

use crate::decision::{Label, PredictionResult};
use serde::{Deserialize, Serialize};

/// Placeholder name for a record without `company_name`.
pub const UNKNOWN_COMPANY: &str = "Unknown";

/// Message reported for a record that failed for reasons other than its input.
pub const INTERNAL_ERROR_MESSAGE: &str = "internal error while scoring record";

/// Result for one record of a batch: either scored or failed, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchItem {
    /// The record was scored
    Scored {
        /// Caller-supplied label, or [`UNKNOWN_COMPANY`]
        company_name: String,
        /// Binary outcome
        #[serde(rename = "prediction")]
        label: Label,
        /// Probability of failure, rounded to 4 decimals
        probability: f64,
        /// Integer risk score
        risk_score: u8,
    },
    /// The record could not be scored
    Failed {
        /// Caller-supplied label, or [`UNKNOWN_COMPANY`]
        company_name: String,
        /// Why the record was not scored
        error: String,
    },
}

impl BatchItem {
    /// Successful item from a full prediction.
    pub fn scored(company_name: impl Into<String>, result: &PredictionResult) -> Self {
        Self::Scored {
            company_name: company_name.into(),
            label: result.label,
            probability: result.probability,
            risk_score: result.risk_score,
        }
    }

    /// Failed item.
    pub fn failed(company_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self::Failed {
            company_name: company_name.into(),
            error: error.into(),
        }
    }

    /// Company label of the item.
    pub fn company_name(&self) -> &str {
        match self {
            Self::Scored { company_name, .. } | Self::Failed { company_name, .. } => company_name,
        }
    }

    /// Whether the record was scored.
    pub const fn is_scored(&self) -> bool {
        matches!(self, Self::Scored { .. })
    }

    /// Label, for a scored item.
    pub const fn label(&self) -> Option<Label> {
        match self {
            Self::Scored { label, .. } => Some(*label),
            Self::Failed { .. } => None,
        }
    }

    /// Probability, for a scored item.
    pub const fn probability(&self) -> Option<f64> {
        match self {
            Self::Scored { probability, .. } => Some(*probability),
            Self::Failed { .. } => None,
        }
    }

    /// Risk score, for a scored item.
    pub const fn risk_score(&self) -> Option<u8> {
        match self {
            Self::Scored { risk_score, .. } => Some(*risk_score),
            Self::Failed { .. } => None,
        }
    }

    /// Error message, for a failed item.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Scored { .. } => None,
            Self::Failed { error, .. } => Some(error),
        }
    }
}

/// How a batch is executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Score records on the rayon pool
    pub parallel: bool,
    /// Batches smaller than this run sequentially even when `parallel` is set
    pub min_parallel_len: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            min_parallel_len: 64,
        }
    }
}

impl BatchConfig {
    /// Config that always scores in parallel.
    pub const fn parallel() -> Self {
        Self {
            parallel: true,
            min_parallel_len: 0,
        }
    }

    /// Whether a batch of `len` records runs in parallel.
    pub const fn runs_parallel(&self, len: usize) -> bool {
        self.parallel && len >= self.min_parallel_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::decide;
    use serde_json::json;

    #[test]
    fn test_scored_shape() {
        let item = BatchItem::scored("Acme", &decide(0.7502601));
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({
                "company_name": "Acme",
                "prediction": "Failed",
                "probability": 0.7503,
                "risk_score": 75
            })
        );
        assert_eq!(item.label(), Some(Label::Failed));
        assert_eq!(item.error(), None);
    }

    #[test]
    fn test_failed_shape() {
        let item = BatchItem::failed(UNKNOWN_COMPANY, "Missing required field: X5");
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({"company_name": "Unknown", "error": "Missing required field: X5"})
        );
        assert!(!item.is_scored());
        assert_eq!(item.probability(), None);
        assert_eq!(item.risk_score(), None);
    }

    #[test]
    fn test_deserialize_both_shapes() {
        let items: Vec<BatchItem> = serde_json::from_value(json!([
            {"company_name": "A", "prediction": "Alive", "probability": 0.1, "risk_score": 10},
            {"company_name": "B", "error": "boom"}
        ]))
        .unwrap();
        assert!(items[0].is_scored());
        assert_eq!(items[1].error(), Some("boom"));
        assert_eq!(items[1].company_name(), "B");
    }

    #[test]
    fn test_config_defaults() {
        let config: BatchConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, BatchConfig::default());
        assert!(!config.runs_parallel(1000));
        assert!(BatchConfig::parallel().runs_parallel(1));

        let config: BatchConfig = serde_json::from_str(r#"{"parallel": true}"#).unwrap();
        assert!(!config.runs_parallel(10));
        assert!(config.runs_parallel(64));
    }
}
