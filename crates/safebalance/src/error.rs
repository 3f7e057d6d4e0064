//! Pipeline error types.

use safebalance_features::FeatureError;
use safebalance_model::InferenceError;
use thiserror::Error;

/// Failure to score a single record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    /// The record is missing a field or holds a non-numeric value
    #[error(transparent)]
    Feature(#[from] FeatureError),

    /// The classifier could not produce a valid probability
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl PredictError {
    /// Whether the caller caused the failure and can fix it by correcting the
    /// input.
    pub const fn is_client_error(&self) -> bool {
        match self {
            Self::Feature(e) => e.is_client_error(),
            Self::Inference(_) => false,
        }
    }
}

/// Failure of a batch as a whole. Per-record failures never surface here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BatchError {
    /// The batch contained no records
    #[error("No companies provided")]
    Empty,
}
