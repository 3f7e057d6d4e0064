//! Error types for model loading and inference.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a classifier. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The model artifact could not be read
    #[error("Failed to read model {path}: {source}")]
    Io {
        /// Path of the artifact
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The model artifact is not valid JSON or does not have the expected shape
    #[error("Model JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The learning objective does not produce a probability
    #[error("Unsupported objective: {0}")]
    UnsupportedObjective(String),

    /// The booster type cannot be scored
    #[error("Unsupported booster: {0}")]
    UnsupportedBooster(String),

    /// The model uses a feature this reader does not implement
    #[error("Unsupported model: {0}")]
    Unsupported(String),

    /// A model parameter is missing or malformed
    #[error("Invalid model parameter {name}: {value:?}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Raw value
        value: String,
    },

    /// A tree is structurally broken
    #[error("Invalid tree {tree}: {reason}")]
    InvalidTree {
        /// Tree position in the ensemble
        tree: usize,
        /// What is wrong with it
        reason: String,
    },

    /// The ensemble has no trees to score
    #[error("Model contains no trees")]
    Empty,

    /// The classifier was trained on different feature columns
    #[error("Feature schema mismatch: {0}")]
    SchemaMismatch(String),
}

/// Errors raised while scoring a single feature vector.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    /// The feature vector has the wrong length
    #[error("Expected {expected} features, got {actual}")]
    FeatureCount {
        /// Length the classifier was trained on
        expected: usize,
        /// Length received
        actual: usize,
    },

    /// The classifier scored a different number of rows than it was given
    #[error("Classifier returned {actual} probabilities for {expected} rows")]
    RowCount {
        /// Rows passed in
        expected: usize,
        /// Probabilities returned
        actual: usize,
    },

    /// The classifier produced something that is not a probability
    #[error("Classifier returned invalid probability {0}")]
    InvalidProbability(f64),
}
