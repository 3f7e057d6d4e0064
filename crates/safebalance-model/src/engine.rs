//! Inference engine
//!
//! Owns the shared classifier for the lifetime of the process and turns a
//! [`FeatureVector`] into a probability. The feature contract between the
//! pipeline and the classifier is checked once, when the engine is built,
//! instead of on every request.

use crate::classifier::Classifier;
use crate::error::{InferenceError, ModelError};
use ndarray::Array1;
use safebalance_features::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector, stack_features};
use std::sync::Arc;
use tracing::warn;

/// Read-only scoring handle, cheap to clone and share across threads.
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    classifier: Arc<dyn Classifier>,
}

impl InferenceEngine {
    /// Wrap a classifier after checking that it was trained on the pipeline's
    /// feature columns.
    ///
    /// # Errors
    ///
    /// [`ModelError::SchemaMismatch`] when the classifier expects a different
    /// number of features, or records names that differ from
    /// [`FEATURE_NAMES`] in content or order.
    pub fn new(classifier: Arc<dyn Classifier>) -> Result<Self, ModelError> {
        check_schema(classifier.as_ref())?;
        Ok(Self { classifier })
    }

    /// Probability of failure for one record.
    pub fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        let p = self.classifier.predict_probability(features.as_slice())?;
        check_probability(p)
    }

    /// Probabilities for many records, in input order.
    pub fn predict_batch(&self, vectors: &[FeatureVector]) -> Result<Array1<f64>, InferenceError> {
        let matrix = stack_features(vectors);
        let out = self.classifier.predict_batch(matrix.view())?;
        if out.len() != vectors.len() {
            return Err(InferenceError::RowCount {
                expected: vectors.len(),
                actual: out.len(),
            });
        }
        for &p in &out {
            check_probability(p)?;
        }
        Ok(out)
    }

    /// The wrapped classifier.
    pub const fn classifier(&self) -> &Arc<dyn Classifier> {
        &self.classifier
    }
}

/// Verify that `classifier` consumes exactly the pipeline's feature columns.
///
/// A classifier that does not record feature names passes with a warning,
/// since only the column count can be checked.
pub fn check_schema(classifier: &dyn Classifier) -> Result<(), ModelError> {
    let n = classifier.num_features();
    if n != FEATURE_COUNT {
        return Err(ModelError::SchemaMismatch(format!(
            "classifier expects {n} features, pipeline produces {FEATURE_COUNT}"
        )));
    }

    match classifier.feature_names() {
        Some(names) if !names.is_empty() => {
            if names.len() != FEATURE_COUNT {
                return Err(ModelError::SchemaMismatch(format!(
                    "classifier records {} feature names for {n} features",
                    names.len()
                )));
            }
            if let Some((i, (got, want))) = names
                .iter()
                .zip(FEATURE_NAMES.iter())
                .enumerate()
                .find(|(_, (got, want))| got.as_str() != **want)
            {
                return Err(ModelError::SchemaMismatch(format!(
                    "column {i}: classifier expects {got:?}, pipeline produces {want:?}"
                )));
            }
        }
        _ => warn!(
            features = n,
            "classifier records no feature names, only the column count was checked"
        ),
    }
    Ok(())
}

fn check_probability(p: f64) -> Result<f64, InferenceError> {
    if (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(InferenceError::InvalidProbability(p))
    }
}
