//! The classifier capability consumed by the inference engine.

use crate::error::InferenceError;
use ndarray::{Array1, ArrayView2};
use std::fmt;

/// A model that maps an ordered feature vector to a probability of failure.
///
/// Implementations are shared read-only across threads, so scoring must not
/// mutate the model.
pub trait Classifier: Send + Sync + fmt::Debug {
    /// Number of features the model was trained on.
    fn num_features(&self) -> usize;

    /// Feature column names the model was trained on, when the artifact
    /// records them.
    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    /// Probability of the positive (failed) class for one feature vector.
    fn predict_probability(&self, features: &[f64]) -> Result<f64, InferenceError>;

    /// Score every row of a feature matrix.
    fn predict_batch(&self, features: ArrayView2<'_, f64>) -> Result<Array1<f64>, InferenceError> {
        let mut out = Array1::zeros(features.nrows());
        for (i, row) in features.rows().into_iter().enumerate() {
            out[i] = self.predict_probability(&row.to_vec())?;
        }
        Ok(out)
    }
}

/// Classifier backed by a plain function.
///
/// Useful for fixed scorecards and for exercising the pipeline without a
/// trained model.
///
/// # Examples
///
/// ```
/// use safebalance_model::{Classifier, FnClassifier};
///
/// let always = FnClassifier::new(37, |_: &[f64]| 0.5);
/// assert_eq!(always.predict_probability(&[0.0; 37]), Ok(0.5));
/// ```
pub struct FnClassifier<F> {
    num_features: usize,
    feature_names: Option<Vec<String>>,
    score: F,
}

impl<F> FnClassifier<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    /// Wrap a scoring function expecting `num_features` inputs.
    pub const fn new(num_features: usize, score: F) -> Self {
        Self {
            num_features,
            feature_names: None,
            score,
        }
    }

    /// Declare the feature names the function was built against.
    pub fn with_feature_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.feature_names = Some(names.into_iter().map(Into::into).collect());
        self
    }
}

impl<F> fmt::Debug for FnClassifier<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnClassifier")
            .field("num_features", &self.num_features)
            .field("feature_names", &self.feature_names)
            .finish_non_exhaustive()
    }
}

impl<F> Classifier for FnClassifier<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn num_features(&self) -> usize {
        self.num_features
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn predict_probability(&self, features: &[f64]) -> Result<f64, InferenceError> {
        if features.len() != self.num_features {
            return Err(InferenceError::FeatureCount {
                expected: self.num_features,
                actual: features.len(),
            });
        }
        Ok((self.score)(features))
    }
}
