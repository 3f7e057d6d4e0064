//! XGBoost gradient-boosted tree classifier.
//!
//! Reads the JSON model format written by `Booster.save_model("*.json")` for
//! the `binary:logistic` and `reg:logistic` objectives and scores it natively.
//! Feature values are cast to `f32` before traversal and leaf values are
//! accumulated in `f32`, which is how XGBoost computes the margin.

mod format;
mod tree;

use crate::classifier::Classifier;
use crate::error::{InferenceError, ModelError};
use format::{GbtreeModel, GradientBooster, ModelDocument};
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use tree::RegressionTree;

/// Objectives whose output is a probability through the logistic link.
pub const SUPPORTED_OBJECTIVES: [&str; 2] = ["binary:logistic", "reg:logistic"];

/// Boosted tree ensemble with a logistic output.
#[derive(Debug, Clone)]
pub struct XgbClassifier {
    trees: Vec<RegressionTree>,
    tree_weights: Vec<f32>,
    base_margin: f32,
    num_features: usize,
    feature_names: Option<Vec<String>>,
    objective: String,
}

impl XgbClassifier {
    /// Load a model from a JSON artifact on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model = Self::from_json_str(&text)?;
        info!(
            trees = model.num_trees(),
            features = model.num_features,
            objective = %model.objective,
            model = %path.display(),
            "loaded xgboost model"
        );
        Ok(model)
    }

    /// Parse a model from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        let doc: ModelDocument = serde_json::from_str(json)?;
        Self::from_document(doc)
    }

    fn from_document(doc: ModelDocument) -> Result<Self, ModelError> {
        debug!(version = ?doc.version, "reading xgboost model");
        let learner = doc.learner;
        let params = &learner.learner_model_param;

        let objective = learner.objective.name;
        if !SUPPORTED_OBJECTIVES.contains(&objective.as_str()) {
            return Err(ModelError::UnsupportedObjective(objective));
        }

        let num_class: usize = parse_param("num_class", &params.num_class)?;
        if num_class > 1 {
            return Err(ModelError::Unsupported(format!(
                "multi-class model with {num_class} classes"
            )));
        }
        let num_features: usize = parse_param("num_feature", &params.num_feature)?;
        let base_margin = base_margin(&params.base_score)?;

        let feature_names = if learner.feature_names.is_empty() {
            None
        } else if learner.feature_names.len() != num_features {
            return Err(ModelError::InvalidParameter {
                name: "feature_names",
                value: format!(
                    "{} names for {num_features} features",
                    learner.feature_names.len()
                ),
            });
        } else {
            Some(learner.feature_names)
        };

        let (model, weights) = booster_trees(learner.gradient_booster)?;
        let num_parallel_tree: usize = match &model.gbtree_model_param.num_parallel_tree {
            Some(raw) => parse_param("num_parallel_tree", raw)?,
            None => 1,
        };

        let mut trees = model
            .trees
            .iter()
            .enumerate()
            .map(|(i, t)| RegressionTree::from_document(i, t, num_features))
            .collect::<Result<Vec<_>, _>>()?;
        let mut tree_weights = match weights {
            Some(w) if w.len() == trees.len() => w,
            Some(w) => {
                return Err(ModelError::InvalidParameter {
                    name: "weight_drop",
                    value: format!("{} weights for {} trees", w.len(), trees.len()),
                });
            }
            None => vec![1.0; trees.len()],
        };

        // Early stopping keeps every round in the artifact; scoring stops at
        // the best one.
        if let Some(raw) = learner.attributes.get("best_iteration") {
            let best: usize = parse_param("best_iteration", raw)?;
            let keep = (best + 1).saturating_mul(num_parallel_tree.max(1));
            if keep < trees.len() {
                debug!(best_iteration = best, kept = keep, total = trees.len(), "truncating ensemble");
                trees.truncate(keep);
                tree_weights.truncate(keep);
            }
        }

        if trees.is_empty() {
            return Err(ModelError::Empty);
        }

        Ok(Self {
            trees,
            tree_weights,
            base_margin,
            num_features,
            feature_names,
            objective,
        })
    }

    /// Number of trees used for scoring.
    pub const fn num_trees(&self) -> usize {
        self.trees.len()
    }

    /// Total leaves across the scored trees.
    pub fn num_leaves(&self) -> usize {
        self.trees.iter().map(RegressionTree::num_leaves).sum()
    }

    /// Learning objective recorded in the artifact.
    pub fn objective(&self) -> &str {
        &self.objective
    }

    /// Raw margin (log-odds) for one feature vector.
    pub fn margin(&self, features: &[f64]) -> Result<f32, InferenceError> {
        if features.len() != self.num_features {
            return Err(InferenceError::FeatureCount {
                expected: self.num_features,
                actual: features.len(),
            });
        }
        let row: Vec<f32> = features.iter().map(|&v| v as f32).collect();
        let sum = self
            .trees
            .iter()
            .zip(&self.tree_weights)
            .fold(self.base_margin, |acc, (tree, w)| acc + w * tree.predict(&row));
        Ok(sum)
    }
}

impl Classifier for XgbClassifier {
    fn num_features(&self) -> usize {
        self.num_features
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn predict_probability(&self, features: &[f64]) -> Result<f64, InferenceError> {
        let margin = self.margin(features)?;
        Ok(f64::from(sigmoid(margin)))
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

fn booster_trees(booster: GradientBooster) -> Result<(GbtreeModel, Option<Vec<f32>>), ModelError> {
    match booster.name.as_str() {
        "gbtree" => {
            let model = booster.model.ok_or_else(|| missing("gradient_booster.model"))?;
            Ok((serde_json::from_value(model)?, None))
        }
        "dart" => {
            let weights = booster.weight_drop;
            let inner = booster.gbtree.ok_or_else(|| missing("gradient_booster.gbtree"))?;
            let model = inner
                .model
                .ok_or_else(|| missing("gradient_booster.gbtree.model"))?;
            Ok((serde_json::from_value(model)?, Some(weights)))
        }
        other => Err(ModelError::UnsupportedBooster(other.to_string())),
    }
}

const fn missing(name: &'static str) -> ModelError {
    ModelError::InvalidParameter {
        name,
        value: String::new(),
    }
}

fn parse_param<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T, ModelError> {
    raw.trim().parse().map_err(|_| ModelError::InvalidParameter {
        name,
        value: raw.to_string(),
    })
}

/// Logit of the stored base score. Newer releases write it as a one-element
/// list, e.g. `"[5E-1]"`.
fn base_margin(raw: &str) -> Result<f32, ModelError> {
    let inner = raw.trim().trim_start_matches('[').trim_end_matches(']');
    let first = inner.split(',').next().unwrap_or_default();
    let p: f32 = parse_param("base_score", first)?;
    if !(p > 0.0 && p < 1.0) {
        return Err(ModelError::InvalidParameter {
            name: "base_score",
            value: raw.to_string(),
        });
    }
    Ok((p / (1.0 - p)).ln())
}
