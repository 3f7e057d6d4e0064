//! Serde view of the XGBoost JSON model document.
//!
//! Only the fields needed for scoring are read. XGBoost stores most scalar
//! parameters as strings, so they are kept as `String` here and parsed by the
//! loader.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
pub(crate) struct ModelDocument {
    pub(crate) learner: Learner,
    #[serde(default)]
    pub(crate) version: Vec<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Learner {
    #[serde(default)]
    pub(crate) attributes: HashMap<String, String>,
    #[serde(default)]
    pub(crate) feature_names: Vec<String>,
    pub(crate) gradient_booster: GradientBooster,
    pub(crate) learner_model_param: LearnerModelParam,
    pub(crate) objective: Objective,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LearnerModelParam {
    pub(crate) base_score: String,
    #[serde(default = "zero")]
    pub(crate) num_class: String,
    pub(crate) num_feature: String,
}

fn zero() -> String {
    "0".to_string()
}

#[derive(Debug, Deserialize)]
pub(crate) struct Objective {
    pub(crate) name: String,
}

/// `gbtree` carries `model` directly. `dart` nests a `gbtree` and adds one
/// weight per tree. The payload stays untyped until the name is known, since
/// other boosters store something other than trees under `model`.
#[derive(Debug, Deserialize)]
pub(crate) struct GradientBooster {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) model: Option<Value>,
    #[serde(default)]
    pub(crate) gbtree: Option<Box<GradientBooster>>,
    #[serde(default)]
    pub(crate) weight_drop: Vec<f32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GbtreeModel {
    #[serde(default)]
    pub(crate) gbtree_model_param: GbtreeModelParam,
    pub(crate) trees: Vec<TreeDocument>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GbtreeModelParam {
    #[serde(default)]
    pub(crate) num_parallel_tree: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TreeDocument {
    pub(crate) left_children: Vec<i64>,
    pub(crate) right_children: Vec<i64>,
    pub(crate) split_indices: Vec<i64>,
    pub(crate) split_conditions: Vec<f32>,
    pub(crate) default_left: Vec<Flag>,
    #[serde(default)]
    pub(crate) split_type: Vec<i64>,
}

/// `default_left` is written as integers by XGBoost 1.x and as booleans by
/// later releases.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub(crate) enum Flag {
    Bool(bool),
    Int(i64),
}

impl Flag {
    pub(crate) const fn is_set(self) -> bool {
        match self {
            Self::Bool(b) => b,
            Self::Int(i) => i != 0,
        }
    }
}
