#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/safebalance/safebalance/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod classifier;
pub mod engine;
pub mod error;
pub mod xgboost;

// Re-export main types
pub use classifier::{Classifier, FnClassifier};
pub use engine::{InferenceEngine, check_schema};
pub use error::{InferenceError, ModelError};
pub use xgboost::XgbClassifier;
