#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/safebalance/safebalance/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod batch;
pub mod decision;
pub mod error;
pub mod predictor;

// Re-export main types from sub-crates
pub use safebalance_features as features;
pub use safebalance_model as model;

pub use batch::{BatchConfig, BatchItem, INTERNAL_ERROR_MESSAGE, UNKNOWN_COMPANY};
pub use decision::{Label, PredictionResult, RiskCategory, THRESHOLD, decide, risk_score};
pub use error::{BatchError, PredictError};
pub use features::{FeatureVector, RawRecord, transform};
pub use predictor::DistressPredictor;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
