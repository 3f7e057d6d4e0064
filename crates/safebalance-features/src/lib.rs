#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/safebalance/safebalance/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod encoding;
pub mod error;
pub mod ratios;
pub mod record;
pub mod schema;
pub mod transform;

pub use encoding::Division;
pub use error::{FeatureError, Result};
pub use ratios::{RATIO_DEFINITIONS, RatioDefinition, signed_log1p};
pub use record::{FieldValue, Indicators, RawRecord, ValidatedRecord};
pub use schema::{
    FEATURE_COUNT, FEATURE_NAMES, FeatureCategory, FeatureInfo, FeatureVector,
    available_features, feature_index, features_by_category, stack_features,
};
pub use transform::{transform, transform_validated};
