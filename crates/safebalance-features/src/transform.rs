//! Record to feature vector pipeline.
//!
//! The steps run in a fixed order: year resolution, division one-hot,
//! major-group frequency encoding, ratio engineering (with log compression),
//! then assembly into column order. The transform is pure and never touches
//! the encoding tables except to read them.

use crate::encoding::major_group_frequency;
use crate::error::Result;
use crate::ratios::compute_ratios;
use crate::record::{INDICATOR_COUNT, RawRecord, ValidatedRecord};
use crate::schema::{
    DIVISION_OFFSET, FEATURE_COUNT, FYEAR_INDEX, FeatureVector, INDICATOR_OFFSET,
    MAJOR_GROUP_INDEX, RATIO_OFFSET,
};

/// Validate a raw record and build its feature vector.
///
/// Fails with [`FeatureError::MissingField`](crate::FeatureError::MissingField)
/// or [`FeatureError::InvalidNumber`](crate::FeatureError::InvalidNumber) when
/// one of `X1..X18` is unusable.
pub fn transform(record: &RawRecord) -> Result<FeatureVector> {
    let validated = record.validate()?;
    Ok(transform_validated(&validated))
}

/// Build the feature vector of an already validated record.
pub fn transform_validated(record: &ValidatedRecord) -> FeatureVector {
    let mut values = [0.0; FEATURE_COUNT];

    values[FYEAR_INDEX] = record.fyear;

    values[INDICATOR_OFFSET..INDICATOR_OFFSET + INDICATOR_COUNT]
        .copy_from_slice(record.indicators.as_array());

    if let Some(slot) = record.division.and_then(|d| d.indicator_index()) {
        values[DIVISION_OFFSET + slot] = 1.0;
    }

    values[MAJOR_GROUP_INDEX] = f64::from(major_group_frequency(record.major_group.as_deref()));

    let ratios = compute_ratios(&record.indicators);
    values[RATIO_OFFSET..].copy_from_slice(&ratios);

    FeatureVector::from_values(values)
}
