//! Feature schema
//!
//! Column order of the feature vector and per-column metadata. The classifier
//! was trained on exactly this order, so [`FEATURE_NAMES`] is the single source
//! of truth for it.

use crate::encoding::DIVISION_INDICATOR_COUNT;
use crate::ratios::{RATIO_COUNT, RATIO_DEFINITIONS};
use crate::record::{DEFAULT_FYEAR, INDICATOR_COUNT};
use ndarray::{Array1, Array2};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// Number of slots in a feature vector.
pub const FEATURE_COUNT: usize = 1 + INDICATOR_COUNT + DIVISION_INDICATOR_COUNT + 1 + RATIO_COUNT;

/// Feature column names, in the order the classifier expects.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "fyear",
    "X1",
    "X2",
    "X3",
    "X4",
    "X5",
    "X6",
    "X7",
    "X8",
    "X9",
    "X10",
    "X11",
    "X12",
    "X13",
    "X14",
    "X15",
    "X16",
    "X17",
    "X18",
    "Division_B",
    "Division_C",
    "Division_D",
    "Division_E",
    "Division_F",
    "Division_G",
    "Division_H",
    "Division_I",
    "MajorGroup_freq",
    "Leverage_Ratio",
    "Current_Ratio",
    "Profit_Margin",
    "Asset_Turnover",
    "Debt_to_Equity",
    "EBIT_Margin",
    "Gross_Margin",
    "Receivables_Ratio",
    "Inventory_Turnover",
];

pub(crate) const FYEAR_INDEX: usize = 0;
pub(crate) const INDICATOR_OFFSET: usize = 1;
pub(crate) const DIVISION_OFFSET: usize = INDICATOR_OFFSET + INDICATOR_COUNT;
pub(crate) const MAJOR_GROUP_INDEX: usize = DIVISION_OFFSET + DIVISION_INDICATOR_COUNT;
pub(crate) const RATIO_OFFSET: usize = MAJOR_GROUP_INDEX + 1;

/// Feature categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureCategory {
    /// Fiscal year
    Year,
    /// Raw financial indicators (X1..X18)
    Indicator,
    /// Division one-hot indicators
    Division,
    /// Major group frequency encoding
    MajorGroup,
    /// Engineered ratios
    Ratio,
}

impl FeatureCategory {
    /// Lower-case label for display.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Indicator => "indicator",
            Self::Division => "division",
            Self::MajorGroup => "major_group",
            Self::Ratio => "ratio",
        }
    }
}

/// Feature metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureInfo {
    /// Column name
    pub name: &'static str,
    /// Position in the feature vector
    pub index: usize,
    /// Feature category
    pub category: FeatureCategory,
    /// How the value is derived
    pub description: &'static str,
}

const fn category_of(index: usize) -> FeatureCategory {
    if index == FYEAR_INDEX {
        FeatureCategory::Year
    } else if index < DIVISION_OFFSET {
        FeatureCategory::Indicator
    } else if index < MAJOR_GROUP_INDEX {
        FeatureCategory::Division
    } else if index == MAJOR_GROUP_INDEX {
        FeatureCategory::MajorGroup
    } else {
        FeatureCategory::Ratio
    }
}

fn description_of(index: usize) -> &'static str {
    match category_of(index) {
        FeatureCategory::Year => "Fiscal year, 2020 when not supplied",
        FeatureCategory::Indicator => "Raw financial indicator",
        FeatureCategory::Division => "1 when the record's division owns this column",
        FeatureCategory::MajorGroup => "Training-set frequency of the major group code",
        FeatureCategory::Ratio => RATIO_DEFINITIONS[index - RATIO_OFFSET].description,
    }
}

/// Get metadata for every feature, in column order
pub fn available_features() -> Vec<FeatureInfo> {
    FEATURE_NAMES
        .iter()
        .copied()
        .enumerate()
        .map(|(index, name)| FeatureInfo {
            name,
            index,
            category: category_of(index),
            description: description_of(index),
        })
        .collect()
}

/// Get features by category
pub fn features_by_category(category: FeatureCategory) -> Vec<FeatureInfo> {
    available_features()
        .into_iter()
        .filter(|f| f.category == category)
        .collect()
}

/// Position of a feature by name
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_NAMES.iter().position(|f| *f == name)
}

/// Get feature info by name
pub fn get_feature_info(name: &str) -> Option<FeatureInfo> {
    feature_index(name).map(|index| available_features().swap_remove(index))
}

/// Count features by category
pub fn count_by_category() -> HashMap<FeatureCategory, usize> {
    let mut counts = HashMap::new();
    for feature in available_features() {
        *counts.entry(feature.category).or_insert(0) += 1;
    }
    counts
}

/// Ordered feature values for one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Wrap values already in column order.
    pub const fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    /// Vector with every slot at its default: `fyear` 2020, everything else 0.
    pub const fn baseline() -> Self {
        let mut values = [0.0; FEATURE_COUNT];
        values[FYEAR_INDEX] = DEFAULT_FYEAR;
        Self { values }
    }

    /// Values in column order.
    pub const fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    /// Values in column order, as a slice.
    pub const fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Value of the named feature.
    pub fn get(&self, name: &str) -> Option<f64> {
        feature_index(name).map(|i| self.values[i])
    }

    /// `(name, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.values.iter().copied())
    }

    /// Copy into an ndarray vector.
    pub fn to_array1(&self) -> Array1<f64> {
        Array1::from(self.values.to_vec())
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::baseline()
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

/// Stack feature vectors into a matrix with one row per record.
pub fn stack_features(vectors: &[FeatureVector]) -> Array2<f64> {
    Array2::from_shape_fn((vectors.len(), FEATURE_COUNT), |(row, col)| {
        vectors[row].values[col]
    })
}
