//! Static encoding tables for the categorical attributes.
//!
//! Both tables are fixed at compile time and only ever read. Divisions are
//! one-hot encoded over `B..I` with `A` and `J` as the all-zero baseline; major
//! group codes are frequency encoded by their prevalence in the training data.

pub mod division;
pub mod major_group;

pub use division::{DIVISION_INDICATOR_COUNT, Division};
pub use major_group::{OTHER_GROUP, OTHER_WEIGHT, major_group_frequency};
