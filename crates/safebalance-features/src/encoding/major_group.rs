//! Major group frequency encoding.
//!
//! Maps a two-digit SIC major group code to its prevalence weight in the
//! training data. Codes outside the table, and records without a code, take
//! the `"Other"` weight.

/// Table key used for every unmapped code.
pub const OTHER_GROUP: &str = "Other";

/// Weight of the `"Other"` entry.
pub const OTHER_WEIGHT: u32 = 500;

/// Known major group codes and their weights. The `"Other"` entry is required.
const MAJOR_GROUP_WEIGHTS: [(&str, u32); 13] = [
    ("50", 8000),
    ("51", 7500),
    ("73", 6000),
    ("36", 5500),
    ("35", 5000),
    ("38", 4500),
    ("49", 4000),
    ("59", 3500),
    ("34", 3000),
    ("58", 2800),
    ("20", 2500),
    ("37", 2200),
    (OTHER_GROUP, OTHER_WEIGHT),
];

/// All table entries, `"Other"` included.
pub fn entries() -> &'static [(&'static str, u32)] {
    &MAJOR_GROUP_WEIGHTS
}

/// Weight of a code, if the table has an entry for it.
pub fn lookup(code: &str) -> Option<u32> {
    MAJOR_GROUP_WEIGHTS
        .iter()
        .find(|(key, _)| *key == code)
        .map(|(_, weight)| *weight)
}

/// Frequency-encode a major group code, falling back to the `"Other"` weight.
pub fn major_group_frequency(code: Option<&str>) -> u32 {
    code.and_then(lookup).unwrap_or(OTHER_WEIGHT)
}
