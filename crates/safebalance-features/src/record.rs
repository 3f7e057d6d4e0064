//! Raw company records and their validation.
//!
//! A [`RawRecord`] keeps every field in the form it arrived in (JSON number or
//! text) so that the default rules can be applied in one place. Validation
//! turns it into a [`ValidatedRecord`] whose fields are typed and complete.

use crate::encoding::Division;
use crate::error::{FeatureError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Number of required financial indicators.
pub const INDICATOR_COUNT: usize = 18;

/// Names of the required indicators, in column order.
pub const INDICATOR_FIELDS: [&str; INDICATOR_COUNT] = [
    "X1", "X2", "X3", "X4", "X5", "X6", "X7", "X8", "X9", "X10", "X11", "X12", "X13", "X14",
    "X15", "X16", "X17", "X18",
];

/// Fiscal year used when `fyear` is absent or unusable.
pub const DEFAULT_FYEAR: f64 = 2020.0;

/// Field names understood in addition to the indicators.
const COMPANY_NAME_FIELD: &str = "company_name";
const FYEAR_FIELD: &str = "fyear";
const DIVISION_FIELD: &str = "Division";
const MAJOR_GROUP_FIELD: &str = "MajorGroup";

/// A field value as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A JSON number
    Number(Number),
    /// Text, either a JSON string or a CSV cell
    Text(String),
}

impl FieldValue {
    /// Convert a JSON value. `null` is treated as absent.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Number(n) => Some(Self::Number(n.clone())),
            Value::String(s) => Some(Self::Text(s.clone())),
            other => Some(Self::Text(other.to_string())),
        }
    }

    /// Convert a text cell. Blank cells are treated as absent.
    pub fn from_text(text: &str) -> Option<Self> {
        if text.trim().is_empty() {
            None
        } else {
            Some(Self::Text(text.to_string()))
        }
    }

    /// Numeric reading of the value, if it holds a finite number.
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            Self::Number(n) => n.as_f64()?,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        n.is_finite().then_some(n)
    }

    /// String form of the value, used for categorical lookups.
    ///
    /// JSON integers keep their integer spelling (`37` becomes `"37"`), floats
    /// keep their decimal point (`37.0` becomes `"37.0"`).
    pub fn as_code(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }

    fn into_json(self) -> Value {
        match self {
            Self::Number(n) => Value::Number(n),
            Self::Text(s) => Value::String(s),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or_else(|| Self::Text(value.to_string()), Self::Number)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A company record as received from the caller.
///
/// Deserializes from a JSON object keyed by `X1`..`X18`, `fyear`, `Division`,
/// `MajorGroup`, and `company_name`. Unknown keys are ignored; `null` values
/// count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct RawRecord {
    /// Display label passed through to batch output
    pub company_name: Option<String>,

    /// Fiscal year
    pub fyear: Option<FieldValue>,

    /// SIC division letter
    pub division: Option<FieldValue>,

    /// SIC major group code
    pub major_group: Option<FieldValue>,

    /// Financial indicators `X1`..`X18`
    pub indicators: [Option<FieldValue>; INDICATOR_COUNT],
}

impl RawRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from `(field, text)` pairs, such as a CSV row.
    pub fn from_text_fields<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut record = Self::default();
        for (key, text) in fields {
            match key {
                COMPANY_NAME_FIELD => {
                    record.company_name = FieldValue::from_text(text).map(|v| v.as_code());
                }
                _ => record.set_field(key, FieldValue::from_text(text)),
            }
        }
        record
    }

    /// Set indicator `X<n>` (1-based).
    ///
    /// # Panics
    ///
    /// Panics if `n` is not in `1..=18`.
    pub fn with_indicator(mut self, n: usize, value: impl Into<FieldValue>) -> Self {
        assert!(
            (1..=INDICATOR_COUNT).contains(&n),
            "indicator X{n} does not exist"
        );
        self.indicators[n - 1] = Some(value.into());
        self
    }

    /// Set all 18 indicators at once.
    pub fn with_indicators(mut self, values: [f64; INDICATOR_COUNT]) -> Self {
        for (slot, value) in self.indicators.iter_mut().zip(values) {
            *slot = Some(FieldValue::from(value));
        }
        self
    }

    /// Remove indicator `X<n>` (1-based).
    pub fn without_indicator(mut self, n: usize) -> Self {
        if let Some(slot) = n.checked_sub(1).and_then(|i| self.indicators.get_mut(i)) {
            *slot = None;
        }
        self
    }

    /// Set the fiscal year.
    pub fn with_fyear(mut self, value: impl Into<FieldValue>) -> Self {
        self.fyear = Some(value.into());
        self
    }

    /// Set the division letter.
    pub fn with_division(mut self, value: impl Into<FieldValue>) -> Self {
        self.division = Some(value.into());
        self
    }

    /// Set the major group code.
    pub fn with_major_group(mut self, value: impl Into<FieldValue>) -> Self {
        self.major_group = Some(value.into());
        self
    }

    /// Set the company name.
    pub fn with_company_name(mut self, name: impl Into<String>) -> Self {
        self.company_name = Some(name.into());
        self
    }

    /// Validate the record, resolving defaults.
    ///
    /// Reports the first missing or non-numeric indicator in `X1..X18` order.
    /// `fyear`, `Division` and `MajorGroup` never fail: they fall back to
    /// their defaults instead.
    pub fn validate(&self) -> Result<ValidatedRecord> {
        let mut values = [0.0; INDICATOR_COUNT];
        for (i, (slot, field)) in self.indicators.iter().zip(INDICATOR_FIELDS).enumerate() {
            let raw = slot.as_ref().ok_or(FeatureError::MissingField { field })?;
            values[i] = raw.as_number().ok_or_else(|| FeatureError::InvalidNumber {
                field,
                value: raw.as_code(),
            })?;
        }

        Ok(ValidatedRecord {
            fyear: self.resolve_fyear(),
            division: self
                .division
                .as_ref()
                .and_then(|d| Division::from_letter(&d.as_code())),
            major_group: self.major_group.as_ref().map(FieldValue::as_code),
            indicators: Indicators(values),
        })
    }

    fn resolve_fyear(&self) -> f64 {
        self.fyear
            .as_ref()
            .and_then(FieldValue::as_number)
            .unwrap_or(DEFAULT_FYEAR)
    }

    fn set_field(&mut self, key: &str, value: Option<FieldValue>) {
        match key {
            FYEAR_FIELD => self.fyear = value,
            DIVISION_FIELD => self.division = value,
            MAJOR_GROUP_FIELD => self.major_group = value,
            _ => {
                if let Some(i) = indicator_position(key) {
                    self.indicators[i] = value;
                }
            }
        }
    }
}

/// Position of an indicator field name (`"X7"` is 6).
fn indicator_position(key: &str) -> Option<usize> {
    INDICATOR_FIELDS.iter().position(|field| *field == key)
}

impl From<Map<String, Value>> for RawRecord {
    fn from(map: Map<String, Value>) -> Self {
        let mut record = Self::default();
        for (key, value) in &map {
            if key == COMPANY_NAME_FIELD {
                record.company_name = FieldValue::from_json(value).map(|v| v.as_code());
            } else {
                record.set_field(key, FieldValue::from_json(value));
            }
        }
        record
    }
}

impl From<RawRecord> for Map<String, Value> {
    fn from(record: RawRecord) -> Self {
        let mut map = Self::new();
        if let Some(name) = record.company_name {
            map.insert(COMPANY_NAME_FIELD.to_string(), Value::String(name));
        }
        for (field, value) in INDICATOR_FIELDS.iter().zip(record.indicators) {
            if let Some(value) = value {
                map.insert((*field).to_string(), value.into_json());
            }
        }
        let optional = [
            (FYEAR_FIELD, record.fyear),
            (DIVISION_FIELD, record.division),
            (MAJOR_GROUP_FIELD, record.major_group),
        ];
        for (field, value) in optional {
            if let Some(value) = value {
                map.insert(field.to_string(), value.into_json());
            }
        }
        map
    }
}

/// The 18 indicators of a validated record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Indicators([f64; INDICATOR_COUNT]);

impl Indicators {
    /// Wrap indicator values given in `X1..X18` order.
    pub const fn new(values: [f64; INDICATOR_COUNT]) -> Self {
        Self(values)
    }

    /// Value of indicator `X<n>` (1-based).
    ///
    /// # Panics
    ///
    /// Panics if `n` is not in `1..=18`.
    pub const fn x(&self, n: usize) -> f64 {
        self.0[n - 1]
    }

    /// All values in `X1..X18` order.
    pub const fn as_array(&self) -> &[f64; INDICATOR_COUNT] {
        &self.0
    }
}

/// A record whose fields are typed and whose defaults are resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRecord {
    /// Fiscal year, `2020.0` when not supplied
    pub fyear: f64,

    /// Division, `None` when absent or not a known letter
    pub division: Option<Division>,

    /// Major group code in string form
    pub major_group: Option<String>,

    /// Financial indicators
    pub indicators: Indicators,
}
