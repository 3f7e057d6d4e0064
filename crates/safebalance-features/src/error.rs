//! Error types for record validation.

use thiserror::Error;

/// Result type for feature operations.
pub type Result<T> = std::result::Result<T, FeatureError>;

/// Errors raised while validating a raw record.
///
/// Both variants are client input errors: the record cannot take part in
/// arithmetic until the caller fixes the named field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureError {
    /// A required indicator is absent (or null, or an empty cell).
    #[error("Missing required field: {field}")]
    MissingField {
        /// Name of the missing field (`X1`..`X18`)
        field: &'static str,
    },

    /// A required indicator is present but does not hold a finite number.
    #[error("Invalid value for field {field}: {value:?} is not a number")]
    InvalidNumber {
        /// Name of the offending field
        field: &'static str,
        /// The raw value as received
        value: String,
    },
}

impl FeatureError {
    /// Name of the field that failed validation.
    pub const fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field } | Self::InvalidNumber { field, .. } => field,
        }
    }

    /// Whether the caller can fix this by correcting the input. Every
    /// validation failure currently is.
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingField { .. } | Self::InvalidNumber { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message() {
        let err = FeatureError::MissingField { field: "X5" };
        assert_eq!(err.to_string(), "Missing required field: X5");
        assert_eq!(err.field(), "X5");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_invalid_number_message() {
        let err = FeatureError::InvalidNumber {
            field: "X2",
            value: "abc".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value for field X2: \"abc\" is not a number"
        );
        assert_eq!(err.field(), "X2");
    }
}
