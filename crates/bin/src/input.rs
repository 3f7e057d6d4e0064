//! Reading records from files and stdin.

use safebalance::RawRecord;
use serde::Deserialize;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use thiserror::Error;

/// Errors raised while reading input. All of them are the caller's to fix.
#[derive(Debug, Error)]
pub(crate) enum InputError {
    #[error("Failed to read input: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid CSV input: {0}")]
    Csv(#[from] csv::Error),
}

/// Batch input layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum InputFormat {
    /// `{"companies": [...]}` or a bare array of records
    Json,
    /// Header row followed by one record per row
    Csv,
}

impl InputFormat {
    /// Guess from the file extension, defaulting to JSON.
    pub(crate) fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Json,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BatchInput {
    Wrapped { companies: Vec<RawRecord> },
    Bare(Vec<RawRecord>),
}

/// Read a whole file, or stdin when `path` is `None` or `-`.
pub(crate) fn read_source(path: Option<&Path>) -> Result<String, InputError> {
    let mut text = String::new();
    match path {
        Some(p) if p != Path::new("-") => {
            File::open(p)?.read_to_string(&mut text)?;
        }
        _ => {
            io::stdin().read_to_string(&mut text)?;
        }
    }
    Ok(text)
}

/// Parse a single JSON record.
pub(crate) fn parse_record(text: &str) -> Result<RawRecord, InputError> {
    Ok(serde_json::from_str(text)?)
}

/// Parse a JSON batch: `{"companies": [...]}` or a bare array.
pub(crate) fn parse_json_batch(text: &str) -> Result<Vec<RawRecord>, InputError> {
    let input: BatchInput = serde_json::from_str(text)?;
    Ok(match input {
        BatchInput::Wrapped { companies } => companies,
        BatchInput::Bare(records) => records,
    })
}

/// Parse a CSV batch with a header row. Empty cells count as missing.
pub(crate) fn parse_csv_batch(text: &str) -> Result<Vec<RawRecord>, InputError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        records.push(RawRecord::from_text_fields(headers.iter().zip(row.iter())));
    }
    Ok(records)
}

/// Parse a batch in the given layout.
pub(crate) fn parse_batch(text: &str, format: InputFormat) -> Result<Vec<RawRecord>, InputError> {
    match format {
        InputFormat::Json => parse_json_batch(text),
        InputFormat::Csv => parse_csv_batch(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const HEADER: &str = "company_name,X1,X2,X3,X4,X5,X6,X7,X8,X9,X10,X11,X12,X13,X14,X15,X16,X17,X18,Division,MajorGroup";

    #[test]
    fn test_wrapped_and_bare_batches() {
        let wrapped = parse_json_batch(r#"{"companies": [{"X1": 1}, {"X1": 2}]}"#).unwrap();
        let bare = parse_json_batch(r#"[{"X1": 1}, {"X1": 2}]"#).unwrap();
        assert_eq!(wrapped, bare);
        assert_eq!(wrapped.len(), 2);
    }

    #[test]
    fn test_empty_batch_parses() {
        assert!(parse_json_batch(r#"{"companies": []}"#).unwrap().is_empty());
    }

    #[test]
    fn test_not_a_batch() {
        assert!(matches!(
            parse_json_batch(r#"{"X1": 1}"#),
            Err(InputError::Json(_))
        ));
    }

    #[test]
    fn test_csv_batch() {
        let text = format!(
            "{HEADER}\nAcme,1,2,3,4,5,6,7,8,9,10,11,12,13,14,15,16,17,18,D,37\n\
             Globex,1,2,3,4,,6,7,8,9,10,11,12,13,14,15,16,17,18,,\n"
        );
        let records = parse_csv_batch(&text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].company_name.as_deref(), Some("Acme"));
        assert!(records[0].validate().is_ok());
        assert_eq!(
            records[1].validate().unwrap_err().to_string(),
            "Missing required field: X5"
        );
    }

    #[rstest]
    #[case("batch.csv", InputFormat::Csv)]
    #[case("batch.CSV", InputFormat::Csv)]
    #[case("batch.json", InputFormat::Json)]
    #[case("batch", InputFormat::Json)]
    fn test_format_from_path(#[case] path: &str, #[case] expected: InputFormat) {
        assert_eq!(InputFormat::from_path(Path::new(path)), expected);
    }
}
