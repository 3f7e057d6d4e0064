//! CSV and JSON export of predictions and batch results.

use safebalance::{BatchItem, PredictionResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    #[default]
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }

    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::PrettyJson => "pretty-json",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Results of a batch run, serialized as `{"results": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResults {
    /// One item per input record, in input order
    pub results: Vec<BatchItem>,
}

impl BatchResults {
    /// Wrap batch items.
    pub const fn new(results: Vec<BatchItem>) -> Self {
        Self { results }
    }

    /// Flat rows for CSV export.
    pub fn rows(&self) -> Vec<BatchRow> {
        self.results.iter().map(BatchRow::from).collect()
    }
}

impl From<Vec<BatchItem>> for BatchResults {
    fn from(results: Vec<BatchItem>) -> Self {
        Self::new(results)
    }
}

/// One batch item as a CSV row. Outcome columns are empty for failed items
/// and `error` is empty for scored ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRow {
    /// Company label
    pub company_name: String,
    /// `Failed` or `Alive`
    pub prediction: Option<String>,
    /// Rounded probability
    pub probability: Option<f64>,
    /// Integer risk score
    pub risk_score: Option<u8>,
    /// Failure message
    pub error: Option<String>,
}

impl From<&BatchItem> for BatchRow {
    fn from(item: &BatchItem) -> Self {
        Self {
            company_name: item.company_name().to_string(),
            prediction: item.label().map(|l| l.to_string()),
            probability: item.probability(),
            risk_score: item.risk_score(),
            error: item.error().map(str::to_string),
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn to_csv<T: Serialize>(records: impl IntoIterator<Item = T>) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in records {
        wtr.serialize(record)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
}

impl Exporter for PredictionResult {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => to_csv([self]),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for BatchResults {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => to_csv(self.rows()),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use safebalance::decide;

    fn batch() -> BatchResults {
        BatchResults::new(vec![
            BatchItem::scored("Acme", &decide(0.7502601)),
            BatchItem::failed("Unknown", "Missing required field: X5"),
        ])
    }

    #[test]
    fn test_prediction_csv() {
        let csv = decide(0.1).export_to_string(ExportFormat::Csv).unwrap();
        assert_eq!(
            csv,
            "prediction,probability,risk_score,risk_category,threshold\n\
             Alive,0.1,10,Very Low Risk,0.35\n"
        );
    }

    #[test]
    fn test_prediction_json() {
        let json = decide(0.1).export_to_string(ExportFormat::Json).unwrap();
        assert!(json.starts_with("{\"prediction\":\"Alive\""));
    }

    #[test]
    fn test_batch_csv() {
        let csv = batch().export_to_string(ExportFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "company_name,prediction,probability,risk_score,error");
        assert_eq!(lines[1], "Acme,Failed,0.7503,75,");
        assert_eq!(lines[2], "Unknown,,,,Missing required field: X5");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_batch_json() {
        let json = batch().export_to_string(ExportFormat::Json).unwrap();
        assert!(json.starts_with("{\"results\":[{\"company_name\":\"Acme\",\"prediction\":\"Failed\""));
        assert!(json.contains("{\"company_name\":\"Unknown\",\"error\":\"Missing required field: X5\"}"));
    }

    #[test]
    fn test_batch_pretty_json() {
        let json = batch().export_to_string(ExportFormat::PrettyJson).unwrap();
        assert!(json.contains("\n  \"results\""));
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!(
            "pretty-json".parse::<ExportFormat>().unwrap(),
            ExportFormat::PrettyJson
        );
        assert!("xml".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::PrettyJson.to_string(), "pretty-json");
        assert_eq!(ExportFormat::PrettyJson.extension(), "json");
        assert_eq!(
            ExportFormat::from_path(Path::new("out/results.csv")),
            Some(ExportFormat::Csv)
        );
    }
}
