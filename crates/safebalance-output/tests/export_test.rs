//! Export integration tests.

use rstest::rstest;
use safebalance::{BatchItem, decide};
use safebalance_output::{BatchResults, BatchSummary, ExportFormat, Exporter};
use std::fs;

fn results(n: usize) -> BatchResults {
    (0..n)
        .map(|i| {
            if i % 3 == 2 {
                BatchItem::failed(format!("Company {i}"), "Missing required field: X9")
            } else {
                BatchItem::scored(format!("Company {i}"), &decide(i as f64 / n as f64))
            }
        })
        .collect::<Vec<_>>()
        .into()
}

#[rstest]
#[case(1)]
#[case(3)]
#[case(25)]
fn test_csv_has_one_row_per_item(#[case] n: usize) {
    let csv = results(n).export_to_string(ExportFormat::Csv).unwrap();
    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    assert_eq!(reader.records().count(), n);
}

#[rstest]
#[case::json(ExportFormat::Json)]
#[case::pretty(ExportFormat::PrettyJson)]
fn test_json_round_trips(#[case] format: ExportFormat) {
    let original = results(6);
    let json = original.export_to_string(format).unwrap();
    let parsed: BatchResults = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, original);
}

#[test]
fn test_export_to_file() {
    let dir = std::env::temp_dir().join(format!("safebalance-export-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();

    let path = dir.join("results.csv");
    results(4).export_to_file(&path, ExportFormat::Csv).unwrap();
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("company_name,prediction,probability,risk_score,error\n"));

    let path = dir.join("one.json");
    decide(0.5).export_to_file(&path, ExportFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["prediction"], "Failed");
    assert_eq!(value["risk_category"], "High Risk");

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_summary_matches_results() {
    let results = results(9);
    let summary = BatchSummary::from_items(&results.results);
    assert_eq!(summary.total, 9);
    assert_eq!(summary.errors, 3);
    assert_eq!(summary.scored, 6);
    assert_eq!(summary.categories.iter().map(|c| c.count).sum::<usize>(), 6);

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["total"], 9);
    assert!(json["generated_at"].is_string());
}
