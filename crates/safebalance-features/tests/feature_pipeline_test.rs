//! Integration tests for the record to feature vector pipeline.

use rstest::rstest;
use safebalance_features::{
    FEATURE_COUNT, FEATURE_NAMES, FeatureCategory, RawRecord, features_by_category, transform,
};
use serde_json::{Value, json};

fn sample_json() -> Value {
    json!({
        "X1": 511267, "X2": 740998, "X3": 833107, "X4": 180447, "X5": 18373,
        "X6": 70658, "X7": 89031, "X8": 191226, "X9": 336018, "X10": 163816,
        "X11": 35163, "X12": 201026, "X13": 128347, "X14": 1024333, "X15": 372751,
        "X16": 401483, "X17": 1024333, "X18": 935302,
        "Division": "D",
        "MajorGroup": "37"
    })
}

fn division_values(record: &RawRecord) -> Vec<f64> {
    let v = transform(record).unwrap();
    features_by_category(FeatureCategory::Division)
        .iter()
        .map(|f| v.as_slice()[f.index])
        .collect()
}

#[test]
fn test_order_is_independent_of_input_order() {
    let forward: RawRecord = serde_json::from_value(sample_json()).unwrap();

    // Same fields, inserted in reverse order
    let mut reversed = serde_json::Map::new();
    let original = sample_json();
    let entries: Vec<(&String, &Value)> = original.as_object().unwrap().iter().collect();
    for (key, value) in entries.into_iter().rev() {
        reversed.insert(key.clone(), value.clone());
    }
    let backward: RawRecord = serde_json::from_value(Value::Object(reversed)).unwrap();

    let a = transform(&forward).unwrap();
    let b = transform(&backward).unwrap();

    assert_eq!(a, b);
    assert_eq!(a.as_slice().len(), FEATURE_COUNT);
    let names: Vec<&str> = a.iter().map(|(name, _)| name).collect();
    assert_eq!(names, FEATURE_NAMES.to_vec());
}

#[rstest]
#[case::absent(None)]
#[case::agriculture(Some("A"))]
#[case::public_administration(Some("J"))]
#[case::unknown_letter(Some("Q"))]
#[case::lower_case(Some("d"))]
fn test_baseline_divisions_encode_to_zero(#[case] division: Option<&str>) {
    let mut value = sample_json();
    match division {
        Some(letter) => value["Division"] = json!(letter),
        None => {
            value.as_object_mut().unwrap().remove("Division");
        }
    }
    let record: RawRecord = serde_json::from_value(value).unwrap();

    assert_eq!(division_values(&record), vec![0.0; 8]);
}

#[test]
fn test_division_d_sets_single_indicator() {
    let record: RawRecord = serde_json::from_value(sample_json()).unwrap();
    assert_eq!(
        division_values(&record),
        vec![0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0]
    );
}

#[rstest]
#[case::known(Some(json!("50")), 8000.0)]
#[case::known_as_integer(Some(json!(51)), 7500.0)]
#[case::unknown(Some(json!("99")), 500.0)]
#[case::float_spelling(Some(json!(50.0)), 500.0)]
#[case::null(Some(Value::Null), 500.0)]
#[case::absent(None, 500.0)]
fn test_major_group_frequency(#[case] code: Option<Value>, #[case] expected: f64) {
    let mut value = sample_json();
    match code {
        Some(code) => value["MajorGroup"] = code,
        None => {
            value.as_object_mut().unwrap().remove("MajorGroup");
        }
    }
    let record: RawRecord = serde_json::from_value(value).unwrap();
    let v = transform(&record).unwrap();

    assert_eq!(v.get("MajorGroup_freq"), Some(expected));
}

#[rstest]
#[case("X18", &["Leverage_Ratio", "Debt_to_Equity"])]
#[case("X1", &["Current_Ratio"])]
#[case("X6", &["Profit_Margin"])]
#[case("X11", &["EBIT_Margin"])]
#[case("X13", &["Gross_Margin"])]
#[case("X7", &["Receivables_Ratio"])]
#[case("X2", &["Inventory_Turnover"])]
fn test_zero_numerator_gives_exact_zero(#[case] field: &str, #[case] ratios: &[&str]) {
    let mut value = sample_json();
    value[field] = json!(0);
    let record: RawRecord = serde_json::from_value(value).unwrap();
    let v = transform(&record).unwrap();

    for ratio in ratios {
        assert_eq!(v.get(ratio), Some(0.0), "{ratio} with {field} = 0");
    }
}

#[test]
fn test_all_zero_record_is_finite() {
    let record = RawRecord::new().with_indicators([0.0; 18]);
    let v = transform(&record).unwrap();

    assert!(v.iter().all(|(_, value)| value.is_finite()));
    assert_eq!(v.get("fyear"), Some(2020.0));
    assert_eq!(v.get("MajorGroup_freq"), Some(500.0));
}

#[test]
fn test_negative_values_keep_their_sign() {
    let mut value = sample_json();
    value["X6"] = json!(-70658);
    let record: RawRecord = serde_json::from_value(value).unwrap();
    let v = transform(&record).unwrap();

    assert!(v.get("Profit_Margin").unwrap() < 0.0);
    assert_eq!(v.get("X6"), Some(-70658.0));
}

#[test]
fn test_every_required_field_is_checked() {
    for field in FEATURE_NAMES.iter().filter(|n| n.starts_with('X')) {
        let mut value = sample_json();
        value.as_object_mut().unwrap().remove(*field);
        let record: RawRecord = serde_json::from_value(value).unwrap();

        let err = transform(&record).unwrap_err();
        assert_eq!(err.field(), *field);
        assert_eq!(err.to_string(), format!("Missing required field: {field}"));
    }
}
