// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use chartwright::{
    flatten, flatten_records, ClassifierConfig, DataType, FieldClassification, FieldClassifier,
};
use serde_json::{json, Value};

fn classify(record: Value) -> FieldClassification {
    FieldClassifier::new().classify(&flatten(&record, ""))
}

#[test]
fn test_empty_dataset_gives_empty_classification() {
    let classification = FieldClassifier::new().classify_records(&[]);
    assert_eq!(classification, FieldClassification::default());
    assert!(classification.is_empty());
    assert!(classification.label_key.is_none());
    assert!(classification.value_key.is_none());
    assert!(!classification.is_chartable());
}

#[test]
fn test_semantic_names_win() {
    let c = classify(json!({ "id": 7, "code": "X1", "region": "North", "rank": 3, "sales": 120 }));
    assert_eq!(c.numeric_keys, vec!["id", "rank", "sales"]);
    assert_eq!(c.string_keys, vec!["code", "region"]);
    assert_eq!(c.label_key.as_deref(), Some("region"));
    assert_eq!(c.value_key.as_deref(), Some("sales"));
}

#[test]
fn test_date_key_is_second_choice_for_label() {
    let c = classify(json!({ "code": "A", "when": "2024-03-01", "amount": 3 }));
    assert_eq!(c.date_keys, vec!["when"]);
    assert_eq!(c.label_key.as_deref(), Some("when"));
    assert_eq!(c.value_key.as_deref(), Some("amount"));
}

#[test]
fn test_first_string_then_first_key() {
    let c = classify(json!({ "x": 1, "code": "A" }));
    assert_eq!(c.label_key.as_deref(), Some("code"));
    assert_eq!(c.value_key.as_deref(), Some("x"));

    let c = classify(json!({ "x": 1, "y": 2 }));
    assert_eq!(c.label_key.as_deref(), Some("x"));
    assert_eq!(c.value_key.as_deref(), Some("x"));
}

#[test]
fn test_no_numeric_field_leaves_value_empty() {
    let c = classify(json!({ "name": "a", "flag": true }));
    assert_eq!(c.label_key.as_deref(), Some("name"));
    assert!(c.value_key.is_none());
    assert!(!c.is_chartable());
}

#[test]
fn test_non_scalar_values_only_appear_in_all_keys() {
    let c = classify(json!({ "name": "a", "ok": true, "missing": null, "tags": [1, 2], "v": 2.5 }));
    assert_eq!(c.all_keys, vec!["name", "ok", "missing", "tags", "v"]);
    assert_eq!(c.numeric_keys, vec!["v"]);
    assert_eq!(c.string_keys, vec!["name"]);
}

#[test]
fn test_nested_fields_are_classified_by_path() {
    let c = classify(json!({ "meta": { "country": "NZ" }, "stats": { "population": 5 } }));
    assert_eq!(c.label_key.as_deref(), Some("meta.country"));
    assert_eq!(c.value_key.as_deref(), Some("stats.population"));
}

#[test]
fn test_only_first_record_is_inspected() {
    let records = flatten_records(&[json!({ "name": "a", "value": 1 }), json!({ "other": 2 })]);
    let c = FieldClassifier::new().classify_records(&records);
    assert!(!c.has_key("other"));
    assert_eq!(c.all_keys, vec!["name", "value"]);
}

#[test]
fn test_data_type_of() {
    let c = classify(json!({ "month": "2024-01", "city": "Paris", "temperature": 12.5 }));
    assert_eq!(c.data_type_of("month"), Some(DataType::Temporal));
    assert_eq!(c.data_type_of("city"), Some(DataType::Categorical));
    assert_eq!(c.data_type_of("temperature"), Some(DataType::Numeric));
    assert_eq!(c.data_type_of("nope"), None);
}

#[test]
fn test_custom_keywords() {
    let config = ClassifierConfig {
        label_keywords: vec!["sku".to_string()],
        value_keywords: vec!["units".to_string()],
        ..ClassifierConfig::default()
    };
    let classifier = FieldClassifier::with_config(config);
    let c = classifier.classify(&flatten(
        &json!({ "name": "Widget", "sku": "W-1", "price": 3, "units": 9 }),
        "",
    ));
    assert_eq!(c.label_key.as_deref(), Some("sku"));
    assert_eq!(c.value_key.as_deref(), Some("units"));
}
