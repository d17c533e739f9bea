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

use chartwright::{flatten, normalise_records, DataError};
use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::BTreeMap;

fn keys_of(value: &Value) -> Vec<String> {
    flatten(value, "").keys().cloned().collect()
}

#[test]
fn test_nested_object_uses_dotted_keys() {
    let flat = flatten(&json!({ "a": { "b": 1, "c": 2 } }), "");
    assert_eq!(flat.len(), 2);
    assert_eq!(flat["a.b"], json!(1));
    assert_eq!(flat["a.c"], json!(2));
}

#[test]
fn test_primitive_arrays_are_kept_whole() {
    let flat = flatten(&json!({ "tags": ["x", "y"], "scores": [1, 2, 3] }), "");
    assert_eq!(flat["tags"], json!(["x", "y"]));
    assert_eq!(flat["scores"], json!([1, 2, 3]));
}

#[test]
fn test_arrays_of_objects_are_indexed() {
    let flat = flatten(
        &json!({ "items": [{ "price": 3 }, { "price": 5, "meta": { "sku": "B" } }] }),
        "",
    );
    assert_eq!(flat["items[0].price"], json!(3));
    assert_eq!(flat["items[1].price"], json!(5));
    assert_eq!(flat["items[1].meta.sku"], json!("B"));
}

#[test]
fn test_null_leaves_pass_through() {
    let flat = flatten(&json!({ "a": null, "b": { "c": null } }), "");
    assert_eq!(flat["a"], Value::Null);
    assert_eq!(flat["b.c"], Value::Null);
}

#[test]
fn test_prefix_is_applied() {
    let flat = flatten(&json!({ "x": 1 }), "root");
    assert_eq!(keys_of_prefixed(&flat), vec!["root.x"]);
}

fn keys_of_prefixed(flat: &chartwright::FlattenedRecord) -> Vec<&str> {
    flat.keys().map(String::as_str).collect()
}

#[test]
fn test_key_order_follows_input() {
    let keys = keys_of(&json!({ "zeta": 1, "alpha": { "m": 2, "b": 3 }, "mid": "x" }));
    assert_eq!(keys, vec!["zeta", "alpha.m", "alpha.b", "mid"]);
}

#[test]
fn test_normalise_wraps_single_object() {
    let records = normalise_records(&json!({ "name": "Jan", "value": 1 })).unwrap();
    assert_eq!(records.len(), 1);
}

#[test]
fn test_normalise_rejects_empty_and_scalar_input() {
    assert_eq!(normalise_records(&json!([])), Err(DataError::EmptyDataset));
    assert!(matches!(
        normalise_records(&json!(42)),
        Err(DataError::UnsupportedShape { .. })
    ));
    assert!(matches!(
        normalise_records(&json!([{ "a": 1 }, "b"])),
        Err(DataError::UnsupportedShape { .. })
    ));
}

fn flat_object(map: &BTreeMap<String, i64>) -> Value {
    Value::Object(map.iter().map(|(k, v)| (k.clone(), json!(v))).collect())
}

proptest! {
    #[test]
    fn test_flat_records_keep_their_keys(map in prop::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..8)) {
        let value = flat_object(&map);
        let expected: Vec<String> = map.keys().cloned().collect();
        prop_assert_eq!(keys_of(&value), expected);
    }

    #[test]
    fn test_flatten_is_idempotent(map in prop::collection::btree_map("[a-z]{1,6}", any::<i64>(), 1..6)) {
        let nested = json!({ "outer": flat_object(&map) });
        let once = flatten(&nested, "");
        let again = flatten(&Value::Object(once.clone().into_iter().collect()), "");
        prop_assert_eq!(once, again);
    }

    #[test]
    fn test_one_level_nesting_joins_with_dots(map in prop::collection::btree_map("[a-z]{1,6}", any::<i64>(), 1..6)) {
        let flat = flatten(&json!({ "a": flat_object(&map) }), "");
        prop_assert_eq!(flat.len(), map.len());
        for (k, v) in &map {
            prop_assert_eq!(&flat[&format!("a.{k}")], &json!(v));
        }
    }
}
