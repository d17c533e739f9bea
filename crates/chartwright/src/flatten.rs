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

//! Flattening of arbitrary nested JSON records into a single-level key space.
//!
//! Nested objects become dot-joined paths (`address.city`), arrays whose first
//! element is an object expand index-wise (`items[0].price`), and arrays of
//! primitives stay intact under their key so multi-valued rows survive.

use crate::error::{DataError, DataResult};
use indexmap::IndexMap;
use serde_json::Value;

/// Synthetic key to primitive (or primitive array) mapping, in discovery order.
pub type FlattenedRecord = IndexMap<String, Value>;

/// Key used when a record is itself a primitive rather than an object.
const SCALAR_KEY: &str = "value";

pub fn flatten(record: &Value, prefix: &str) -> FlattenedRecord {
    let mut out = FlattenedRecord::new();
    match record {
        Value::Object(_) | Value::Array(_) => flatten_value(record, prefix, &mut out),
        scalar => {
            let key = if prefix.is_empty() { SCALAR_KEY } else { prefix };
            out.insert(key.to_string(), scalar.clone());
        }
    }
    out
}

pub fn flatten_records(records: &[Value]) -> Vec<FlattenedRecord> {
    records.iter().map(|r| flatten(r, "")).collect()
}

fn flatten_value(value: &Value, path: &str, out: &mut FlattenedRecord) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_value(child, &join(path, key), out);
            }
        }
        Value::Array(items) if items.first().is_some_and(is_container) => {
            for (idx, item) in items.iter().enumerate() {
                flatten_value(item, &format!("{path}[{idx}]"), out);
            }
        }
        // Later elements may overwrite earlier ones on an exact key collision.
        other => {
            out.insert(path.to_string(), other.clone());
        }
    }
}

fn is_container(value: &Value) -> bool {
    value.is_object() || value.is_array()
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Accepts a single object or an array of objects; anything else is rejected.
pub fn normalise_records(data: &Value) -> DataResult<Vec<Value>> {
    match data {
        Value::Object(_) => Ok(vec![data.clone()]),
        Value::Array(items) if items.is_empty() => Err(DataError::EmptyDataset),
        Value::Array(items) => {
            if let Some(bad) = items.iter().find(|item| !item.is_object()) {
                return Err(DataError::UnsupportedShape {
                    found: format!("array containing {}", value_kind(bad)),
                });
            }
            Ok(items.clone())
        }
        other => Err(DataError::UnsupportedShape {
            found: value_kind(other).to_string(),
        }),
    }
}

pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
