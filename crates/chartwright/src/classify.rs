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

use crate::config::ClassifierConfig;
use crate::flatten::FlattenedRecord;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "PascalCase")]
pub enum DataType {
    Numeric,
    Categorical,
    Temporal,
}

/// Field sets derived from the first flattened record.
///
/// `date_keys` is a subset of `string_keys`. Keys holding booleans, nulls or
/// arrays only appear in `all_keys`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldClassification {
    pub all_keys: Vec<String>,
    pub numeric_keys: Vec<String>,
    pub string_keys: Vec<String>,
    pub date_keys: Vec<String>,
    pub label_key: Option<String>,
    pub value_key: Option<String>,
}
impl FieldClassification {
    pub fn is_empty(&self) -> bool {
        self.all_keys.is_empty()
    }
    pub fn has_key(&self, key: &str) -> bool {
        self.all_keys.iter().any(|k| k == key)
    }
    pub fn is_numeric(&self, key: &str) -> bool {
        self.numeric_keys.iter().any(|k| k == key)
    }
    pub fn is_string(&self, key: &str) -> bool {
        self.string_keys.iter().any(|k| k == key)
    }
    pub fn is_date(&self, key: &str) -> bool {
        self.date_keys.iter().any(|k| k == key)
    }
    pub fn data_type_of(&self, key: &str) -> Option<DataType> {
        if self.is_numeric(key) {
            Some(DataType::Numeric)
        } else if self.is_date(key) {
            Some(DataType::Temporal)
        } else if self.has_key(key) {
            Some(DataType::Categorical)
        } else {
            None
        }
    }
    /// Both a label and a value key were found.
    pub fn is_chartable(&self) -> bool {
        self.label_key.is_some() && self.value_key.is_some()
    }
}

pub struct FieldClassifier {
    config: ClassifierConfig,
}
impl FieldClassifier {
    pub fn new() -> Self {
        Self {
            config: ClassifierConfig::default(),
        }
    }
    pub fn with_config(config: ClassifierConfig) -> Self {
        Self { config }
    }
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Only the first record is inspected; heterogeneous later records are not reconciled.
    pub fn classify_records(&self, records: &[FlattenedRecord]) -> FieldClassification {
        records
            .first()
            .map(|first| self.classify(first))
            .unwrap_or_default()
    }

    pub fn classify(&self, record: &FlattenedRecord) -> FieldClassification {
        let mut classification = FieldClassification::default();
        for (key, value) in record {
            classification.all_keys.push(key.clone());
            match value {
                Value::Number(n) if n.as_f64().is_some_and(f64::is_finite) => {
                    classification.numeric_keys.push(key.clone());
                }
                Value::String(s) => {
                    classification.string_keys.push(key.clone());
                    if self.is_date_like(s) {
                        classification.date_keys.push(key.clone());
                    }
                }
                _ => {}
            }
        }
        classification.label_key = self.pick_label_key(&classification);
        classification.value_key = self.pick_value_key(&classification);
        classification
    }

    fn pick_label_key(&self, c: &FieldClassification) -> Option<String> {
        c.string_keys
            .iter()
            .find(|k| self.config.is_label_like(k))
            .or_else(|| c.date_keys.first())
            .or_else(|| c.string_keys.first())
            .or_else(|| c.all_keys.first())
            .cloned()
    }

    fn pick_value_key(&self, c: &FieldClassification) -> Option<String> {
        c.numeric_keys
            .iter()
            .find(|k| self.config.is_value_like(k))
            .or_else(|| c.numeric_keys.first())
            .cloned()
    }

    pub fn is_date_like(&self, value: &str) -> bool {
        self.parse_date(value).is_some()
    }

    /// RFC 3339 first, then the configured formats, then `YYYY-MM` and bare years.
    pub fn parse_date(&self, value: &str) -> Option<NaiveDateTime> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(dt.naive_utc());
        }
        for format in &self.config.date_formats {
            if let Some(dt) = parse_with_format(value, format) {
                return Some(dt);
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d") {
            return date.and_hms_opt(0, 0, 0);
        }
        if value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit()) {
            let year = value.parse().ok()?;
            return NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0);
        }
        None
    }
}
impl Default for FieldClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_with_format(value: &str, format: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
        return Some(dt);
    }
    NaiveDate::parse_from_str(value, format)
        .ok()?
        .and_hms_opt(0, 0, 0)
}
