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

use crate::error::{ConfigError, ConfigResult};
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Keyword lists and date formats driving field classification.
///
/// Keywords are matched as case-insensitive substrings of the field name, so
/// `monthly_revenue` matches both `month` and `revenue`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub label_keywords: Vec<String>,
    pub value_keywords: Vec<String>,
    pub date_formats: Vec<String>,
}
impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            label_keywords: to_strings(&[
                "name", "label", "category", "type", "date", "month", "year", "day", "week",
                "quarter", "period", "time", "region", "country", "city", "state", "location",
                "product", "item", "department", "team", "group", "segment", "class", "title",
                "brand", "channel", "source", "stage", "status",
            ]),
            value_keywords: to_strings(&[
                "value", "amount", "count", "total", "sum", "score", "revenue", "sales", "profit",
                "cost", "price", "rate", "percent", "quantity", "qty", "volume", "number",
                "population", "temperature", "income", "expense", "budget", "growth", "visits",
                "users",
            ]),
            date_formats: to_strings(&[
                "%Y-%m-%d",
                "%Y-%m-%d %H:%M:%S",
                "%Y-%m-%dT%H:%M:%S",
                "%Y-%m-%dT%H:%M:%S%.f",
                "%Y/%m/%d",
                "%m/%d/%Y",
                "%b %d, %Y",
                "%B %d, %Y",
                "%d %b %Y",
                "%d %B %Y",
            ]),
        }
    }
}
impl ClassifierConfig {
    pub fn is_label_like(&self, key: &str) -> bool {
        matches_any(key, &self.label_keywords)
    }
    pub fn is_value_like(&self, key: &str) -> bool {
        matches_any(key, &self.value_keywords)
    }
}

/// HSL parameters for generated palette entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub saturation: f64,
    pub lightness: f64,
    pub hue_step: f64,
}
impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            saturation: 65.0,
            lightness: 55.0,
            hue_step: 137.508,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub classifier: ClassifierConfig,
    pub palette: PaletteConfig,
    /// Characters taken from each end of the serialised data for the fingerprint.
    pub fingerprint_window: usize,
}
impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            palette: PaletteConfig::default(),
            fingerprint_window: 100,
        }
    }
}
impl InferenceConfig {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::ConfigFileError {
                path: path.as_ref().display().to_string(),
                source,
            })?;
        Self::from_yaml_str(&content)
    }
    pub fn from_yaml_str(yaml_content: &str) -> ConfigResult<Self> {
        let config: InferenceConfig = serde_yaml::from_str(yaml_content)?;
        config.validate()?;
        Ok(config)
    }
    pub fn validate(&self) -> ConfigResult<()> {
        if !(0.0..=100.0).contains(&self.palette.saturation) {
            return Err(invalid("palette.saturation", self.palette.saturation));
        }
        if !(0.0..=100.0).contains(&self.palette.lightness) {
            return Err(invalid("palette.lightness", self.palette.lightness));
        }
        if !(self.palette.hue_step > 0.0 && self.palette.hue_step < 360.0) {
            return Err(invalid("palette.hue_step", self.palette.hue_step));
        }
        if self.fingerprint_window == 0 {
            return Err(invalid("fingerprint_window", self.fingerprint_window));
        }
        if self.classifier.label_keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(invalid("classifier.label_keywords", "<empty keyword>"));
        }
        if self.classifier.value_keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(invalid("classifier.value_keywords", "<empty keyword>"));
        }
        for format in &self.classifier.date_formats {
            let broken = format.is_empty()
                || StrftimeItems::new(format).any(|item| matches!(item, Item::Error));
            if broken {
                return Err(ConfigError::InvalidDateFormat {
                    format: format.clone(),
                });
            }
        }
        Ok(())
    }
}

fn invalid(field: &str, value: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}

fn matches_any(key: &str, keywords: &[String]) -> bool {
    let lower = key.to_lowercase();
    keywords.iter().any(|kw| lower.contains(&kw.to_lowercase()))
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
