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

//! Renderer option builders, grouped by chart family.

pub mod cartesian;
pub mod proportional;
pub mod relational;
pub mod specialised;
pub mod statistical;
pub mod temporal;

use crate::flatten::FlattenedRecord;
use crate::registry::{BuildContext, TrendlineMode};
use serde_json::{json, Map, Value};

pub use statistical::{five_number_summary, linear_regression, FiveNumberSummary};

pub(crate) fn label_of(record: &FlattenedRecord, key: &str, index: usize) -> String {
    match record.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => format!("Item {}", index + 1),
        Some(other) => other.to_string(),
    }
}

pub(crate) fn labels(ctx: &BuildContext<'_>) -> Vec<String> {
    ctx.records
        .iter()
        .enumerate()
        .map(|(i, r)| label_of(r, &ctx.mapping.name_key, i))
        .collect()
}

/// Numbers only; anything else counts as zero.
pub(crate) fn strict_number(value: Option<&Value>) -> f64 {
    value
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Numbers, then numeric strings, then zero.
pub(crate) fn lenient_number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0),
        other => strict_number(other),
    }
}

pub(crate) fn values(ctx: &BuildContext<'_>, key: &str) -> Vec<f64> {
    ctx.records.iter().map(|r| strict_number(r.get(key))).collect()
}

pub(crate) fn lenient_values(ctx: &BuildContext<'_>, key: &str) -> Vec<f64> {
    ctx.records.iter().map(|r| lenient_number(r.get(key))).collect()
}

pub(crate) fn color_at(ctx: &BuildContext<'_>, index: usize) -> Value {
    if ctx.palette.is_empty() {
        Value::Null
    } else {
        json!(ctx.palette[index % ctx.palette.len()])
    }
}

/// Title, palette and tooltip shared by every option structure.
pub(crate) fn base_option(ctx: &BuildContext<'_>, trigger: &str) -> Map<String, Value> {
    let mut option = Map::new();
    if let Some(title) = ctx.title.filter(|t| !t.trim().is_empty()) {
        option.insert("title".into(), json!({ "text": title, "left": "center" }));
    }
    option.insert("color".into(), json!(ctx.palette));
    option.insert("tooltip".into(), json!({ "trigger": trigger }));
    option
}

pub(crate) fn legend(names: &[String]) -> Value {
    json!({ "data": names, "top": "bottom" })
}

pub(crate) fn category_axes(labels: &[String], boundary_gap: bool) -> (Value, Value) {
    (
        json!({ "type": "category", "data": labels, "boundaryGap": boundary_gap }),
        json!({ "type": "value" }),
    )
}

/// Dashed, symbol-less least-squares overlays for the trend-eligible fields.
pub(crate) fn trendline_series(ctx: &BuildContext<'_>) -> Vec<Value> {
    let keys: Vec<&String> = match ctx.style.trendline {
        TrendlineMode::None => return Vec::new(),
        TrendlineMode::Single => vec![&ctx.mapping.value_key],
        TrendlineMode::Multiple => ctx.mapping.data_keys.iter().collect(),
    };
    keys.into_iter()
        .enumerate()
        .filter_map(|(i, key)| {
            let ys = values(ctx, key);
            let (slope, intercept) = linear_regression(&ys)?;
            let fitted: Vec<f64> = (0..ys.len())
                .map(|x| slope * x as f64 + intercept)
                .collect();
            let series_index = ctx
                .mapping
                .data_keys
                .iter()
                .position(|k| k == key)
                .unwrap_or(i);
            Some(json!({
                "name": format!("{key} trend"),
                "type": "line",
                "data": fitted,
                "smooth": false,
                "symbol": "none",
                "lineStyle": { "type": "dashed", "width": 2, "color": color_at(ctx, series_index) },
                "z": 3,
            }))
        })
        .collect()
}

pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        let formatted = format!("{value:.2}");
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

/// Same labels with ordinal suffixes on repeats, so chained nodes stay distinct.
pub(crate) fn unique_labels(labels: &[String]) -> Vec<String> {
    let mut seen: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
    labels
        .iter()
        .map(|label| {
            let count = seen.entry(label.as_str()).or_insert(0);
            *count += 1;
            if *count == 1 {
                label.clone()
            } else {
                format!("{label} ({count})")
            }
        })
        .collect()
}

/// Linear rescale of `value` from `[min, max]` into `[lo, hi]`.
pub(crate) fn scale(value: f64, min: f64, max: f64, lo: f64, hi: f64) -> f64 {
    if (max - min).abs() < f64::EPSILON {
        (lo + hi) / 2.0
    } else {
        lo + (value - min) / (max - min) * (hi - lo)
    }
}

pub(crate) fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let min = values.iter().copied().reduce(f64::min)?;
    let max = values.iter().copied().reduce(f64::max)?;
    Some((min, max))
}
