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

//! Distribution, financial and multivariate charts, plus the numeric helpers
//! they share with the trendline overlay.

use super::{base_option, category_axes, color_at, format_number, labels, legend, min_max, values};
use crate::registry::BuildContext;
use serde::Serialize;
use serde_json::{json, Value};

const DENSITY_SAMPLES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}
impl FiveNumberSummary {
    /// `[min, Q1, median, Q3, max]`, the row layout boxplot series expect.
    pub fn to_row(&self) -> [f64; 5] {
        [self.min, self.q1, self.median, self.q3, self.max]
    }
}

/// Nearest-rank quartiles: the value at `floor(n * p)` of the sorted input,
/// clamped to the last index.
pub fn five_number_summary(values: &[f64]) -> Option<FiveNumberSummary> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    let rank = |p: f64| sorted[((n as f64 * p).floor() as usize).min(n - 1)];
    Some(FiveNumberSummary {
        min: sorted[0],
        q1: rank(0.25),
        median: rank(0.5),
        q3: rank(0.75),
        max: sorted[n - 1],
    })
}

/// Ordinary least squares over `(index, value)` pairs. Returns `(slope, intercept)`.
pub fn linear_regression(ys: &[f64]) -> Option<(f64, f64)> {
    let n = ys.len();
    if n < 2 {
        return None;
    }
    let n_f = n as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx) = (0.0, 0.0, 0.0, 0.0);
    for (x, y) in ys.iter().enumerate() {
        let x = x as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }
    let denominator = n_f * sum_xx - sum_x * sum_x;
    if denominator.abs() < f64::EPSILON {
        return None;
    }
    let slope = (n_f * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n_f;
    Some((slope, intercept))
}

fn series_values<'a>(ctx: &BuildContext<'a>) -> Vec<(usize, &'a String, Vec<f64>)> {
    ctx.mapping
        .data_keys
        .iter()
        .enumerate()
        .map(|(i, key)| (i, key, values(ctx, key)))
        .collect()
}

/// Shared bins across every field so the bars line up.
pub fn histogram(ctx: &BuildContext<'_>) -> Option<Value> {
    let fields = series_values(ctx);
    let all: Vec<f64> = fields.iter().flat_map(|(_, _, v)| v.iter().copied()).collect();
    let (min, max) = min_max(&all)?;
    let bins = ((ctx.records.len() as f64).sqrt().ceil() as usize).max(1);
    let width = (max - min) / bins as f64;
    let bin_of = |v: f64| {
        if width > 0.0 {
            (((v - min) / width).floor() as usize).min(bins - 1)
        } else {
            0
        }
    };
    let bin_labels: Vec<String> = (0..bins)
        .map(|b| {
            let lo = min + width * b as f64;
            format!("{}-{}", format_number(lo), format_number(lo + width))
        })
        .collect();
    let series: Vec<Value> = fields
        .iter()
        .map(|(i, key, data)| {
            let mut counts = vec![0u64; bins];
            for v in data {
                counts[bin_of(*v)] += 1;
            }
            json!({
                "name": key,
                "type": "bar",
                "data": counts,
                "barGap": "0%",
                "barCategoryGap": "1%",
                "itemStyle": { "color": color_at(ctx, *i) },
            })
        })
        .collect();

    let mut option = base_option(ctx, "axis");
    let (x_axis, y_axis) = category_axes(&bin_labels, true);
    option.insert("legend".into(), legend(&ctx.mapping.data_keys));
    option.insert("xAxis".into(), x_axis);
    option.insert("yAxis".into(), y_axis);
    option.insert("series".into(), Value::Array(series));
    Some(Value::Object(option))
}

fn silverman_bandwidth(data: &[f64]) -> f64 {
    let n = data.len() as f64;
    let mean = data.iter().sum::<f64>() / n;
    let variance = data.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let h = 1.06 * variance.sqrt() * n.powf(-0.2);
    if h.is_finite() && h > 0.0 {
        h
    } else {
        1.0
    }
}

fn gaussian_kde(data: &[f64], h: f64, x: f64) -> f64 {
    let norm = 1.0 / (data.len() as f64 * h * (2.0 * std::f64::consts::PI).sqrt());
    data.iter()
        .map(|xi| (-0.5 * ((x - xi) / h).powi(2)).exp())
        .sum::<f64>()
        * norm
}

/// Gaussian kernel density curve per field on a value x axis.
pub fn density(ctx: &BuildContext<'_>) -> Option<Value> {
    let series: Vec<Value> = series_values(ctx)
        .into_iter()
        .filter_map(|(i, key, data)| {
            let (min, max) = min_max(&data)?;
            let h = silverman_bandwidth(&data);
            let (lo, hi) = (min - 3.0 * h, max + 3.0 * h);
            let step = (hi - lo) / (DENSITY_SAMPLES - 1) as f64;
            let points: Vec<[f64; 2]> = (0..DENSITY_SAMPLES)
                .map(|s| {
                    let x = lo + step * s as f64;
                    [x, gaussian_kde(&data, h, x)]
                })
                .collect();
            Some(json!({
                "name": key,
                "type": "line",
                "smooth": true,
                "symbol": "none",
                "data": points,
                "itemStyle": { "color": color_at(ctx, i) },
                "areaStyle": { "opacity": 0.25 },
            }))
        })
        .collect();
    if series.is_empty() {
        return None;
    }
    let mut option = base_option(ctx, "axis");
    option.insert("legend".into(), legend(&ctx.mapping.data_keys));
    option.insert("xAxis".into(), json!({ "type": "value", "scale": true }));
    option.insert("yAxis".into(), json!({ "type": "value", "name": "density" }));
    option.insert("series".into(), Value::Array(series));
    Some(Value::Object(option))
}

/// One box per field, all in a single series.
pub fn boxplot(ctx: &BuildContext<'_>) -> Option<Value> {
    let rows: Vec<[f64; 5]> = series_values(ctx)
        .iter()
        .map(|(_, _, data)| {
            five_number_summary(data)
                .map(|s| s.to_row())
                .unwrap_or([0.0; 5])
        })
        .collect();
    if rows.is_empty() {
        return None;
    }
    let mut option = base_option(ctx, "item");
    let (x_axis, y_axis) = category_axes(&ctx.mapping.data_keys, true);
    option.insert("xAxis".into(), x_axis);
    option.insert("yAxis".into(), y_axis);
    option.insert(
        "series".into(),
        json!([{
            "name": "boxplot",
            "type": "boxplot",
            "data": rows,
            "itemStyle": { "color": color_at(ctx, 0), "borderColor": "#333" },
        }]),
    );
    Some(Value::Object(option))
}

const OHLC: [&str; 4] = ["open", "close", "low", "high"];

/// Fields named open/close/low/high are picked by name when both open and
/// close are present; otherwise the order given is kept.
fn ohlc_order(keys: &[String]) -> Vec<&String> {
    let named: Vec<Option<&String>> = OHLC
        .iter()
        .map(|role| keys.iter().find(|k| k.to_lowercase().contains(role)))
        .collect();
    match named.as_slice() {
        [Some(open), Some(close), low, high] => {
            let mut ordered = vec![*open, *close];
            // Low and high travel as a pair.
            if let (Some(low), Some(high)) = (low, high) {
                ordered.extend([*low, *high]);
            }
            ordered
        }
        _ => keys.iter().collect(),
    }
}

/// Fields are read as open, close, low, high. Missing low and high come from
/// the open/close pair; a missing close repeats the open.
pub fn candlestick(ctx: &BuildContext<'_>) -> Option<Value> {
    let keys = ohlc_order(&ctx.mapping.data_keys);
    let open_key = *keys.first()?;
    let open = values(ctx, open_key);
    let close = keys.get(1).map(|k| values(ctx, k)).unwrap_or_else(|| open.clone());
    let low = keys.get(2).map(|k| values(ctx, k));
    let high = keys.get(3).map(|k| values(ctx, k));
    let rows: Vec<[f64; 4]> = (0..open.len())
        .map(|i| {
            let (o, c) = (open[i], close[i]);
            let l = low.as_ref().map_or(o.min(c), |v| v[i]);
            let h = high.as_ref().map_or(o.max(c), |v| v[i]);
            [o, c, l, h]
        })
        .collect();
    let mut option = base_option(ctx, "axis");
    let (x_axis, _) = category_axes(&labels(ctx), true);
    option.insert("xAxis".into(), x_axis);
    option.insert("yAxis".into(), json!({ "type": "value", "scale": true }));
    option.insert(
        "series".into(),
        json!([{
            "name": open_key,
            "type": "candlestick",
            "data": rows,
            "itemStyle": {
                "color": color_at(ctx, 0),
                "color0": color_at(ctx, 1),
                "borderColor": color_at(ctx, 0),
                "borderColor0": color_at(ctx, 1),
            },
        }]),
    );
    Some(Value::Object(option))
}

pub fn parallel(ctx: &BuildContext<'_>) -> Option<Value> {
    let keys = &ctx.mapping.data_keys;
    if keys.is_empty() {
        return None;
    }
    let axes: Vec<Value> = keys
        .iter()
        .enumerate()
        .map(|(dim, key)| json!({ "dim": dim, "name": key }))
        .collect();
    let columns: Vec<Vec<f64>> = keys.iter().map(|k| values(ctx, k)).collect();
    let rows: Vec<Vec<f64>> = (0..ctx.records.len())
        .map(|r| columns.iter().map(|c| c[r]).collect())
        .collect();
    let mut option = base_option(ctx, "item");
    option.insert("parallelAxis".into(), Value::Array(axes));
    option.insert(
        "series".into(),
        json!([{
            "type": "parallel",
            "data": rows,
            "lineStyle": { "width": 1.5, "opacity": 0.6, "color": color_at(ctx, 0) },
        }]),
    );
    Some(Value::Object(option))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bandwidth_falls_back_for_constant_data() {
        assert_eq!(silverman_bandwidth(&[5.0, 5.0, 5.0]), 1.0);
        assert!(silverman_bandwidth(&[1.0, 2.0, 3.0, 4.0]) > 0.0);
    }

    #[test]
    fn kde_peaks_at_the_sample() {
        let at_sample = gaussian_kde(&[0.0], 1.0, 0.0);
        let away = gaussian_kde(&[0.0], 1.0, 2.0);
        assert!(at_sample > away);
    }
}
