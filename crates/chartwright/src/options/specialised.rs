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

use super::{
    base_option, category_axes, color_at, labels, legend, lenient_values, min_max, values,
};
use crate::registry::BuildContext;
use serde_json::{json, Value};

const WATERFALL_STACK: &str = "waterfall";

/// Each bar floats on an invisible placeholder sitting at the running total.
pub fn waterfall(ctx: &BuildContext<'_>) -> Option<Value> {
    let deltas = values(ctx, &ctx.mapping.value_key);
    let mut running = 0.0;
    let mut placeholder = Vec::with_capacity(deltas.len());
    let mut bars = Vec::with_capacity(deltas.len());
    for delta in &deltas {
        let base = if *delta >= 0.0 { running } else { running + delta };
        running += delta;
        placeholder.push(json!(base));
        let color = if *delta >= 0.0 {
            color_at(ctx, 0)
        } else {
            color_at(ctx, 1)
        };
        bars.push(json!({ "value": delta.abs(), "itemStyle": { "color": color } }));
    }

    let mut option = base_option(ctx, "axis");
    let (x_axis, y_axis) = category_axes(&labels(ctx), true);
    option.insert("xAxis".into(), x_axis);
    option.insert("yAxis".into(), y_axis);
    option.insert(
        "series".into(),
        json!([
            {
                "name": "placeholder",
                "type": "bar",
                "stack": WATERFALL_STACK,
                "silent": true,
                "itemStyle": { "borderColor": "transparent", "color": "transparent" },
                "emphasis": { "itemStyle": { "borderColor": "transparent", "color": "transparent" } },
                "data": placeholder,
            },
            {
                "name": ctx.mapping.value_key,
                "type": "bar",
                "stack": WATERFALL_STACK,
                "label": { "show": true, "position": "top" },
                "data": bars,
            }
        ]),
    );
    Some(Value::Object(option))
}

pub fn polar(ctx: &BuildContext<'_>) -> Option<Value> {
    let series: Vec<Value> = ctx
        .mapping
        .data_keys
        .iter()
        .enumerate()
        .map(|(i, key)| {
            let mut s = json!({
                "name": key,
                "type": "bar",
                "coordinateSystem": "polar",
                "data": values(ctx, key),
                "itemStyle": { "color": color_at(ctx, i) },
            });
            if ctx.style.stacked {
                s["stack"] = json!("total");
            }
            s
        })
        .collect();
    let mut option = base_option(ctx, "item");
    option.insert("polar".into(), json!({ "radius": [30, "80%"] }));
    option.insert(
        "angleAxis".into(),
        json!({ "type": "category", "data": labels(ctx), "startAngle": 75 }),
    );
    option.insert("radiusAxis".into(), json!({}));
    option.insert("legend".into(), legend(&ctx.mapping.data_keys));
    option.insert("series".into(), Value::Array(series));
    Some(Value::Object(option))
}

/// Record labels are the spokes; each field draws one polygon.
pub fn radar(ctx: &BuildContext<'_>) -> Option<Value> {
    let columns: Vec<(&String, Vec<f64>)> = ctx
        .mapping
        .data_keys
        .iter()
        .map(|k| (k, values(ctx, k)))
        .collect();
    let peak = columns
        .iter()
        .flat_map(|(_, v)| v.iter().copied())
        .fold(f64::NEG_INFINITY, f64::max);
    let axis_max = if peak > 0.0 { (peak * 1.2).ceil() } else { 1.0 };
    let indicator: Vec<Value> = labels(ctx)
        .into_iter()
        .map(|name| json!({ "name": name, "max": axis_max }))
        .collect();
    let data: Vec<Value> = columns
        .iter()
        .enumerate()
        .map(|(i, (key, v))| {
            json!({
                "name": key,
                "value": v,
                "itemStyle": { "color": color_at(ctx, i) },
                "areaStyle": { "opacity": 0.2 },
            })
        })
        .collect();
    let mut option = base_option(ctx, "item");
    option.insert("legend".into(), legend(&ctx.mapping.data_keys));
    option.insert("radar".into(), json!({ "indicator": indicator, "shape": "polygon" }));
    option.insert("series".into(), json!([{ "type": "radar", "data": data }]));
    Some(Value::Object(option))
}

/// Labels across, fields down, one cell per (record, field).
pub fn heatmap(ctx: &BuildContext<'_>) -> Option<Value> {
    let mut cells = Vec::new();
    let mut all = Vec::new();
    for (y, key) in ctx.mapping.data_keys.iter().enumerate() {
        for (x, v) in values(ctx, key).into_iter().enumerate() {
            cells.push(json!([x, y, v]));
            all.push(v);
        }
    }
    let (min, max) = min_max(&all)?;
    let mut option = base_option(ctx, "item");
    option.insert("grid".into(), json!({ "height": "60%", "top": "10%" }));
    option.insert(
        "xAxis".into(),
        json!({ "type": "category", "data": labels(ctx), "splitArea": { "show": true } }),
    );
    option.insert(
        "yAxis".into(),
        json!({ "type": "category", "data": ctx.mapping.data_keys, "splitArea": { "show": true } }),
    );
    option.insert(
        "visualMap".into(),
        json!({
            "min": min,
            "max": max,
            "calculable": true,
            "orient": "horizontal",
            "left": "center",
            "bottom": "5%",
        }),
    );
    option.insert(
        "series".into(),
        json!([{
            "name": ctx.mapping.value_key,
            "type": "heatmap",
            "data": cells,
            "label": { "show": true },
        }]),
    );
    Some(Value::Object(option))
}

/// Smallest of 1, 2, 5 or 10 times a power of ten that is at least `value`.
pub(crate) fn nice_ceiling(value: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return 100.0;
    }
    let magnitude = 10f64.powi(value.log10().floor() as i32);
    let normalised = value / magnitude;
    let step = [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .find(|s| *s >= normalised)
        .unwrap_or(10.0);
    step * magnitude
}

/// Shows the first record; the dial runs up to a rounded data maximum.
pub fn gauge(ctx: &BuildContext<'_>) -> Option<Value> {
    let data = lenient_values(ctx, &ctx.mapping.value_key);
    let first = *data.first()?;
    let (_, max) = min_max(&data)?;
    let name = labels(ctx).into_iter().next().unwrap_or_default();
    let mut option = base_option(ctx, "item");
    option.insert(
        "series".into(),
        json!([{
            "name": ctx.mapping.value_key,
            "type": "gauge",
            "min": 0,
            "max": nice_ceiling(max),
            "progress": { "show": true },
            "axisLine": { "lineStyle": { "width": 18 } },
            "itemStyle": { "color": color_at(ctx, 0) },
            "detail": { "valueAnimation": true, "formatter": "{value}" },
            "data": [{ "value": first, "name": name }],
        }]),
    );
    Some(Value::Object(option))
}

#[cfg(test)]
mod tests {
    use super::nice_ceiling;

    #[test]
    fn gauge_maximum_rounds_up() {
        assert_eq!(nice_ceiling(400.0), 500.0);
        assert_eq!(nice_ceiling(87.0), 100.0);
        assert_eq!(nice_ceiling(1.5), 2.0);
        assert_eq!(nice_ceiling(0.0), 100.0);
    }
}
