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
    base_option, category_axes, color_at, labels, legend, min_max, scale, trendline_series,
    values,
};
use crate::registry::{BuildContext, ChartKind};
use serde_json::{json, Map, Value};

const STACK_ID: &str = "total";

/// Shared skeleton: category x axis, value y axis, one series per data key.
fn axis_option(
    ctx: &BuildContext<'_>,
    boundary_gap: bool,
    series_for: impl Fn(usize, &str, Vec<f64>) -> Vec<Value>,
) -> Option<Value> {
    if ctx.mapping.data_keys.is_empty() {
        return None;
    }
    let labels = labels(ctx);
    let mut option = base_option(ctx, "axis");
    let (x_axis, y_axis) = category_axes(&labels, boundary_gap);
    option.insert("legend".into(), legend(&ctx.mapping.data_keys));
    option.insert("grid".into(), json!({ "containLabel": true, "left": "3%", "right": "4%" }));
    option.insert("xAxis".into(), x_axis);
    option.insert("yAxis".into(), y_axis);
    let mut series: Vec<Value> = ctx
        .mapping
        .data_keys
        .iter()
        .enumerate()
        .flat_map(|(i, key)| series_for(i, key.as_str(), values(ctx, key)))
        .collect();
    if ctx.kind.supports_trendline() {
        series.extend(trendline_series(ctx));
    }
    option.insert("series".into(), Value::Array(series));
    Some(Value::Object(option))
}

fn stacked(ctx: &BuildContext<'_>) -> bool {
    match ctx.kind {
        ChartKind::StackedBar | ChartKind::StackedArea => true,
        ChartKind::GroupedBar => false,
        _ => ctx.style.stacked && !ctx.style.grouped,
    }
}

fn insert_stack(series: &mut Map<String, Value>, stacked: bool) {
    if stacked {
        series.insert("stack".into(), json!(STACK_ID));
    }
}

pub fn bar(ctx: &BuildContext<'_>) -> Option<Value> {
    let stacked = stacked(ctx);
    let grouped = ctx.kind == ChartKind::GroupedBar || ctx.style.grouped;
    axis_option(ctx, true, |i, key, data| {
        let mut series = Map::new();
        series.insert("name".into(), json!(key));
        series.insert("type".into(), json!("bar"));
        series.insert("data".into(), json!(data));
        series.insert("itemStyle".into(), json!({ "color": color_at(ctx, i) }));
        series.insert("emphasis".into(), json!({ "focus": "series" }));
        insert_stack(&mut series, stacked);
        if grouped && !stacked {
            series.insert("barGap".into(), json!("10%"));
        }
        vec![Value::Object(series)]
    })
}

/// Line, area and stacked area.
pub fn line(ctx: &BuildContext<'_>) -> Option<Value> {
    let stacked = stacked(ctx);
    let filled = matches!(ctx.kind, ChartKind::Area | ChartKind::StackedArea);
    axis_option(ctx, false, |i, key, data| {
        let mut series = Map::new();
        series.insert("name".into(), json!(key));
        series.insert("type".into(), json!("line"));
        series.insert("data".into(), json!(data));
        series.insert("smooth".into(), json!(filled));
        series.insert("itemStyle".into(), json!({ "color": color_at(ctx, i) }));
        if filled {
            series.insert("areaStyle".into(), json!({ "opacity": 0.35 }));
            series.insert("emphasis".into(), json!({ "focus": "series" }));
        }
        insert_stack(&mut series, stacked);
        vec![Value::Object(series)]
    })
}

/// Scatter and effect scatter.
pub fn scatter(ctx: &BuildContext<'_>) -> Option<Value> {
    let effect = ctx.kind == ChartKind::EffectScatter;
    axis_option(ctx, false, |i, key, data| {
        let mut series = json!({
            "name": key,
            "type": if effect { "effectScatter" } else { "scatter" },
            "data": data,
            "symbolSize": 12,
            "itemStyle": { "color": color_at(ctx, i) },
        });
        if effect {
            series["rippleEffect"] = json!({ "brushType": "stroke", "scale": 3 });
            series["showEffectOn"] = json!("render");
        }
        vec![series]
    })
}

/// Symbol area follows the value, rescaled per series into 10..50 px.
pub fn bubble(ctx: &BuildContext<'_>) -> Option<Value> {
    let labels = labels(ctx);
    axis_option(ctx, false, |i, key, data| {
        let (min, max) = min_max(&data).unwrap_or((0.0, 0.0));
        let points: Vec<Value> = data
            .iter()
            .zip(&labels)
            .map(|(v, label)| {
                json!({
                    "value": [label, v],
                    "symbolSize": scale(*v, min, max, 10.0, 50.0).round(),
                })
            })
            .collect();
        vec![json!({
            "name": key,
            "type": "scatter",
            "data": points,
            "itemStyle": { "color": color_at(ctx, i), "opacity": 0.75 },
        })]
    })
}

/// Thin bar stems with a dot on top; both halves share the legend name.
pub fn lollipop(ctx: &BuildContext<'_>) -> Option<Value> {
    axis_option(ctx, true, |i, key, data| {
        let color = color_at(ctx, i);
        vec![
            json!({
                "name": key,
                "type": "bar",
                "data": data,
                "barWidth": 2,
                "itemStyle": { "color": color },
            }),
            json!({
                "name": key,
                "type": "scatter",
                "data": data,
                "symbolSize": 14,
                "itemStyle": { "color": color },
                "z": 3,
            }),
        ]
    })
}
