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

use super::{base_option, color_at, labels, lenient_values};
use crate::registry::{BuildContext, ChartKind};
use serde_json::{json, Value};

struct Slice {
    name: String,
    value: f64,
    color: Value,
}
impl Slice {
    fn to_json(&self) -> Value {
        json!({ "name": self.name, "value": self.value, "itemStyle": { "color": self.color } })
    }
}

fn slices(ctx: &BuildContext<'_>) -> Vec<Slice> {
    labels(ctx)
        .into_iter()
        .zip(lenient_values(ctx, &ctx.mapping.value_key))
        .enumerate()
        .map(|(i, (name, value))| Slice {
            name,
            value,
            color: color_at(ctx, i),
        })
        .collect()
}

fn single_series(ctx: &BuildContext<'_>, series: Value, with_legend: bool) -> Option<Value> {
    let mut option = base_option(ctx, "item");
    if with_legend {
        let names: Vec<String> = labels(ctx);
        option.insert(
            "legend".into(),
            json!({ "orient": "vertical", "left": "left", "data": names }),
        );
    }
    option.insert("series".into(), json!([series]));
    Some(Value::Object(option))
}

/// Pie and donut.
pub fn pie(ctx: &BuildContext<'_>) -> Option<Value> {
    let data: Vec<Value> = slices(ctx).iter().map(Slice::to_json).collect();
    let radius = if ctx.kind == ChartKind::Donut {
        json!(["40%", "70%"])
    } else {
        json!("60%")
    };
    let mut option = single_series(
        ctx,
        json!({
            "name": ctx.mapping.value_key,
            "type": "pie",
            "radius": radius,
            "center": ["50%", "55%"],
            "avoidLabelOverlap": true,
            "data": data,
            "emphasis": {
                "itemStyle": { "shadowBlur": 10, "shadowOffsetX": 0, "shadowColor": "rgba(0, 0, 0, 0.5)" }
            },
        }),
        true,
    )?;
    option["tooltip"]["formatter"] = json!("{b}: {c} ({d}%)");
    Some(option)
}

pub fn sunburst(ctx: &BuildContext<'_>) -> Option<Value> {
    let data: Vec<Value> = slices(ctx).iter().map(Slice::to_json).collect();
    single_series(
        ctx,
        json!({
            "type": "sunburst",
            "radius": [0, "90%"],
            "data": data,
            "label": { "rotate": "radial" },
        }),
        false,
    )
}

pub fn treemap(ctx: &BuildContext<'_>) -> Option<Value> {
    let data: Vec<Value> = slices(ctx).iter().map(Slice::to_json).collect();
    single_series(
        ctx,
        json!({
            "name": ctx.mapping.value_key,
            "type": "treemap",
            "roam": false,
            "breadcrumb": { "show": false },
            "label": { "show": true, "formatter": "{b}" },
            "data": data,
        }),
        false,
    )
}

/// Slices keep their record colour but are laid out largest first.
pub fn funnel(ctx: &BuildContext<'_>) -> Option<Value> {
    let mut slices = slices(ctx);
    slices.sort_by(|a, b| b.value.total_cmp(&a.value));
    let data: Vec<Value> = slices.iter().map(Slice::to_json).collect();
    single_series(
        ctx,
        json!({
            "name": ctx.mapping.value_key,
            "type": "funnel",
            "sort": "descending",
            "left": "10%",
            "width": "80%",
            "gap": 2,
            "label": { "show": true, "position": "inside" },
            "data": data,
        }),
        true,
    )
}
