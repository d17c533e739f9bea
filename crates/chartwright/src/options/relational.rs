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

//! Flow and hierarchy layouts. Records are read as an ordered chain: each
//! record links to the one after it.

use super::{base_option, color_at, labels, lenient_values, min_max, scale, unique_labels};
use crate::registry::BuildContext;
use serde_json::{json, Value};

/// Links between consecutive nodes, weighted by the target record's value.
fn chain_links(nodes: &[String], weights: &[f64]) -> Vec<Value> {
    nodes
        .windows(2)
        .zip(weights.iter().skip(1))
        .map(|(pair, weight)| json!({ "source": pair[0], "target": pair[1], "value": weight }))
        .collect()
}

pub fn sankey(ctx: &BuildContext<'_>) -> Option<Value> {
    let nodes = unique_labels(&labels(ctx));
    let weights = lenient_values(ctx, &ctx.mapping.value_key);
    let data: Vec<Value> = nodes.iter().map(|name| json!({ "name": name })).collect();
    let links = chain_links(&nodes, &weights);
    let mut option = base_option(ctx, "item");
    option.insert(
        "series".into(),
        json!([{
            "type": "sankey",
            "layout": "none",
            "emphasis": { "focus": "adjacency" },
            "data": data,
            "links": links,
            "lineStyle": { "color": "gradient", "curveness": 0.5 },
        }]),
    );
    Some(Value::Object(option))
}

/// Force-directed network; node size tracks the value.
pub fn graph(ctx: &BuildContext<'_>) -> Option<Value> {
    let nodes = unique_labels(&labels(ctx));
    let weights = lenient_values(ctx, &ctx.mapping.value_key);
    let (min, max) = min_max(&weights).unwrap_or((0.0, 0.0));
    let data: Vec<Value> = nodes
        .iter()
        .zip(&weights)
        .enumerate()
        .map(|(i, (name, value))| {
            json!({
                "name": name,
                "value": value,
                "symbolSize": scale(*value, min, max, 10.0, 50.0).round(),
                "itemStyle": { "color": color_at(ctx, i) },
            })
        })
        .collect();
    let links = chain_links(&nodes, &weights);
    let mut option = base_option(ctx, "item");
    option.insert(
        "series".into(),
        json!([{
            "type": "graph",
            "layout": "force",
            "roam": true,
            "draggable": true,
            "label": { "show": true, "position": "right" },
            "force": { "repulsion": 120, "edgeLength": 80 },
            "data": data,
            "links": links,
        }]),
    );
    Some(Value::Object(option))
}

/// One level deep: every record hangs off a single root.
pub fn tree(ctx: &BuildContext<'_>) -> Option<Value> {
    let root_name = ctx
        .title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or("root");
    let children: Vec<Value> = labels(ctx)
        .into_iter()
        .zip(lenient_values(ctx, &ctx.mapping.value_key))
        .map(|(name, value)| json!({ "name": name, "value": value }))
        .collect();
    let mut option = base_option(ctx, "item");
    option.insert(
        "series".into(),
        json!([{
            "type": "tree",
            "data": [{ "name": root_name, "children": children }],
            "top": "5%",
            "left": "10%",
            "bottom": "5%",
            "right": "20%",
            "symbolSize": 8,
            "label": { "position": "left", "verticalAlign": "middle", "align": "right" },
            "leaves": { "label": { "position": "right", "align": "left" } },
            "expandAndCollapse": true,
        }]),
    );
    Some(Value::Object(option))
}
