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

//! Date-bucketed charts. Records whose label does not parse as a date are
//! left out; a chart with no parseable dates at all cannot be built.

use super::{base_option, color_at, labels, legend, lenient_values, min_max};
use crate::registry::BuildContext;
use chrono::NaiveDate;
use serde_json::{json, Value};

const DAY_FORMAT: &str = "%Y-%m-%d";

/// `(record index, day)` for every record with a parseable label.
fn dated_records(ctx: &BuildContext<'_>) -> Vec<(usize, NaiveDate)> {
    labels(ctx)
        .iter()
        .enumerate()
        .filter_map(|(i, label)| ctx.classifier.parse_date(label).map(|dt| (i, dt.date())))
        .collect()
}

pub fn calendar(ctx: &BuildContext<'_>) -> Option<Value> {
    let dated = dated_records(ctx);
    let first_day = dated.iter().map(|(_, d)| *d).min()?;
    let last_day = dated.iter().map(|(_, d)| *d).max()?;
    let values = lenient_values(ctx, &ctx.mapping.value_key);
    let cells: Vec<Value> = dated
        .iter()
        .map(|(i, day)| json!([day.format(DAY_FORMAT).to_string(), values[*i]]))
        .collect();
    let dated_values: Vec<f64> = dated.iter().map(|(i, _)| values[*i]).collect();
    let (min, max) = min_max(&dated_values)?;

    let mut option = base_option(ctx, "item");
    option.insert(
        "visualMap".into(),
        json!({
            "min": min,
            "max": max,
            "calculable": true,
            "orient": "horizontal",
            "left": "center",
            "top": 40,
            "inRange": { "color": ["#ebedf0", color_at(ctx, 0)] },
        }),
    );
    option.insert(
        "calendar".into(),
        json!({
            "top": 100,
            "left": 40,
            "right": 40,
            "cellSize": ["auto", 16],
            "range": [
                first_day.format(DAY_FORMAT).to_string(),
                last_day.format(DAY_FORMAT).to_string(),
            ],
            "yearLabel": { "show": true },
        }),
    );
    option.insert(
        "series".into(),
        json!([{
            "name": ctx.mapping.value_key,
            "type": "heatmap",
            "coordinateSystem": "calendar",
            "data": cells,
        }]),
    );
    Some(Value::Object(option))
}

/// One `[date, value, field]` triple per dated record and field.
pub fn theme_river(ctx: &BuildContext<'_>) -> Option<Value> {
    let dated = dated_records(ctx);
    if dated.is_empty() {
        return None;
    }
    let mut triples = Vec::with_capacity(dated.len() * ctx.mapping.data_keys.len());
    for key in &ctx.mapping.data_keys {
        let values = lenient_values(ctx, key);
        for (i, day) in &dated {
            triples.push(json!([day.format(DAY_FORMAT).to_string(), values[*i], key]));
        }
    }
    let mut option = base_option(ctx, "axis");
    option.insert("legend".into(), legend(&ctx.mapping.data_keys));
    option.insert(
        "singleAxis".into(),
        json!({ "type": "time", "top": 50, "bottom": 50 }),
    );
    option.insert(
        "series".into(),
        json!([{
            "type": "themeRiver",
            "emphasis": { "itemStyle": { "shadowBlur": 20, "shadowColor": "rgba(0, 0, 0, 0.8)" } },
            "data": triples,
        }]),
    );
    option["tooltip"]["axisPointer"] = json!({ "type": "line" });
    Some(Value::Object(option))
}
