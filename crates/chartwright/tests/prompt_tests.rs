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

use chartwright::{
    extract_colors, flatten, interpret, ChartKind, FieldClassification, FieldClassifier,
    TrendlineMode,
};
use serde_json::{json, Value};

fn classification_of(record: Value) -> FieldClassification {
    FieldClassifier::new().classify(&flatten(&record, ""))
}

fn sales() -> FieldClassification {
    classification_of(json!({ "month": "Jan", "sales": 100, "profit": 20 }))
}

#[test]
fn test_longest_keyword_wins() {
    let intent = interpret("show me a stacked bar chart", &sales());
    assert_eq!(intent.chart_kind, ChartKind::StackedBar);
    assert!(intent.style.stacked);
}

#[test]
fn test_keywords_tolerate_separators() {
    assert_eq!(interpret("a stacked-bar view", &sales()).chart_kind, ChartKind::StackedBar);
    assert_eq!(interpret("Box and Whisker please", &sales()).chart_kind, ChartKind::Boxplot);
    assert_eq!(interpret("PIE", &sales()).chart_kind, ChartKind::Pie);
}

#[test]
fn test_keywords_match_whole_words_only() {
    // "barn" must not select bar.
    let intent = interpret("a pie of the barn inventory", &sales());
    assert_eq!(intent.chart_kind, ChartKind::Pie);
}

#[test]
fn test_no_signal_defaults_to_bar() {
    let intent = interpret("hello there", &sales());
    assert_eq!(intent.chart_kind, ChartKind::Bar);
    assert!(intent.label_key.is_none());
    assert!(intent.value_key.is_none());
    assert!(intent.multi_fields.is_empty());
    assert!(intent.colors.is_empty());
    assert_eq!(intent.style.trendline, TrendlineMode::None);
}

#[test]
fn test_empty_prompt_does_not_panic() {
    let intent = interpret("", &FieldClassification::default());
    assert_eq!(intent.chart_kind, ChartKind::Bar);
}

#[test]
fn test_dual_trendline_forces_line() {
    let intent = interpret("scatter plot of sales and profit with dual trendline", &sales());
    assert_eq!(intent.chart_kind, ChartKind::Line);
    assert_eq!(intent.style.trendline, TrendlineMode::Multiple);
    assert_eq!(intent.multi_fields, vec!["sales", "profit"]);
}

#[test]
fn test_qualified_scatter_survives_multiple_trendlines() {
    let intent = interpret("dual scatter with multiple trendlines", &sales());
    assert_eq!(intent.chart_kind, ChartKind::Scatter);
    assert_eq!(intent.style.trendline, TrendlineMode::Multiple);
}

#[test]
fn test_multiple_qualifier_away_from_trendline() {
    let intent = interpret("bar chart with trendlines for multiple series", &sales());
    assert_eq!(intent.chart_kind, ChartKind::Line);
    assert_eq!(intent.style.trendline, TrendlineMode::Multiple);
    assert_eq!(intent.multi_fields, vec!["sales", "profit"]);

    let intent = interpret("multiple bars, no trend", &sales());
    assert_eq!(intent.chart_kind, ChartKind::Bar);
    assert_eq!(intent.style.trendline, TrendlineMode::None);
}

#[test]
fn test_single_trendline_keeps_detected_type() {
    let intent = interpret("bar chart with a trend line", &sales());
    assert_eq!(intent.chart_kind, ChartKind::Bar);
    assert_eq!(intent.style.trendline, TrendlineMode::Single);

    let intent = interpret("area chart with linear regression", &sales());
    assert_eq!(intent.chart_kind, ChartKind::Area);
    assert_eq!(intent.style.trendline, TrendlineMode::Single);
}

#[test]
fn test_grouped_flag() {
    let intent = interpret("grouped bar of sales and profit", &sales());
    assert_eq!(intent.chart_kind, ChartKind::GroupedBar);
    assert!(intent.style.grouped);
    assert!(!intent.style.stacked);
}

#[test]
fn test_explicit_pair_selects_fields() {
    let c = classification_of(json!({ "quarter": "Q1", "revenue": 10, "cost": 4, "staff": 3 }));
    let intent = interpret("revenue vs cost", &c);
    assert_eq!(intent.multi_fields, vec!["revenue", "cost"]);
    assert_eq!(intent.value_key.as_deref(), Some("revenue"));
}

#[test]
fn test_mentioned_label_overrides_default() {
    let c = classification_of(json!({ "product": "A", "region": "North", "sales": 3 }));
    assert_eq!(c.label_key.as_deref(), Some("product"));
    let intent = interpret("sales by region", &c);
    assert_eq!(intent.label_key.as_deref(), Some("region"));
    assert_eq!(intent.value_key.as_deref(), Some("sales"));
    assert!(intent.multi_fields.is_empty());
}

#[test]
fn test_humanised_field_mentions() {
    let c = classification_of(json!({ "name": "a", "unit_price": 3, "stock_level": 8 }));
    let intent = interpret("plot unit price", &c);
    assert_eq!(intent.value_key.as_deref(), Some("unit_price"));
}

#[test]
fn test_comparison_falls_back_to_first_numeric_fields() {
    let c = classification_of(json!({ "month": "Jan", "north": 1, "south": 2, "east": 3 }));
    let intent = interpret("compare apples and oranges", &c);
    assert_eq!(intent.multi_fields, vec!["north", "south"]);
    assert_eq!(intent.value_key.as_deref(), Some("north"));
}

#[test]
fn test_extract_colors_in_order() {
    assert_eq!(extract_colors("make it red and #00ff00"), vec!["#ff0000", "#00ff00"]);
}

#[test]
fn test_extract_colors_dedupes_and_normalises() {
    assert_eq!(extract_colors("red, RED and #F00"), vec!["#ff0000"]);
    assert_eq!(extract_colors("#ABC then navy"), vec!["#aabbcc", "#000080"]);
}

#[test]
fn test_multi_word_colour_names() {
    assert_eq!(extract_colors("sky blue bars"), vec!["#87ceeb"]);
    assert_eq!(extract_colors("blue and dark green"), vec!["#0000ff", "#006400"]);
}

#[test]
fn test_rgb_literals() {
    assert_eq!(
        extract_colors("use rgb(10, 20, 30) and rgba(1,2,3,0.5)"),
        vec!["rgb(10,20,30)", "rgba(1,2,3,0.5)"]
    );
}

#[test]
fn test_colour_names_need_whole_words() {
    assert!(extract_colors("a bored ant").is_empty());
    assert!(extract_colors("standard layout").is_empty());
}

#[test]
fn test_bare_graph_is_not_a_network() {
    assert_eq!(interpret("graph of sales", &sales()).chart_kind, ChartKind::Bar);
    assert_eq!(interpret("bar graph of sales", &sales()).chart_kind, ChartKind::Bar);
    assert_eq!(interpret("network graph of sales", &sales()).chart_kind, ChartKind::Graph);
}
