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

//! Catalogue of supported chart types.
//!
//! Every [`ChartKind`] owns one [`ChartTypeEntry`]: the prompt keywords that
//! select it, how many value fields it consumes, and the pure option builder
//! that turns resolved fields and records into a renderer option structure.

use crate::classify::FieldClassifier;
use crate::error::ChartError;
use crate::flatten::FlattenedRecord;
use crate::options::{cartesian, proportional, relational, specialised, statistical, temporal};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    StackedBar,
    GroupedBar,
    Line,
    Area,
    StackedArea,
    Scatter,
    Bubble,
    EffectScatter,
    Lollipop,
    Histogram,
    Density,
    Boxplot,
    Waterfall,
    Polar,
    Radar,
    Heatmap,
    Gauge,
    Pie,
    Donut,
    Sunburst,
    Treemap,
    Funnel,
    Sankey,
    Graph,
    Tree,
    Candlestick,
    Parallel,
    Calendar,
    ThemeRiver,
}
impl ChartKind {
    pub const ALL: [ChartKind; 30] = [
        ChartKind::Bar,
        ChartKind::StackedBar,
        ChartKind::GroupedBar,
        ChartKind::Line,
        ChartKind::Area,
        ChartKind::StackedArea,
        ChartKind::Scatter,
        ChartKind::Bubble,
        ChartKind::EffectScatter,
        ChartKind::Lollipop,
        ChartKind::Histogram,
        ChartKind::Density,
        ChartKind::Boxplot,
        ChartKind::Waterfall,
        ChartKind::Polar,
        ChartKind::Radar,
        ChartKind::Heatmap,
        ChartKind::Gauge,
        ChartKind::Pie,
        ChartKind::Donut,
        ChartKind::Sunburst,
        ChartKind::Treemap,
        ChartKind::Funnel,
        ChartKind::Sankey,
        ChartKind::Graph,
        ChartKind::Tree,
        ChartKind::Candlestick,
        ChartKind::Parallel,
        ChartKind::Calendar,
        ChartKind::ThemeRiver,
    ];
    pub fn all() -> &'static [ChartKind] {
        &Self::ALL
    }
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::StackedBar => "stackedbar",
            ChartKind::GroupedBar => "groupedbar",
            ChartKind::Line => "line",
            ChartKind::Area => "area",
            ChartKind::StackedArea => "stackedarea",
            ChartKind::Scatter => "scatter",
            ChartKind::Bubble => "bubble",
            ChartKind::EffectScatter => "effectscatter",
            ChartKind::Lollipop => "lollipop",
            ChartKind::Histogram => "histogram",
            ChartKind::Density => "density",
            ChartKind::Boxplot => "boxplot",
            ChartKind::Waterfall => "waterfall",
            ChartKind::Polar => "polar",
            ChartKind::Radar => "radar",
            ChartKind::Heatmap => "heatmap",
            ChartKind::Gauge => "gauge",
            ChartKind::Pie => "pie",
            ChartKind::Donut => "donut",
            ChartKind::Sunburst => "sunburst",
            ChartKind::Treemap => "treemap",
            ChartKind::Funnel => "funnel",
            ChartKind::Sankey => "sankey",
            ChartKind::Graph => "graph",
            ChartKind::Tree => "tree",
            ChartKind::Candlestick => "candlestick",
            ChartKind::Parallel => "parallel",
            ChartKind::Calendar => "calendar",
            ChartKind::ThemeRiver => "themeriver",
        }
    }
    fn index(self) -> usize {
        self as usize
    }
    /// Cartesian charts on a category axis that can carry regression overlays.
    pub fn supports_trendline(&self) -> bool {
        matches!(
            self,
            ChartKind::Bar
                | ChartKind::StackedBar
                | ChartKind::GroupedBar
                | ChartKind::Line
                | ChartKind::Area
                | ChartKind::StackedArea
                | ChartKind::Scatter
                | ChartKind::EffectScatter
                | ChartKind::Lollipop
        )
    }
    /// One colour per record rather than one per series.
    pub fn colors_per_record(&self) -> bool {
        matches!(
            self,
            ChartKind::Pie
                | ChartKind::Donut
                | ChartKind::Sunburst
                | ChartKind::Treemap
                | ChartKind::Funnel
                | ChartKind::Graph
        )
    }
}
impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
impl FromStr for ChartKind {
    type Err = ChartError;

    /// Case and separator insensitive: `Stacked-Bar` and `stacked bar` both parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        let alias = match compact.as_str() {
            "doughnut" => "donut",
            "network" => "graph",
            "box" => "boxplot",
            other => other,
        };
        ChartKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == alias)
            .ok_or_else(|| ChartError::UnknownChartType {
                name: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldArity {
    /// One label and one value field.
    Single,
    /// One series per resolved value field.
    Series,
    /// Fields taken positionally, filled from the numeric columns when the prompt names fewer.
    Positional { min: usize, max: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendlineMode {
    #[default]
    None,
    Single,
    Multiple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StyleFlags {
    pub stacked: bool,
    pub grouped: bool,
    pub trendline: TrendlineMode,
}

/// Resolved label and value fields; `data_keys` always holds at least `value_key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
    pub name_key: String,
    pub value_key: String,
    pub data_keys: Vec<String>,
}
impl FieldMapping {
    pub fn single(name_key: &str, value_key: &str) -> Self {
        Self {
            name_key: name_key.to_string(),
            value_key: value_key.to_string(),
            data_keys: vec![value_key.to_string()],
        }
    }
}

pub struct BuildContext<'a> {
    pub kind: ChartKind,
    pub mapping: &'a FieldMapping,
    pub records: &'a [FlattenedRecord],
    pub style: &'a StyleFlags,
    pub palette: &'a [String],
    pub title: Option<&'a str>,
    pub classifier: &'a FieldClassifier,
}

pub type OptionBuilder = fn(&BuildContext<'_>) -> Option<Value>;

#[derive(Clone)]
pub struct ChartTypeEntry {
    pub kind: ChartKind,
    pub keywords: &'static [&'static str],
    pub arity: FieldArity,
    pub needs_date_label: bool,
    pub build: OptionBuilder,
}
impl fmt::Debug for ChartTypeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartTypeEntry")
            .field("kind", &self.kind)
            .field("keywords", &self.keywords)
            .field("arity", &self.arity)
            .field("needs_date_label", &self.needs_date_label)
            .finish_non_exhaustive()
    }
}

fn entry(
    kind: ChartKind,
    keywords: &'static [&'static str],
    arity: FieldArity,
    build: OptionBuilder,
) -> ChartTypeEntry {
    ChartTypeEntry {
        kind,
        keywords,
        arity,
        needs_date_label: false,
        build,
    }
}

fn standard_entries() -> Vec<ChartTypeEntry> {
    use ChartKind::*;
    use FieldArity::*;
    let mut entries = vec![
        entry(Bar, &["bar", "bar chart", "bar graph", "column", "column chart"], Series, cartesian::bar),
        entry(StackedBar, &["stacked bar", "stacked column", "stackedbar"], Series, cartesian::bar),
        entry(
            GroupedBar,
            &["grouped bar", "clustered bar", "side by side bar", "grouped column", "groupedbar"],
            Series,
            cartesian::bar,
        ),
        entry(Line, &["line", "line chart", "line graph", "time series", "timeseries"], Series, cartesian::line),
        entry(Area, &["area", "area chart", "area graph"], Series, cartesian::line),
        entry(StackedArea, &["stacked area", "stackedarea"], Series, cartesian::line),
        entry(
            Scatter,
            &["scatter", "scatter plot", "scatterplot", "scatter chart", "scatter graph", "correlation"],
            Series,
            cartesian::scatter,
        ),
        entry(Bubble, &["bubble", "bubble chart"], Series, cartesian::bubble),
        entry(EffectScatter, &["effect scatter", "effectscatter", "ripple", "ripple scatter"], Series, cartesian::scatter),
        entry(Lollipop, &["lollipop", "lollipop chart"], Series, cartesian::lollipop),
        entry(Histogram, &["histogram", "frequency distribution", "distribution"], Series, statistical::histogram),
        entry(Density, &["density", "density plot", "kde"], Series, statistical::density),
        entry(
            Boxplot,
            &["box plot", "boxplot", "box and whisker", "whisker", "quartile", "quartiles"],
            Series,
            statistical::boxplot,
        ),
        entry(Waterfall, &["waterfall", "bridge chart"], Single, specialised::waterfall),
        entry(Polar, &["polar", "polar bar", "radial bar"], Series, specialised::polar),
        entry(Radar, &["radar", "spider", "spider chart", "web chart"], Series, specialised::radar),
        entry(Heatmap, &["heatmap", "heat map", "matrix"], Series, specialised::heatmap),
        entry(Gauge, &["gauge", "meter", "speedometer", "dial"], Single, specialised::gauge),
        entry(Pie, &["pie", "pie chart", "proportion", "proportions"], Single, proportional::pie),
        entry(Donut, &["donut", "doughnut", "ring chart"], Single, proportional::pie),
        entry(Sunburst, &["sunburst"], Single, proportional::sunburst),
        entry(Treemap, &["treemap", "tree map"], Single, proportional::treemap),
        entry(Funnel, &["funnel", "conversion"], Single, proportional::funnel),
        entry(Sankey, &["sankey", "flow diagram", "alluvial"], Single, relational::sankey),
        entry(
            Graph,
            &["network", "network graph", "force graph", "force directed", "node link"],
            Single,
            relational::graph,
        ),
        entry(Tree, &["tree", "tree diagram", "hierarchy", "org chart", "dendrogram"], Single, relational::tree),
        entry(
            Candlestick,
            &["candlestick", "candle", "ohlc", "stock"],
            Positional { min: 1, max: 4 },
            statistical::candlestick,
        ),
        entry(
            Parallel,
            &["parallel", "parallel coordinates"],
            Positional { min: 2, max: 12 },
            statistical::parallel,
        ),
        entry(Calendar, &["calendar", "calendar heatmap", "calendar heat map"], Single, temporal::calendar),
        entry(
            ThemeRiver,
            &["theme river", "themeriver", "streamgraph", "stream graph"],
            Series,
            temporal::theme_river,
        ),
    ];
    for e in entries.iter_mut() {
        if matches!(e.kind, Calendar | ThemeRiver) {
            e.needs_date_label = true;
        }
    }
    entries
}

struct KeywordMatcher {
    pattern: Regex,
    kind: ChartKind,
}

pub struct ChartRegistry {
    entries: Vec<ChartTypeEntry>,
    matchers: Vec<KeywordMatcher>,
}
impl ChartRegistry {
    pub fn new() -> Self {
        let entries = standard_entries();
        let mut keywords: Vec<(&'static str, ChartKind)> = entries
            .iter()
            .flat_map(|e| e.keywords.iter().map(move |kw| (*kw, e.kind)))
            .collect();
        // Stable sort keeps catalogue order between keywords of equal length.
        keywords.sort_by_key(|(kw, _)| std::cmp::Reverse(kw.chars().count()));
        let matchers = keywords
            .into_iter()
            .filter_map(|(kw, kind)| {
                keyword_pattern(kw).map(|pattern| KeywordMatcher { pattern, kind })
            })
            .collect();
        Self { entries, matchers }
    }

    /// Swaps the option builder for one chart type.
    pub fn with_builder(mut self, kind: ChartKind, build: OptionBuilder) -> Self {
        self.entries[kind.index()].build = build;
        self
    }

    pub fn entry(&self, kind: ChartKind) -> &ChartTypeEntry {
        &self.entries[kind.index()]
    }

    pub fn entries(&self) -> &[ChartTypeEntry] {
        &self.entries
    }

    /// Longest keyword first; the first whole-word match wins.
    pub fn detect(&self, prompt: &str) -> Option<ChartKind> {
        self.matchers
            .iter()
            .find(|m| m.pattern.is_match(prompt))
            .map(|m| m.kind)
    }

    /// Unknown identifiers degrade to a bar chart.
    pub fn resolve(&self, identifier: &str) -> ChartKind {
        match identifier.parse::<ChartKind>() {
            Ok(kind) => kind,
            Err(e) => {
                warn!(chart_type = identifier, "{e}; falling back to bar");
                ChartKind::Bar
            }
        }
    }

    pub fn build(&self, ctx: &BuildContext<'_>) -> Option<Value> {
        (self.entry(ctx.kind).build)(ctx)
    }
}
impl Default for ChartRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn keyword_pattern(keyword: &str) -> Option<Regex> {
    let body = keyword
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"[\s_-]+");
    Regex::new(&format!(r"(?i)\b{body}\b")).ok()
}
