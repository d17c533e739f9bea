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

//! Free-text prompt interpretation.
//!
//! Nothing here fails: a prompt with no recognisable signal yields a bar
//! chart over the classifier's default fields and the generated palette.

use crate::classify::FieldClassification;
use crate::config::ClassifierConfig;
use crate::registry::{ChartKind, ChartRegistry, StyleFlags, TrendlineMode};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

static TRENDLINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:trend\s*-?\s*lines?|regression(?:\s+lines?)?|linear\s+trends?)\b").unwrap()
});
static MULTI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:dual|multiple|multi)\b").unwrap());
static QUALIFIED_SCATTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:dual|multiple|multi)[\s-]+scatter").unwrap());
static PAIR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([\w.]+)\s+(?:vs\.?|versus|and|&)\s+([\w.]+)").unwrap());
static COMPARISON_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s(?:vs\.?|versus|and)\s").unwrap());
static GROUPED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:group(?:ed)?|clustered|side[\s-]+by[\s-]+side)\b").unwrap()
});
static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z0-9_.]+").unwrap());
static HEX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#([0-9a-fA-F]{6}|[0-9a-fA-F]{3})\b").unwrap());
static RGB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)rgba?\(\s*\d{1,3}\s*,\s*\d{1,3}\s*,\s*\d{1,3}\s*(?:,\s*(?:\d*\.)?\d+\s*)?\)")
        .unwrap()
});

const COLOR_NAMES: &[(&str, &str)] = &[
    ("sky blue", "#87ceeb"),
    ("dark blue", "#00008b"),
    ("light blue", "#add8e6"),
    ("dark green", "#006400"),
    ("light green", "#90ee90"),
    ("red", "#ff0000"),
    ("green", "#008000"),
    ("blue", "#0000ff"),
    ("yellow", "#ffff00"),
    ("orange", "#ffa500"),
    ("purple", "#800080"),
    ("pink", "#ffc0cb"),
    ("brown", "#a52a2a"),
    ("black", "#000000"),
    ("white", "#ffffff"),
    ("gray", "#808080"),
    ("grey", "#808080"),
    ("cyan", "#00ffff"),
    ("magenta", "#ff00ff"),
    ("teal", "#008080"),
    ("navy", "#000080"),
    ("maroon", "#800000"),
    ("olive", "#808000"),
    ("lime", "#00ff00"),
    ("aqua", "#00ffff"),
    ("silver", "#c0c0c0"),
    ("gold", "#ffd700"),
    ("indigo", "#4b0082"),
    ("violet", "#ee82ee"),
    ("coral", "#ff7f50"),
    ("salmon", "#fa8072"),
    ("turquoise", "#40e0d0"),
    ("crimson", "#dc143c"),
    ("lavender", "#e6e6fa"),
    ("beige", "#f5f5dc"),
    ("khaki", "#f0e68c"),
    ("tan", "#d2b48c"),
];

/// Multi-word names come first in the table, so they claim their span
/// before the single words inside them.
static COLOR_NAME_RES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    COLOR_NAMES
        .iter()
        .map(|(name, hex)| {
            let body = name.split_whitespace().join(r"\s+");
            (Regex::new(&format!(r"(?i)\b{body}\b")).unwrap(), *hex)
        })
        .collect()
});

/// Words too generic to count as a field mention on their own.
const STOP_WORDS: &[&str] = &[
    "chart", "charts", "graph", "plot", "show", "make", "create", "with", "the", "and", "for",
    "using", "display", "draw", "from", "into", "over", "each", "per", "versus", "give", "please",
    "visualise", "visualize",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptIntent {
    pub chart_kind: ChartKind,
    pub label_key: Option<String>,
    pub value_key: Option<String>,
    /// Two or more value fields to draw as separate series; empty otherwise.
    pub multi_fields: Vec<String>,
    pub style: StyleFlags,
    pub colors: Vec<String>,
}

pub struct PromptInterpreter<'a> {
    registry: &'a ChartRegistry,
    config: &'a ClassifierConfig,
}
impl<'a> PromptInterpreter<'a> {
    pub fn new(registry: &'a ChartRegistry, config: &'a ClassifierConfig) -> Self {
        Self { registry, config }
    }

    pub fn interpret(&self, prompt: &str, classification: &FieldClassification) -> PromptIntent {
        // The qualifier may sit anywhere: "trendlines for multiple series".
        let any_trendline = TRENDLINE_RE.is_match(prompt);
        let multi_trendline = any_trendline && MULTI_RE.is_match(prompt);
        let trendline = if multi_trendline {
            TrendlineMode::Multiple
        } else if any_trendline {
            TrendlineMode::Single
        } else {
            TrendlineMode::None
        };

        // "bar with a trend line" must not read as a line chart.
        let detection_text = TRENDLINE_RE.replace_all(prompt, " ");
        let mut chart_kind = self.registry.detect(&detection_text).unwrap_or(ChartKind::Bar);
        if multi_trendline && !self.keeps_kind_under_multi_trendline(chart_kind, prompt) {
            debug!(detected = %chart_kind, "multiple trendlines requested; switching to line");
            chart_kind = ChartKind::Line;
        }

        let (label_key, mut value_key, mut multi_fields) = self.resolve_fields(prompt, classification);

        let comparison = COMPARISON_RE.is_match(prompt) || multi_trendline;
        if comparison && classification.numeric_keys.len() >= 2 && multi_fields.len() < 2 {
            multi_fields = comparison_fields(prompt, classification);
            value_key = multi_fields.first().cloned();
        }

        let lower = prompt.to_lowercase();
        let style = StyleFlags {
            stacked: lower.contains("stack")
                || matches!(chart_kind, ChartKind::StackedBar | ChartKind::StackedArea),
            grouped: GROUPED_RE.is_match(prompt) || chart_kind == ChartKind::GroupedBar,
            trendline,
        };

        let intent = PromptIntent {
            chart_kind,
            label_key,
            value_key,
            multi_fields,
            style,
            colors: extract_colors(prompt),
        };
        debug!(?intent, "interpreted prompt");
        intent
    }

    fn keeps_kind_under_multi_trendline(&self, kind: ChartKind, prompt: &str) -> bool {
        match kind {
            ChartKind::Line => true,
            ChartKind::Scatter | ChartKind::EffectScatter => QUALIFIED_SCATTER_RE.is_match(prompt),
            _ => false,
        }
    }

    /// Label override, primary value and multi-series list from the fields the prompt names.
    fn resolve_fields(
        &self,
        prompt: &str,
        classification: &FieldClassification,
    ) -> (Option<String>, Option<String>, Vec<String>) {
        let candidates: Vec<String> = pair_mentions(prompt, &classification.all_keys)
            .into_iter()
            .chain(
                classification
                    .all_keys
                    .iter()
                    .filter(|key| mentions(prompt, key))
                    .cloned(),
            )
            .unique()
            .collect();
        if candidates.is_empty() {
            return (None, None, Vec::new());
        }

        let label_key = candidates
            .iter()
            .find(|key| self.config.is_label_like(key) || classification.is_string(key))
            .cloned();
        let values: Vec<String> = candidates
            .into_iter()
            .filter(|key| Some(key) != label_key.as_ref())
            .filter(|key| self.config.is_value_like(key) || classification.is_numeric(key))
            .collect();
        let value_key = values.first().cloned();
        let multi_fields = if values.len() > 1 { values } else { Vec::new() };
        (label_key, value_key, multi_fields)
    }
}

/// Interprets with the standard catalogue and classifier keywords.
pub fn interpret(prompt: &str, classification: &FieldClassification) -> PromptIntent {
    let registry = ChartRegistry::new();
    let config = ClassifierConfig::default();
    PromptInterpreter::new(&registry, &config).interpret(prompt, classification)
}

/// Fields named on either side of `A vs B`, `A versus B`, `A and B` or `A & B`.
fn pair_mentions(prompt: &str, keys: &[String]) -> Vec<String> {
    PAIR_RE
        .captures_iter(prompt)
        .flat_map(|caps| {
            [caps.get(1), caps.get(2)]
                .into_iter()
                .flatten()
                .filter_map(|side| fuzzy_field(side.as_str(), keys))
                .collect::<Vec<_>>()
        })
        .collect()
}

fn fuzzy_field(side: &str, keys: &[String]) -> Option<String> {
    let side_lower = side.to_lowercase();
    if let Some(key) = keys.iter().find(|k| k.to_lowercase() == side_lower) {
        return Some(key.clone());
    }
    if side_lower.chars().count() >= 3 && !STOP_WORDS.contains(&side_lower.as_str()) {
        if let Some(key) = keys.iter().find(|k| {
            let k = k.to_lowercase();
            k.contains(&side_lower) || side_lower.contains(&k)
        }) {
            return Some(key.clone());
        }
    }
    let side_bare = strip_punctuation(&side_lower);
    keys.iter()
        .find(|k| !side_bare.is_empty() && strip_punctuation(&k.to_lowercase()) == side_bare)
        .cloned()
}

fn strip_punctuation(s: &str) -> String {
    s.chars().filter(|c| c.is_alphanumeric()).collect()
}

fn humanise(key: &str) -> String {
    key.to_lowercase()
        .replace(['_', '.', '[', ']'], " ")
        .split_whitespace()
        .join(" ")
}

fn prompt_words(lower_prompt: &str) -> Vec<&str> {
    WORD_RE
        .find_iter(lower_prompt)
        .map(|m| m.as_str().trim_matches('.'))
        .filter(|w| w.chars().count() >= 3 && !STOP_WORDS.contains(w))
        .collect()
}

/// Exact, humanised, per-token, then partial containment either way.
fn mentions(prompt: &str, key: &str) -> bool {
    let lower = prompt.to_lowercase();
    let key_lower = key.to_lowercase();
    if key_lower.is_empty() {
        return false;
    }
    if lower.contains(&key_lower) {
        return true;
    }
    let human = humanise(key);
    if !human.is_empty() && lower.contains(&human) {
        return true;
    }
    let words = prompt_words(&lower);
    let tokens: Vec<&str> = human
        .split_whitespace()
        .filter(|t| t.chars().count() >= 3 && !STOP_WORDS.contains(t))
        .collect();
    if tokens.iter().any(|t| words.contains(t)) {
        return true;
    }
    let compact = strip_punctuation(&key_lower);
    compact.chars().count() >= 3
        && words
            .iter()
            .any(|w| compact.contains(*w) || w.contains(compact.as_str()))
}

/// Numeric fields the prompt mentions, or the first two numeric fields.
fn comparison_fields(prompt: &str, classification: &FieldClassification) -> Vec<String> {
    let mentioned: Vec<String> = classification
        .numeric_keys
        .iter()
        .filter(|key| mentions(prompt, key))
        .cloned()
        .collect();
    if mentioned.len() >= 2 {
        mentioned
    } else {
        classification.numeric_keys.iter().take(2).cloned().collect()
    }
}

/// Named colours, hex literals and `rgb()`/`rgba()` literals in the order
/// they appear, without repeats.
pub fn extract_colors(prompt: &str) -> Vec<String> {
    let mut found: Vec<(usize, String)> = Vec::new();
    let mut claimed: Vec<(usize, usize)> = Vec::new();
    for (pattern, hex) in COLOR_NAME_RES.iter() {
        for m in pattern.find_iter(prompt) {
            if claimed.iter().any(|(s, e)| m.start() < *e && *s < m.end()) {
                continue;
            }
            claimed.push((m.start(), m.end()));
            found.push((m.start(), (*hex).to_string()));
        }
    }
    for caps in HEX_RE.captures_iter(prompt) {
        let (Some(whole), Some(digits)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        found.push((whole.start(), normalise_hex(digits.as_str())));
    }
    for m in RGB_RE.find_iter(prompt) {
        let literal: String = m
            .as_str()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        found.push((m.start(), literal));
    }
    found.sort_by_key(|(position, _)| *position);
    found.into_iter().map(|(_, color)| color).unique().collect()
}

fn normalise_hex(digits: &str) -> String {
    let lower = digits.to_lowercase();
    if lower.len() == 3 {
        let doubled: String = lower.chars().flat_map(|c| [c, c]).collect();
        format!("#{doubled}")
    } else {
        format!("#{lower}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_hex_expands() {
        assert_eq!(normalise_hex("F0a"), "#ff00aa");
        assert_eq!(normalise_hex("00FF00"), "#00ff00");
    }

    #[test]
    fn humanised_keys_drop_separators() {
        assert_eq!(humanise("sales.total_amount"), "sales total amount");
        assert_eq!(humanise("items[0].price"), "items 0 price");
    }

    #[test]
    fn fuzzy_field_needs_three_characters_for_substrings() {
        let keys = vec!["revenue".to_string(), "cost".to_string()];
        assert_eq!(fuzzy_field("Revenue", &keys), Some("revenue".to_string()));
        assert_eq!(fuzzy_field("rev", &keys), Some("revenue".to_string()));
        assert_eq!(fuzzy_field("re", &keys), None);
    }
}
