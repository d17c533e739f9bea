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

//! Orchestrates flatten, classify, interpret and build into one chart
//! configuration, memoised on a fingerprint of the inputs.

use crate::classify::{FieldClassification, FieldClassifier};
use crate::config::InferenceConfig;
use crate::error::{ChartError, ChartIntentError, DataError, Result};
use crate::flatten::{flatten_records, normalise_records};
use crate::palette::ColorPalette;
use crate::prompt::{PromptIntent, PromptInterpreter};
use crate::registry::{BuildContext, ChartKind, ChartRegistry, FieldArity, FieldMapping};
use crate::request::ChartRequest;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Caller-supplied values that bypass inference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Overrides {
    chart_type: Option<String>,
    title: Option<String>,
    x_axis_key: Option<String>,
    y_axis_key: Option<String>,
}
impl Overrides {
    fn from_request(request: &ChartRequest) -> Self {
        let clean = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            chart_type: clean(&request.chart_type),
            title: clean(&request.title),
            x_axis_key: clean(&request.x_axis_key),
            y_axis_key: clean(&request.y_axis_key),
        }
    }
}

/// Cheap stand-in for full input equality: the prompt, record count,
/// serialised length and both ends of the serialised data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fingerprint {
    prompt: String,
    records: usize,
    serialised_len: usize,
    head: String,
    tail: String,
    overrides: Overrides,
}
impl Fingerprint {
    pub fn compute(data: &Value, prompt: &str, window: usize) -> Result<Self> {
        Self::with_overrides(data, prompt, window, Overrides::default())
    }

    fn with_overrides(data: &Value, prompt: &str, window: usize, overrides: Overrides) -> Result<Self> {
        let serialised = serde_json::to_string(data)?;
        let records = match data {
            Value::Array(items) => items.len(),
            Value::Object(_) => 1,
            _ => 0,
        };
        let head: String = serialised.chars().take(window).collect();
        let mut tail: Vec<char> = serialised.chars().rev().take(window).collect();
        tail.reverse();
        Ok(Self {
            prompt: prompt.to_string(),
            records,
            serialised_len: serialised.len(),
            head,
            tail: tail.into_iter().collect(),
            overrides,
        })
    }
}

/// The finished artefact handed to the renderer. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfiguration {
    pub chart_type: ChartKind,
    #[serde(rename = "echartsOption")]
    pub option: Value,
    #[serde(rename = "dataMapping")]
    pub mapping: FieldMapping,
    pub colors: Vec<String>,
    #[serde(skip)]
    pub fingerprint: Fingerprint,
}
impl ChartConfiguration {
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_string(&self, pretty: bool) -> Result<String> {
        let text = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(text)
    }
}

pub struct ConfigAssembler {
    registry: ChartRegistry,
    classifier: FieldClassifier,
    palette: ColorPalette,
    fingerprint_window: usize,
    current: Option<Arc<ChartConfiguration>>,
    last_failure: Option<ChartIntentError>,
}
impl ConfigAssembler {
    pub fn new() -> Self {
        Self::with_config(InferenceConfig::default())
    }

    pub fn with_config(config: InferenceConfig) -> Self {
        Self {
            registry: ChartRegistry::new(),
            palette: ColorPalette::from_config(&config.palette),
            classifier: FieldClassifier::with_config(config.classifier),
            fingerprint_window: config.fingerprint_window,
            current: None,
            last_failure: None,
        }
    }

    pub fn with_registry(mut self, registry: ChartRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_palette(mut self, palette: ColorPalette) -> Self {
        self.palette = palette;
        self
    }

    pub fn registry(&self) -> &ChartRegistry {
        &self.registry
    }

    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    /// The last accepted configuration, if the last call produced one.
    pub fn current(&self) -> Option<Arc<ChartConfiguration>> {
        self.current.clone()
    }

    /// Why the last call produced nothing. Cleared on success.
    pub fn last_failure(&self) -> Option<&ChartIntentError> {
        self.last_failure.as_ref()
    }

    pub fn classify(&self, data: &Value) -> FieldClassification {
        normalise_records(data)
            .map(|records| self.classifier.classify_records(&flatten_records(&records)))
            .unwrap_or_default()
    }

    pub fn assemble(&mut self, data: &Value, prompt: &str) -> Option<Arc<ChartConfiguration>> {
        self.run(data, prompt, Overrides::default())
    }

    /// Explicit request fields win over anything inferred from the prompt.
    /// Without a prompt, the explicit chart type stands in for one.
    pub fn assemble_request(&mut self, request: &ChartRequest) -> Option<Arc<ChartConfiguration>> {
        let overrides = Overrides::from_request(request);
        let prompt = request
            .prompt
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .or(overrides.chart_type.as_deref())
            .unwrap_or_default()
            .to_string();
        self.run(&request.data, &prompt, overrides)
    }

    fn run(
        &mut self,
        data: &Value,
        prompt: &str,
        overrides: Overrides,
    ) -> Option<Arc<ChartConfiguration>> {
        match self.try_assemble(data, prompt, overrides) {
            Ok(config) => {
                self.last_failure = None;
                Some(config)
            }
            Err(e) => {
                match &e {
                    ChartIntentError::Chart(ChartError::GenerationFailed { .. })
                    | ChartIntentError::Chart(ChartError::InsufficientFields { .. }) => {
                        warn!(error = %e, "chart configuration cleared");
                    }
                    _ => debug!(error = %e, "no chart configuration"),
                }
                self.current = None;
                self.last_failure = Some(e);
                None
            }
        }
    }

    fn try_assemble(
        &mut self,
        data: &Value,
        prompt: &str,
        overrides: Overrides,
    ) -> Result<Arc<ChartConfiguration>> {
        if prompt.trim().is_empty() {
            return Err(ChartError::EmptyPrompt.into());
        }
        let raw = normalise_records(data)?;
        let fingerprint =
            Fingerprint::with_overrides(data, prompt, self.fingerprint_window, overrides)?;
        if let Some(current) = self
            .current
            .as_ref()
            .filter(|c| c.fingerprint == fingerprint)
        {
            debug!("inputs unchanged; reusing chart configuration");
            return Ok(Arc::clone(current));
        }

        let records = flatten_records(&raw);
        let classification = self.classifier.classify_records(&records);
        debug!(?classification, "classified fields");
        let default_label = classification
            .label_key
            .clone()
            .ok_or(DataError::NoLabelField)?;
        let default_value = classification
            .value_key
            .clone()
            .ok_or(DataError::NoValueField)?;

        let intent = PromptInterpreter::new(&self.registry, self.classifier.config())
            .interpret(prompt, &classification);
        let overrides = &fingerprint.overrides;
        let kind = overrides
            .chart_type
            .as_deref()
            .map(|id| self.registry.resolve(id))
            .unwrap_or(intent.chart_kind);
        debug!(chart_type = %kind, "resolved chart type");

        let x_override = known_key(&classification, overrides.x_axis_key.as_deref(), "xAxisKey");
        let y_override = known_key(&classification, overrides.y_axis_key.as_deref(), "yAxisKey");
        let mapping = self.resolve_mapping(
            kind,
            &classification,
            &intent,
            x_override.unwrap_or_else(|| intent.label_key.clone().unwrap_or(default_label)),
            y_override,
            default_value,
        )?;

        let color_count = if kind.colors_per_record() {
            records.len()
        } else {
            mapping.data_keys.len()
        }
        .max(1);
        let colors = if intent.colors.is_empty() {
            self.palette.get(color_count)
        } else {
            intent.colors.clone()
        };

        let ctx = BuildContext {
            kind,
            mapping: &mapping,
            records: &records,
            style: &intent.style,
            palette: &colors,
            title: overrides.title.as_deref(),
            classifier: &self.classifier,
        };
        let option = self
            .registry
            .build(&ctx)
            .ok_or_else(|| ChartError::GenerationFailed {
                chart_type: kind.to_string(),
            })?;

        let config = Arc::new(ChartConfiguration {
            chart_type: kind,
            option,
            mapping,
            colors,
            fingerprint,
        });
        self.current = Some(Arc::clone(&config));
        Ok(config)
    }

    fn resolve_mapping(
        &self,
        kind: ChartKind,
        classification: &FieldClassification,
        intent: &PromptIntent,
        mut name_key: String,
        y_override: Option<String>,
        default_value: String,
    ) -> Result<FieldMapping> {
        let entry = self.registry.entry(kind);
        if entry.needs_date_label && !classification.is_date(&name_key) {
            if let Some(date_key) = classification.date_keys.first() {
                debug!(from = %name_key, to = %date_key, "using date field as label");
                name_key = date_key.clone();
            }
        }

        let named: Vec<String> = match (&y_override, intent.multi_fields.len()) {
            (Some(y), _) => vec![y.clone()],
            (None, n) if n >= 2 => intent.multi_fields.clone(),
            (None, _) => intent.value_key.iter().cloned().collect(),
        };

        let data_keys = match entry.arity {
            FieldArity::Single => {
                vec![named.first().cloned().unwrap_or(default_value)]
            }
            FieldArity::Series => {
                if named.is_empty() {
                    vec![default_value]
                } else {
                    named
                }
            }
            FieldArity::Positional { min, max } => {
                let mut keys = named;
                for key in &classification.numeric_keys {
                    if keys.len() >= max {
                        break;
                    }
                    if *key != name_key && !keys.contains(key) {
                        keys.push(key.clone());
                    }
                }
                keys.truncate(max);
                if keys.len() < min {
                    return Err(ChartError::InsufficientFields {
                        chart_type: kind.to_string(),
                        required: min,
                        available: keys.len(),
                    }
                    .into());
                }
                keys
            }
        };
        let value_key = data_keys
            .first()
            .cloned()
            .ok_or(DataError::NoValueField)?;
        Ok(FieldMapping {
            name_key,
            value_key,
            data_keys,
        })
    }
}
impl Default for ConfigAssembler {
    fn default() -> Self {
        Self::new()
    }
}

fn known_key(classification: &FieldClassification, key: Option<&str>, role: &str) -> Option<String> {
    let key = key?;
    if classification.has_key(key) {
        Some(key.to_string())
    } else {
        warn!(key, role, "axis override names an unknown field; ignoring it");
        None
    }
}
