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

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Inbound chart request as sent by the conversation collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRequest {
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_axis_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}
impl ChartRequest {
    pub fn new(data: Value) -> Self {
        Self {
            data,
            ..Default::default()
        }
    }
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }
    pub fn with_chart_type(mut self, chart_type: impl Into<String>) -> Self {
        self.chart_type = Some(chart_type.into());
        self
    }
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
    pub fn with_axes(mut self, x_axis_key: impl Into<String>, y_axis_key: impl Into<String>) -> Self {
        self.x_axis_key = Some(x_axis_key.into());
        self.y_axis_key = Some(y_axis_key.into());
        self
    }

    /// Fills only the fields the caller left empty.
    pub fn merge_enrichment(&mut self, enriched: EnrichedParameters) {
        fill(&mut self.chart_type, enriched.chart_type);
        fill(&mut self.title, enriched.title);
        fill(&mut self.x_axis_key, enriched.x_axis_key);
        fill(&mut self.y_axis_key, enriched.y_axis_key);
    }
}

fn fill(slot: &mut Option<String>, inferred: Option<String>) {
    let empty = slot.as_deref().map_or(true, |s| s.trim().is_empty());
    if empty {
        if let Some(value) = inferred.filter(|v| !v.trim().is_empty()) {
            *slot = Some(value);
        }
    }
}

/// Parameters an external model inferred for a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnrichedParameters {
    pub chart_type: Option<String>,
    pub title: Option<String>,
    pub x_axis_key: Option<String>,
    pub y_axis_key: Option<String>,
    pub reasoning: Option<String>,
}

#[async_trait]
pub trait ParameterEnricher: Send + Sync {
    async fn enrich(&self, request: &ChartRequest) -> anyhow::Result<EnrichedParameters>;
}

/// Runs the enricher and merges its answer. A failing enricher leaves the
/// request as it was.
pub async fn enrich_request(enricher: &dyn ParameterEnricher, mut request: ChartRequest) -> ChartRequest {
    match enricher.enrich(&request).await {
        Ok(enriched) => {
            if let Some(reasoning) = enriched.reasoning.as_deref() {
                debug!(reasoning, "enrichment reasoning");
            }
            request.merge_enrichment(enriched);
        }
        Err(e) => {
            warn!(error = %e, "parameter enrichment failed; using the request as given");
        }
    }
    request
}
