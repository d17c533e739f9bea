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
use chartwright::{
    enrich_request, ChartKind, ChartRequest, ConfigAssembler, EnrichedParameters,
    ParameterEnricher,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing_test::traced_test;

struct FixedEnricher {
    answer: EnrichedParameters,
    calls: AtomicUsize,
}

#[async_trait]
impl ParameterEnricher for FixedEnricher {
    async fn enrich(&self, _request: &ChartRequest) -> anyhow::Result<EnrichedParameters> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer.clone())
    }
}

struct BrokenEnricher;

#[async_trait]
impl ParameterEnricher for BrokenEnricher {
    async fn enrich(&self, _request: &ChartRequest) -> anyhow::Result<EnrichedParameters> {
        anyhow::bail!("model timed out")
    }
}

fn data() -> serde_json::Value {
    json!([
        { "city": "Oslo", "visits": 40, "revenue": 7 },
        { "city": "Rome", "visits": 55, "revenue": 9 },
    ])
}

#[test]
fn test_request_deserialises_from_camel_case() {
    let request: ChartRequest = serde_json::from_value(json!({
        "data": [{ "a": 1 }],
        "chartType": "pie",
        "xAxisKey": "a",
        "prompt": "pie please"
    }))
    .unwrap();
    assert_eq!(request.chart_type.as_deref(), Some("pie"));
    assert_eq!(request.x_axis_key.as_deref(), Some("a"));
    assert!(request.y_axis_key.is_none());
    assert!(request.title.is_none());
}

#[test]
fn test_explicit_values_win_over_enrichment() {
    let mut request = ChartRequest::new(data()).with_chart_type("bar").with_title("");
    request.merge_enrichment(EnrichedParameters {
        chart_type: Some("pie".to_string()),
        title: Some("Visits by city".to_string()),
        x_axis_key: Some("city".to_string()),
        y_axis_key: None,
        reasoning: Some("few categories".to_string()),
    });
    assert_eq!(request.chart_type.as_deref(), Some("bar"));
    assert_eq!(request.title.as_deref(), Some("Visits by city"));
    assert_eq!(request.x_axis_key.as_deref(), Some("city"));
    assert!(request.y_axis_key.is_none());
}

#[tokio::test]
async fn test_enrichment_fills_missing_parameters() {
    let enricher = FixedEnricher {
        answer: EnrichedParameters {
            chart_type: Some("donut".to_string()),
            y_axis_key: Some("revenue".to_string()),
            ..Default::default()
        },
        calls: AtomicUsize::new(0),
    };
    let request = ChartRequest::new(data()).with_prompt("how do the cities compare?");
    let enriched = enrich_request(&enricher, request).await;
    assert_eq!(enricher.calls.load(Ordering::SeqCst), 1);
    assert_eq!(enriched.chart_type.as_deref(), Some("donut"));

    let config = ConfigAssembler::new().assemble_request(&enriched).unwrap();
    assert_eq!(config.chart_type, ChartKind::Donut);
    assert_eq!(config.mapping.value_key, "revenue");
    assert_eq!(config.mapping.name_key, "city");
}

#[traced_test]
#[tokio::test]
async fn test_failed_enrichment_keeps_request() {
    let request = ChartRequest::new(data()).with_prompt("line chart");
    let result = enrich_request(&BrokenEnricher, request.clone()).await;
    assert_eq!(result, request);
    assert!(logs_contain("parameter enrichment failed"));
}
