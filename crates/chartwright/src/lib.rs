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

pub mod assembler;
pub mod classify;
pub mod config;
pub mod error;
pub mod flatten;
pub mod options;
pub mod palette;
pub mod prompt;
pub mod registry;
pub mod request;

pub use assembler::{ChartConfiguration, ConfigAssembler, Fingerprint};
pub use classify::{DataType, FieldClassification, FieldClassifier};
pub use config::{ClassifierConfig, InferenceConfig, PaletteConfig};
pub use error::{
    ChartError, ChartIntentError, ConfigError, DataError, ErrorReporter, ErrorSeverity, Result,
    SerialisationError,
};
pub use flatten::{flatten, flatten_records, normalise_records, FlattenedRecord};
pub use options::{five_number_summary, linear_regression, FiveNumberSummary};
pub use palette::ColorPalette;
pub use prompt::{extract_colors, interpret, PromptIntent, PromptInterpreter};
pub use registry::{
    BuildContext, ChartKind, ChartRegistry, ChartTypeEntry, FieldArity, FieldMapping,
    OptionBuilder, StyleFlags, TrendlineMode,
};
pub use request::{enrich_request, ChartRequest, EnrichedParameters, ParameterEnricher};

use serde_json::Value;

/// One-shot inference with a fresh assembler and default configuration.
pub fn infer_chart(data: &Value, prompt: &str) -> Option<ChartConfiguration> {
    ConfigAssembler::new()
        .assemble(data, prompt)
        .map(|config| (*config).clone())
}
