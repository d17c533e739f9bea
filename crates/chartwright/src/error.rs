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

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartIntentError {
    #[error("Data error: {0}")]
    Data(#[from] DataError),
    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Serialisation error: {0}")]
    Serialisation(#[from] SerialisationError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    #[error("Empty dataset provided")]
    EmptyDataset,
    #[error("Unsupported data shape: expected an object or an array of objects, found {found}")]
    UnsupportedShape { found: String },
    #[error("No usable label field found in the first record")]
    NoLabelField,
    #[error("No usable numeric field found in the first record")]
    NoValueField,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChartError {
    #[error("Prompt is empty")]
    EmptyPrompt,
    #[error("Unknown chart type '{name}'")]
    UnknownChartType { name: String },
    #[error("Chart generation failed for type {chart_type}")]
    GenerationFailed { chart_type: String },
    #[error("Chart '{chart_type}' needs at least {required} numeric fields, found {available}")]
    InsufficientFields {
        chart_type: String,
        required: usize,
        available: usize,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {field} = {value}")]
    InvalidValue { field: String, value: String },
    #[error("Invalid date format '{format}'")]
    InvalidDateFormat { format: String },
    #[error("Failed to read configuration file '{path}': {source}")]
    ConfigFileError {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse YAML configuration: {source}")]
    YamlParseError {
        #[from]
        source: serde_yaml::Error,
    },
}

#[derive(Error, Debug)]
pub enum SerialisationError {
    #[error("JSON serialisation failed: {source}")]
    JsonSerialisationError {
        #[from]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ChartIntentError>;
pub type DataResult<T> = std::result::Result<T, DataError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

impl From<serde_json::Error> for ChartIntentError {
    fn from(err: serde_json::Error) -> Self {
        ChartIntentError::Serialisation(SerialisationError::JsonSerialisationError { source: err })
    }
}

impl ChartIntentError {
    /// Failures that the assembler absorbs into "no configuration" rather than surfacing.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ChartIntentError::Data(_)
                | ChartIntentError::Chart(ChartError::EmptyPrompt)
                | ChartIntentError::Chart(ChartError::UnknownChartType { .. })
        )
    }
    pub fn category(&self) -> &'static str {
        match self {
            ChartIntentError::Data(_) => "Data",
            ChartIntentError::Chart(_) => "Chart",
            ChartIntentError::Config(_) => "Configuration",
            ChartIntentError::Serialisation(_) => "Serialisation",
            ChartIntentError::Io(_) => "I/O",
        }
    }
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ChartIntentError::Chart(ChartError::UnknownChartType { .. }) => ErrorSeverity::Warning,
            ChartIntentError::Chart(ChartError::EmptyPrompt) => ErrorSeverity::Info,
            ChartIntentError::Data(DataError::EmptyDataset) => ErrorSeverity::Info,
            ChartIntentError::Data(_) => ErrorSeverity::Warning,
            ChartIntentError::Chart(_) => ErrorSeverity::Error,
            ChartIntentError::Config(_) | ChartIntentError::Serialisation(_) => {
                ErrorSeverity::Error
            }
            ChartIntentError::Io(_) => ErrorSeverity::Critical,
        }
    }
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            ChartIntentError::Data(DataError::EmptyDataset) => {
                vec!["Provide at least one record".to_string()]
            }
            ChartIntentError::Data(DataError::UnsupportedShape { .. }) => vec![
                "Wrap the records in a JSON array".to_string(),
                "Each record must be a JSON object".to_string(),
            ],
            ChartIntentError::Data(DataError::NoValueField) => vec![
                "Add a numeric field such as 'value' or 'count'".to_string(),
                "Numbers stored as strings are not treated as numeric".to_string(),
            ],
            ChartIntentError::Chart(ChartError::GenerationFailed { .. }) => vec![
                "Try a different chart type".to_string(),
                "Calendar and theme river charts need a date field".to_string(),
            ],
            ChartIntentError::Chart(ChartError::InsufficientFields { .. }) => {
                vec!["Name more numeric fields in the prompt".to_string()]
            }
            _ => Vec::new(),
        }
    }
    pub fn user_message(&self) -> String {
        match self {
            ChartIntentError::Data(DataError::EmptyDataset) => {
                "The dataset is empty. Please provide at least one record.".to_string()
            }
            ChartIntentError::Chart(ChartError::EmptyPrompt) => {
                "Describe the chart you would like to see.".to_string()
            }
            ChartIntentError::Chart(ChartError::GenerationFailed { chart_type })
            | ChartIntentError::Chart(ChartError::InsufficientFields { chart_type, .. }) => {
                format!("Chart generation failed for type {chart_type}")
            }
            _ => self.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}
impl ErrorSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorSeverity::Info => "INFO",
            ErrorSeverity::Warning => "WARNING",
            ErrorSeverity::Error => "ERROR",
            ErrorSeverity::Critical => "CRITICAL",
        }
    }
    pub fn color_code(&self) -> &'static str {
        match self {
            ErrorSeverity::Info => "\x1b[36m",
            ErrorSeverity::Warning => "\x1b[33m",
            ErrorSeverity::Error => "\x1b[31m",
            ErrorSeverity::Critical => "\x1b[35m",
        }
    }
}

pub struct ErrorReporter {
    pub show_suggestions: bool,
    pub colored_output: bool,
}
impl ErrorReporter {
    pub fn new() -> Self {
        Self {
            show_suggestions: true,
            colored_output: true,
        }
    }
    pub fn plain() -> Self {
        Self {
            show_suggestions: true,
            colored_output: false,
        }
    }
    pub fn report(&self, error: &ChartIntentError) -> String {
        let severity = error.severity();
        let mut output = String::new();
        if self.colored_output {
            output.push_str(severity.color_code());
        }
        output.push_str(&format!("[{}] {}\n", severity.as_str(), error.user_message()));
        if self.colored_output {
            output.push_str("\x1b[0m");
        }
        if self.show_suggestions {
            let suggestions = error.suggestions();
            if !suggestions.is_empty() {
                output.push_str("\nSuggestions:\n");
                for suggestion in suggestions {
                    output.push_str(&format!("  • {suggestion}\n"));
                }
            }
        }
        output
    }
}
impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}
