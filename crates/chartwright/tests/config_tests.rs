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
    ChartIntentError, ColorPalette, ConfigAssembler, ConfigError, DataError, ErrorReporter,
    ErrorSeverity, InferenceConfig, PaletteConfig,
};
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_default_config_is_valid() {
    let config = InferenceConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.fingerprint_window, 100);
    assert!(config.classifier.label_keywords.iter().any(|k| k == "name"));
}

#[test]
fn test_partial_yaml_keeps_defaults() {
    let yaml = r#"
fingerprint_window: 20
palette:
  saturation: 80
"#;
    let config = InferenceConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.fingerprint_window, 20);
    assert_eq!(config.palette.saturation, 80.0);
    assert_eq!(config.palette.lightness, 55.0);
    assert!(!config.classifier.value_keywords.is_empty());
}

#[test]
fn test_out_of_range_values_are_rejected() {
    let result = InferenceConfig::from_yaml_str("palette:\n  saturation: 140\n");
    assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));

    let result = InferenceConfig::from_yaml_str("fingerprint_window: 0\n");
    assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
}

#[test]
fn test_bad_date_format_is_rejected() {
    let yaml = "classifier:\n  date_formats:\n    - \"%Y-%Q\"\n";
    let result = InferenceConfig::from_yaml_str(yaml);
    assert!(matches!(result, Err(ConfigError::InvalidDateFormat { .. })));
}

#[test]
fn test_malformed_yaml_is_a_parse_error() {
    let result = InferenceConfig::from_yaml_str("palette: [unclosed");
    assert!(matches!(result, Err(ConfigError::YamlParseError { .. })));
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        "classifier:\n  value_keywords:\n    - units\n  label_keywords:\n    - sku\n"
    )
    .unwrap();
    let config = InferenceConfig::from_yaml_file(file.path()).unwrap();
    assert_eq!(config.classifier.value_keywords, vec!["units"]);

    let mut assembler = ConfigAssembler::with_config(config);
    let data = json!([{ "name": "Widget", "sku": "W-1", "price": 3, "units": 9 }]);
    let chart = assembler.assemble(&data, "bar chart").unwrap();
    assert_eq!(chart.mapping.name_key, "sku");
    assert_eq!(chart.mapping.value_key, "units");
}

#[test]
fn test_missing_file_reports_path() {
    let result = InferenceConfig::from_yaml_file("/definitely/not/here.yml");
    match result {
        Err(ConfigError::ConfigFileError { path, .. }) => assert!(path.contains("not/here.yml")),
        other => panic!("expected a file error, got {other:?}"),
    }
}

#[test]
fn test_palette_follows_config() {
    let mut palette = ColorPalette::from_config(&PaletteConfig {
        saturation: 80.0,
        lightness: 40.0,
        hue_step: 90.0,
    });
    assert_eq!(
        palette.get(3),
        vec!["hsl(0, 80%, 40%)", "hsl(90, 80%, 40%)", "hsl(180, 80%, 40%)"]
    );
    assert_eq!(palette.high_water_mark(), 3);
    assert_eq!(palette.get(1), vec!["hsl(0, 80%, 40%)"]);
    assert_eq!(palette.high_water_mark(), 3);
}

#[test]
fn test_error_reporter_plain_output() {
    let error = ChartIntentError::from(DataError::EmptyDataset);
    assert_eq!(error.severity(), ErrorSeverity::Info);
    assert_eq!(error.category(), "Data");
    assert!(error.is_recoverable());
    let report = ErrorReporter::plain().report(&error);
    assert!(report.starts_with("[INFO] The dataset is empty."));
    assert!(report.contains("Provide at least one record"));
    assert!(!report.contains('\x1b'));
}
