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

use anyhow::{Context, Result};
use chartwright::{ChartRequest, ConfigAssembler, ErrorReporter, InferenceConfig};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "chartwright-demo",
    about = "Infer a chart configuration from JSON records and a prompt"
)]
struct Cli {
    /// YAML inference config; defaults apply when absent.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Build a chart configuration.
    Chart {
        /// JSON file holding the records. Reads stdin when omitted.
        #[arg(long)]
        data: Option<PathBuf>,
        #[arg(long)]
        prompt: Option<String>,
        #[arg(long)]
        chart_type: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        x_axis_key: Option<String>,
        #[arg(long)]
        y_axis_key: Option<String>,
        #[arg(long)]
        pretty: bool,
    },
    /// Print the field classification of the records.
    Classify {
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// List supported chart types and their trigger keywords.
    Types,
}

fn read_data(path: Option<&Path>) -> Result<serde_json::Value> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            buf
        }
    };
    serde_json::from_str(&raw).context("records are not valid JSON")
}

fn assembler(config: Option<&Path>) -> Result<ConfigAssembler> {
    let config = match config {
        Some(path) => {
            info!(path = %path.display(), "loading inference config");
            InferenceConfig::from_yaml_file(path)?
        }
        None => InferenceConfig::default(),
    };
    Ok(ConfigAssembler::with_config(config))
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let mut assembler = assembler(cli.config.as_deref())?;

    match cli.cmd {
        Command::Chart {
            data,
            prompt,
            chart_type,
            title,
            x_axis_key,
            y_axis_key,
            pretty,
        } => {
            let request = ChartRequest {
                data: read_data(data.as_deref())?,
                chart_type,
                title,
                x_axis_key,
                y_axis_key,
                prompt,
            };
            match assembler.assemble_request(&request) {
                Some(chart) => {
                    debug!(chart_type = %chart.chart_type, "chart assembled");
                    println!("{}", chart.to_json_string(pretty)?);
                }
                None => {
                    if let Some(failure) = assembler.last_failure() {
                        eprintln!("{}", ErrorReporter::new().report(failure));
                    }
                    std::process::exit(1);
                }
            }
        }
        Command::Classify { data } => {
            let classification = assembler.classify(&read_data(data.as_deref())?);
            println!("{}", serde_json::to_string_pretty(&classification)?);
        }
        Command::Types => {
            for entry in assembler.registry().entries() {
                println!("{:<14} {}", entry.kind.as_str(), entry.keywords.join(", "));
            }
        }
    }
    Ok(())
}
