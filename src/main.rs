// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Edge Mapping Exporter
//!
//! Looks up which virtual machines or load balancer instances sit behind a
//! list of public address/port pairs, and appends the answer to a CSV file.
//!
//! The application follows the **Hexagonal Architecture** (Ports and
//! Adapters): the query logic in `application` and `domain` only sees the
//! `MappingSource` and `ResultWriter` ports; MySQL and the local CSV file
//! are adapters in `infrastructure`.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ports;

use crate::application::orchestrator::Orchestrator;
use crate::config::{AppConfig, CliArgs};
use crate::domain::entities::ExportSummary;
use crate::domain::errors::Result;
use crate::infrastructure::local_storage::csv_result_adapter::CsvResultAdapter;
use crate::infrastructure::mysql::mysql_mapping_adapter::MysqlMappingAdapter;
use clap::Parser;
use log::{error, info};
use std::process;

fn main() {
    // 1. Initialize Logging
    env_logger::Builder::from_env(log_env()).init();

    // 2. Parse Arguments
    let args = CliArgs::parse();

    // 3. Load Config
    let config = match AppConfig::load(&args) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {}", e);
            process::exit(1);
        }
    };

    // 4. Export. The connection, cursor and file are all dropped inside
    // `run`, before any exit.
    match run(config) {
        Ok(summary) => {
            info!(
                "Export finished: profile {}, {}/{} filters matched, {} rows appended to {}{}",
                summary.profile,
                summary.filters_matched,
                summary.filters_loaded,
                summary.rows_written,
                summary.output_file,
                if summary.header_written { " (new file)" } else { "" }
            );
        }
        Err(e) => {
            error!("Export failed: {}", e);
            process::exit(1);
        }
    }
}

/// `RUST_LOG` if set, else `info`, so a plain run still reports completion.
fn log_env() -> env_logger::Env<'static> {
    env_logger::Env::default().default_filter_or("info")
}

fn run(config: AppConfig) -> Result<ExportSummary> {
    // Connect and ping before touching any file.
    let source = MysqlMappingAdapter::connect(&config.database)?;
    let writer = CsvResultAdapter::new(&config.export.output_file);

    let mut orchestrator = Orchestrator::new(Box::new(source), Box::new(writer), config.export);
    orchestrator.run()
}
