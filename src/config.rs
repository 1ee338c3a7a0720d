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

//! Run configuration: an optional YAML/JSON file, overridden by CLI flags.
//!
//! With neither, the defaults connect to `root:root@localhost:3306/root`,
//! read `ips.json` and append to `resultados.csv` for server `TESP1`.

use crate::domain::entities::{ServerProfile, LOAD_BALANCER_SERVER};
use crate::domain::errors::{ExportError, Result};
use crate::domain::query::BindMode;
use clap::Parser;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub username: String,
    pub password: Option<String>,
    pub host: String,
    pub port: u16,
    pub database: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            username: "root".to_string(),
            password: Some("root".to_string()),
            host: "localhost".to_string(),
            port: 3306,
            database: "root".to_string(),
        }
    }
}

impl DatabaseConfig {
    /// Configured password, else `MYSQL_PASSWORD`, else empty.
    pub fn resolved_password(&self) -> String {
        self.password
            .clone()
            .or_else(|| std::env::var("MYSQL_PASSWORD").ok())
            .unwrap_or_default()
    }

    /// `user@host:port/db`, safe to log.
    pub fn display_target(&self) -> String {
        format!(
            "{}@{}:{}/{}",
            self.username, self.host, self.port, self.database
        )
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ExportConfig {
    /// JSON list of address/port/edge filter items.
    pub input_file: String,
    /// CSV sink, opened in append mode.
    pub output_file: String,
    /// Server label; also the edge label items must carry.
    pub server: String,
    /// Explicit topology. Derived from `server` when absent.
    pub profile: Option<ServerProfile>,
    /// Interpolate filter values into the SQL text instead of binding them.
    pub legacy_unsafe_sql: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            input_file: "ips.json".to_string(),
            output_file: "resultados.csv".to_string(),
            server: LOAD_BALANCER_SERVER.to_string(),
            profile: None,
            legacy_unsafe_sql: false,
        }
    }
}

impl ExportConfig {
    pub fn resolved_profile(&self) -> ServerProfile {
        self.profile
            .unwrap_or_else(|| ServerProfile::for_server(&self.server))
    }

    pub fn bind_mode(&self) -> BindMode {
        if self.legacy_unsafe_sql {
            BindMode::LegacyLiteral
        } else {
            BindMode::Parameterized
        }
    }
}

#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<String>,

    // Overrides for ad-hoc runs
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long)]
    pub host: Option<String>,
    #[arg(long)]
    pub port: Option<u16>,
    #[arg(long)]
    pub database: Option<String>,
    /// Filter list (JSON array of {ip_address, port, edge})
    #[arg(short, long)]
    pub input: Option<String>,
    /// CSV file to append results to
    #[arg(short, long)]
    pub output: Option<String>,
    /// Server label used to select filter items
    #[arg(long)]
    pub server: Option<String>,
    /// Query topology; defaults from the server label
    #[arg(long, value_enum)]
    pub profile: Option<ServerProfile>,
    /// Paste filter values into the SQL as quoted literals (no escaping)
    #[arg(long)]
    pub legacy_unsafe_sql: bool,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| ExportError::ConfigError(format!("{}: {}", path, e)))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: AppConfig = if path.ends_with(".json") {
            serde_json::from_str(&contents)
                .map_err(|e| ExportError::ConfigError(e.to_string()))?
        } else {
            serde_yaml::from_str(&contents)
                .map_err(|e| ExportError::ConfigError(e.to_string()))?
        };

        Ok(config)
    }

    /// File config if `--config` was given, defaults otherwise, then CLI overrides.
    pub fn load(args: &CliArgs) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };
        config.merge_cli(args);
        Ok(config)
    }

    pub fn merge_cli(&mut self, args: &CliArgs) {
        if let Some(u) = &args.username { self.database.username = u.clone(); }
        if let Some(p) = &args.password { self.database.password = Some(p.clone()); }
        if let Some(h) = &args.host { self.database.host = h.clone(); }
        if let Some(p) = args.port { self.database.port = p; }
        if let Some(d) = &args.database { self.database.database = d.clone(); }
        if let Some(i) = &args.input { self.export.input_file = i.clone(); }
        if let Some(o) = &args.output { self.export.output_file = o.clone(); }
        if let Some(s) = &args.server { self.export.server = s.clone(); }
        if let Some(p) = args.profile { self.export.profile = Some(p); }
        if args.legacy_unsafe_sql { self.export.legacy_unsafe_sql = true; }
    }
}
