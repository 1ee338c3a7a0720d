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

//! # Domain Entities
//!
//! The nouns of the exporter: the filter items read from the operator's
//! JSON list, the server profile that picks a query topology, and the
//! mapping rows that come back from the database.

use crate::domain::errors::Result;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Label of the load-balancer deployment. A server with this name is
/// queried through the load-balancer topology unless told otherwise.
pub const LOAD_BALANCER_SERVER: &str = "TESP1";

/// One address/port pair the operator wants looked up.
///
/// Missing or `null` fields decode to empty strings rather than failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterItem {
    #[serde(rename = "ip_address", default, deserialize_with = "null_as_empty")]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub port: String,
    /// Which server profile this pair belongs to.
    #[serde(rename = "edge", default, deserialize_with = "null_as_empty")]
    pub edge_label: String,
}

impl FilterItem {
    pub fn new(address: &str, port: &str, edge_label: &str) -> Self {
        Self {
            address: address.to_string(),
            port: port.to_string(),
            edge_label: edge_label.to_string(),
        }
    }

    /// Decodes a JSON array of filter items, keeping document order.
    ///
    /// A top-level `null` is treated as an empty list.
    pub fn decode_list(bytes: &[u8]) -> Result<Vec<FilterItem>> {
        let items: Option<Vec<FilterItem>> = serde_json::from_slice(bytes)?;
        Ok(items.unwrap_or_default())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// `ServerProfile` selects the query topology for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum ServerProfile {
    /// Public addresses NATed onto virtual machines.
    #[serde(rename = "standard")]
    #[value(name = "standard")]
    Standard,
    /// Public addresses fronted by load balancer rules.
    #[serde(rename = "tesp01", alias = "load_balancer")]
    #[value(name = "tesp01", alias = "load-balancer")]
    LoadBalancer,
}

impl ServerProfile {
    /// Picks the topology from the server label when no profile is configured.
    pub fn for_server(server: &str) -> Self {
        if server == LOAD_BALANCER_SERVER {
            ServerProfile::LoadBalancer
        } else {
            ServerProfile::Standard
        }
    }
}

impl fmt::Display for ServerProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerProfile::Standard => write!(f, "standard"),
            ServerProfile::LoadBalancer => write!(f, "tesp01"),
        }
    }
}

/// A single result record, in output column order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MappingRow {
    pub public_address: String,
    pub source_port: String,
    pub resource_name: String,
    pub floating_ip: String,
}

impl MappingRow {
    pub fn to_record(&self) -> [&str; 4] {
        [
            &self.public_address,
            &self.source_port,
            &self.resource_name,
            &self.floating_ip,
        ]
    }
}

/// Outcome of appending one cursor to the CSV sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    pub rows_written: u64,
    pub header_written: bool,
}

/// What a completed run reports back to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub profile: ServerProfile,
    pub filters_loaded: usize,
    pub filters_matched: usize,
    pub rows_written: u64,
    pub header_written: bool,
    pub output_file: String,
}

impl ExportSummary {
    /// The line printed when a run succeeds.
    pub fn completion_message(&self) -> String {
        format!("Results exported to {}", self.output_file)
    }
}
