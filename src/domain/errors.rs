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

//! Core error definitions for the edge mapping exporter.
//!
//! Every failure is fatal to the run: `main` logs it and exits non-zero.
//! There is no retry and no partial-result salvage.

use thiserror::Error;

/// Error types encountered during an export run.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The database could not be opened or did not answer the ping.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The filter document is not valid JSON or has the wrong shape.
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Query execution failed, including SQL syntax errors.
    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Write error: {0}")]
    WriteError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<mysql::Error> for ExportError {
    fn from(e: mysql::Error) -> Self {
        ExportError::QueryError(e.to_string())
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(e: serde_json::Error) -> Self {
        ExportError::DecodeError(e.to_string())
    }
}

impl From<csv::Error> for ExportError {
    fn from(e: csv::Error) -> Self {
        ExportError::WriteError(e.to_string())
    }
}

/// A specialized Result type for the edge mapping exporter.
pub type Result<T> = std::result::Result<T, ExportError>;
