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

//! Infrastructure adapter that answers mapping queries from MySQL.

use crate::config::DatabaseConfig;
use crate::domain::entities::MappingRow;
use crate::domain::errors::{ExportError, Result};
use crate::domain::query::BoundQuery;
use crate::ports::mapping_source::{MappingSource, RowCursor};
use log::{debug, info};
use mysql::prelude::Queryable;
use mysql::{Conn, OptsBuilder, Params, Row, Value};

/// Concrete implementation of `MappingSource` over a single MySQL connection.
///
/// The connection is closed when the adapter is dropped.
pub struct MysqlMappingAdapter {
    conn: Conn,
}

impl MysqlMappingAdapter {
    /// Opens the connection and pings it. Both failures are `ConnectionError`.
    pub fn connect(config: &DatabaseConfig) -> Result<Self> {
        info!("Connecting to {}...", config.display_target());

        let opts = OptsBuilder::new()
            .user(Some(config.username.clone()))
            .pass(Some(config.resolved_password()))
            .ip_or_hostname(Some(config.host.clone()))
            .tcp_port(config.port)
            .db_name(Some(config.database.clone()));

        let mut conn = Conn::new(opts)
            .map_err(|e| ExportError::ConnectionError(format!("Failed to open connection: {}", e)))?;
        conn.ping()
            .map_err(|e| ExportError::ConnectionError(format!("Ping failed: {}", e)))?;

        Ok(Self { conn })
    }
}

impl MappingSource for MysqlMappingAdapter {
    fn query(&mut self, query: &BoundQuery) -> Result<RowCursor<'_>> {
        debug!("Executing with {} bound values", query.params.len());

        // Literal SQL goes over the text protocol, exactly as written.
        if query.params.is_empty() {
            let result = self.conn.query_iter(query.sql.as_str())?;
            return Ok(Box::new(result.map(|row| to_mapping_row(row?))));
        }

        let params = Params::Positional(
            query
                .params
                .iter()
                .map(|p| Value::Bytes(p.as_bytes().to_vec()))
                .collect(),
        );
        let result = self.conn.exec_iter(query.sql.as_str(), params)?;
        Ok(Box::new(result.map(|row| to_mapping_row(row?))))
    }
}

fn to_mapping_row(row: Row) -> Result<MappingRow> {
    if row.len() < 4 {
        return Err(ExportError::QueryError(format!(
            "Expected 4 columns, got {}",
            row.len()
        )));
    }
    let column = |i: usize| row.as_ref(i).map(format_value).unwrap_or_default();

    let mapping = MappingRow {
        public_address: column(0),
        source_port: column(1),
        resource_name: column(2),
        floating_ip: column(3),
    };
    debug!("Read row: {:?}", mapping);
    Ok(mapping)
}

/// Renders a column value as CSV text. NULL becomes an empty field.
pub(crate) fn format_value(value: &Value) -> String {
    match value {
        Value::NULL => String::new(),
        Value::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        Value::Int(v) => v.to_string(),
        Value::UInt(v) => v.to_string(),
        Value::Float(v) => v.to_string(),
        Value::Double(v) => v.to_string(),
        Value::Date(year, month, day, hour, minute, second, micros) => format!(
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:06}",
            year, month, day, hour, minute, second, micros
        ),
        Value::Time(negative, days, hours, minutes, seconds, micros) => format!(
            "{}{:02}:{:02}:{:02}.{:06}",
            if *negative { "-" } else { "" },
            u32::from(*hours) + days * 24,
            minutes,
            seconds,
            micros
        ),
    }
}
