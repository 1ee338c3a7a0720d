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

//! SQL templates for the two server topologies.
//!
//! Both select four columns in the same order:
//! public address, source port, resource name, floating IP.

use crate::domain::entities::ServerProfile;
use crate::domain::errors::{ExportError, Result};
use crate::domain::predicate::Predicate;

const PREDICATE_SLOT: &str = "{predicate}";

/// Most `?` markers MySQL accepts in one prepared statement.
pub const MAX_PLACEHOLDERS: usize = 65_535;

pub const STANDARD_QUERY: &str = "SELECT \
pa.address AS public_address, n.source_port, vm.name AS host, vm.floating_ip \
FROM public_address AS pa \
INNER JOIN nats AS n ON n.public_address = pa.id \
INNER JOIN virtual_machines AS vm ON vm.id = n.virtual_machine \
WHERE {predicate}";

pub const LOAD_BALANCER_QUERY: &str = "SELECT \
lb.public_ip AS public_address, lbr.vip_port AS source_port, i.name, i.public_ip AS floating_ip \
FROM load_balances AS lb \
LEFT JOIN load_balances_rules AS lbr ON lbr.load_balance = lb.id \
LEFT JOIN instances AS i ON i.project = lbr.project \
WHERE {predicate}";

/// How predicate values reach the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindMode {
    /// `?` placeholders with positional parameters.
    Parameterized,
    /// Values pasted into the SQL as quoted literals, unescaped.
    LegacyLiteral,
}

/// A fully composed statement and its positional parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundQuery {
    pub sql: String,
    pub params: Vec<String>,
}

pub fn template_for(profile: ServerProfile) -> &'static str {
    match profile {
        ServerProfile::Standard => STANDARD_QUERY,
        ServerProfile::LoadBalancer => LOAD_BALANCER_QUERY,
    }
}

/// Substitutes the predicate into the profile's template.
///
/// Parameterized queries binding more than `MAX_PLACEHOLDERS` values are
/// refused before anything reaches the server.
pub fn compose(profile: ServerProfile, predicate: &Predicate, mode: BindMode) -> Result<BoundQuery> {
    let template = template_for(profile);
    match mode {
        BindMode::Parameterized => {
            let placeholders = predicate.len() * 2;
            if placeholders > MAX_PLACEHOLDERS {
                return Err(ExportError::QueryError(format!(
                    "{} matching filter items need {} placeholders; MySQL allows at most {} per statement",
                    predicate.len(),
                    placeholders,
                    MAX_PLACEHOLDERS
                )));
            }
            Ok(BoundQuery {
                sql: template.replace(PREDICATE_SLOT, &predicate.placeholder_sql()),
                params: predicate.bind_values(),
            })
        }
        BindMode::LegacyLiteral => Ok(BoundQuery {
            sql: template.replace(PREDICATE_SLOT, &predicate.literal_sql()),
            params: Vec::new(),
        }),
    }
}
