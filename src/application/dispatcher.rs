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

//! # Query Dispatcher
//!
//! Turns a server profile plus a filter list into one query against a
//! `MappingSource`.
//!
//! When no filter item matches the edge label the predicate is `()`.
//! In parameterized mode nothing is sent and the cursor is empty. In
//! legacy literal mode `WHERE ()` is sent verbatim; MySQL rejects it and
//! the caller gets a `QueryError`.

use crate::domain::entities::{FilterItem, ServerProfile};
use crate::domain::errors::Result;
use crate::domain::predicate::{
    build_load_balancer_predicate, build_standard_predicate, Predicate,
};
use crate::domain::query::{compose, BindMode, BoundQuery};
use crate::ports::mapping_source::{MappingSource, RowCursor};
use log::{debug, warn};

pub struct QueryDispatcher {
    profile: ServerProfile,
    mode: BindMode,
}

/// A predicate ready to run, or the decision not to run it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub matched: usize,
    pub query: Option<BoundQuery>,
}

impl QueryDispatcher {
    pub fn new(profile: ServerProfile, mode: BindMode) -> Self {
        Self { profile, mode }
    }

    pub fn predicate(&self, items: &[FilterItem], edge: &str) -> Predicate {
        match self.profile {
            ServerProfile::Standard => build_standard_predicate(items, edge),
            ServerProfile::LoadBalancer => build_load_balancer_predicate(items, edge),
        }
    }

    /// Builds the statement for `items`, without touching the database.
    pub fn plan(&self, items: &[FilterItem], edge: &str) -> Result<Plan> {
        let predicate = self.predicate(items, edge);
        let matched = predicate.len();

        if predicate.is_empty() {
            warn!("No filter item matches edge '{}'", edge);
            if self.mode == BindMode::Parameterized {
                return Ok(Plan {
                    matched,
                    query: None,
                });
            }
        }

        let query = compose(self.profile, &predicate, self.mode)?;
        debug!("Composed query: {}", query.sql);
        Ok(Plan {
            matched,
            query: Some(query),
        })
    }

    /// Runs the planned query and hands back its cursor.
    pub fn dispatch<'a>(
        &self,
        source: &'a mut dyn MappingSource,
        items: &[FilterItem],
        edge: &str,
    ) -> Result<(usize, RowCursor<'a>)> {
        let plan = self.plan(items, edge)?;
        let cursor: RowCursor<'a> = match plan.query {
            Some(query) => source.query(&query)?,
            None => Box::new(std::iter::empty()),
        };
        Ok((plan.matched, cursor))
    }
}
