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

//! # Mapping Source Port
//!
//! The contract for "something that can answer a mapping query". The
//! MySQL adapter implements it for real runs; tests hand in canned rows.

use crate::domain::entities::MappingRow;
use crate::domain::errors::Result;
use crate::domain::query::BoundQuery;

/// Forward-only iterator over result rows. Dropping it releases the
/// underlying result set.
pub type RowCursor<'a> = Box<dyn Iterator<Item = Result<MappingRow>> + 'a>;

pub trait MappingSource {
    /// Executes one read-only query and returns its rows.
    ///
    /// The cursor borrows the source, so only one can be open at a time.
    fn query(&mut self, query: &BoundQuery) -> Result<RowCursor<'_>>;
}
