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

//! Reads the operator's filter list from disk.

use crate::domain::entities::FilterItem;
use crate::domain::errors::{ExportError, Result};
use log::info;
use std::path::Path;

/// Loads and decodes a JSON array of `{ip_address, port, edge}` objects.
///
/// A file that cannot be read is an I/O error; one that does not parse is
/// a `DecodeError`.
pub fn load_filter_items<P: AsRef<Path>>(path: P) -> Result<Vec<FilterItem>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(ExportError::IoError)?;
    let items = FilterItem::decode_list(&bytes)?;
    info!("Loaded {} filter items from {}", items.len(), path.display());
    Ok(items)
}
