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

use crate::domain::entities::WriteOutcome;
use crate::domain::errors::Result;
use crate::ports::mapping_source::RowCursor;

/// Port for persisting result rows.
pub trait ResultWriter {
    /// Drains `rows` into the destination, appending to what is already there.
    fn write_rows(&self, rows: RowCursor<'_>) -> Result<WriteOutcome>;

    /// Human readable name of the destination, for the completion message.
    fn destination(&self) -> String;
}
