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

//! Infrastructure adapter that appends result rows to a local CSV file.

use crate::domain::entities::WriteOutcome;
use crate::domain::errors::{ExportError, Result};
use crate::ports::mapping_source::RowCursor;
use crate::ports::result_writer::ResultWriter;
use csv::WriterBuilder;
use log::{debug, info, warn};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

pub const CSV_HEADER: [&str; 4] = ["Public_Address", "Source_Port", "VM_Name", "Floating_IP"];

/// Concrete implementation of `ResultWriter` for a CSV file.
///
/// The file is opened in append mode. The header goes in only when the
/// file is empty at open time, so repeated runs against the same file keep
/// a single header. If the cursor or a write fails, the file is cut back to
/// its length at open time: existing content is kept, nothing new is.
pub struct CsvResultAdapter {
    output_file: PathBuf,
}

impl CsvResultAdapter {
    pub fn new<P: Into<PathBuf>>(output_file: P) -> Self {
        Self {
            output_file: output_file.into(),
        }
    }
}

impl ResultWriter for CsvResultAdapter {
    fn write_rows(&self, rows: RowCursor<'_>) -> Result<WriteOutcome> {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.output_file)
            .map_err(|e| {
                ExportError::WriteError(format!("{}: {}", self.output_file.display(), e))
            })?;
        let start_len = file
            .metadata()
            .map_err(|e| ExportError::WriteError(e.to_string()))?
            .len();
        let is_empty = start_len == 0;
        let rollback = file
            .try_clone()
            .map_err(|e| ExportError::WriteError(e.to_string()))?;

        let mut wtr = WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(file));

        match append_rows(&mut wtr, is_empty, rows) {
            Ok(count) => {
                info!(
                    "Appended {} rows to {}",
                    count,
                    self.output_file.display()
                );
                Ok(WriteOutcome {
                    rows_written: count,
                    header_written: is_empty,
                })
            }
            Err(e) => {
                // Cut the file back so a failed run leaves nothing behind.
                drop(wtr);
                if let Err(te) = rollback.set_len(start_len) {
                    warn!(
                        "Could not roll back {} to {} bytes: {}",
                        self.output_file.display(),
                        start_len,
                        te
                    );
                }
                Err(e)
            }
        }
    }

    fn destination(&self) -> String {
        self.output_file.display().to_string()
    }
}

fn append_rows<W: Write>(
    wtr: &mut csv::Writer<W>,
    with_header: bool,
    rows: RowCursor<'_>,
) -> Result<u64> {
    if with_header {
        debug!("Sink is empty, writing header");
        wtr.write_record(CSV_HEADER)?;
    }

    let mut count = 0;
    for row in rows {
        let row = row?;
        wtr.write_record(row.to_record())?;
        count += 1;
    }

    wtr.flush()
        .map_err(|e| ExportError::WriteError(e.to_string()))?;
    Ok(count)
}
