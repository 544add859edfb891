// Copyright 2025 Chatlens Contributors (https://github.com/chatlens/chatlens)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! CSV export of chat events
//!
//! One header row, then one row per event, columns in [`EventField::ALL`]
//! order. Absent optional values become empty cells.

use chatlens_core::{ChatEvent, ChatlensError, EventField, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Write `events` as CSV, returning the number of data rows
pub fn write_csv<W: Write>(events: &[ChatEvent], writer: W) -> Result<usize> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(EventField::ALL.iter().map(|field| field.column_name()))?;
    for event in events {
        csv.write_record(EventField::ALL.iter().map(|field| event.cell(*field)))?;
    }
    csv.flush()?;
    Ok(events.len())
}

/// Write `events` to a CSV file at `path`, replacing it
pub fn write_csv_file(events: &[ChatEvent], path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    let file = File::create(path)
        .map_err(|e| ChatlensError::Export(format!("cannot create {}: {e}", path.display())))?;
    let rows = write_csv(events, file)?;
    info!(path = %path.display(), rows, "exported events to CSV");
    Ok(rows)
}
