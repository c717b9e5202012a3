//! CSV persistence for the reports.

use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use tracing::{debug, info};

use crate::error::{PipelineError, Result};
use crate::table::Record;

/// Writes `rows` to a CSV file at `path`, replacing any existing file.
///
/// The header is the row type's [`Record::COLUMNS`] and is written even when
/// `rows` is empty.
pub fn write_report<T: Serialize + Record>(path: &str, rows: &[T]) -> Result<()> {
    debug!(path, rows = rows.len(), "Writing CSV report");

    let file = File::create(path).map_err(|e| PipelineError::io(path, e))?;
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

    writer
        .write_record(T::COLUMNS)
        .map_err(|e| PipelineError::io(path, e))?;

    for row in rows {
        writer.serialize(row).map_err(|e| PipelineError::io(path, e))?;
    }
    writer.flush().map_err(|e| PipelineError::io(path, e))?;

    info!(path, rows = rows.len(), "Report written");
    Ok(())
}
