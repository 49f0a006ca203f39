//! Raw-entries CSV export.
//!
//! One row per active entry of an active employee, newest first:
//! `entry_id;employee_id;employee_name;rfid_tag;timestamp_iso8601;action;active`

use crate::db::queries::ExportRow;
use crate::errors::{AppError, AppResult};
use std::path::Path;

pub fn write_raw_entries(path: &Path, rows: &[ExportRow]) -> AppResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(path)
        .map_err(|e| AppError::Export(e.to_string()))?;

    wtr.write_record([
        "entry_id",
        "employee_id",
        "employee_name",
        "rfid_tag",
        "timestamp_iso8601",
        "action",
        "active",
    ])
    .map_err(|e| AppError::Export(e.to_string()))?;

    for row in rows {
        wtr.write_record(&[
            row.entry_id.to_string(),
            row.employee_id.to_string(),
            row.employee_name.clone(),
            row.rfid_tag.clone(),
            row.timestamp.format("%Y-%m-%dT%H:%M:%S").to_string(),
            row.action.to_db_str().to_string(),
            "true".to_string(),
        ])
        .map_err(|e| AppError::Export(e.to_string()))?;
    }

    wtr.flush()?;
    Ok(())
}
