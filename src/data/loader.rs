// ============================================================
// Layer 4 — Driving Log Loader
// ============================================================
// Reads the simulator's CSV into a DrivingLog using the csv
// crate. The first line is the header; every following line is
// one recorded frame. Fields are trimmed because the simulator
// writes ", " separators.
//
// No validation happens here: image paths are not checked for
// existence and angles are not parsed. Those failures surface
// in DrivingDataset::from_log and in the batch generator.

use std::path::Path;

use csv::{ReaderBuilder, Trim};

use crate::data::DataError;
use crate::domain::driving_log::DrivingLog;

/// Load a headered CSV file into a columnar DrivingLog.
/// Row order is preserved.
pub fn load_driving_log(path: impl AsRef<Path>) -> Result<DrivingLog, DataError> {
    let path = path.as_ref();
    let csv_error = |source| DataError::Csv { path: path.to_path_buf(), source };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(csv_error)?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut log = DrivingLog::with_headers(headers);
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        log.push_row(record.iter());
    }

    tracing::info!(
        "Loaded {} rows from '{}' (columns: {})",
        log.len(),
        path.display(),
        log.headers().join(", ")
    );
    Ok(log)
}
