use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while preparing and reading the driving dataset.
/// None of them are retried; they propagate up and end the run.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("archive '{0}' not found")]
    ArchiveMissing(PathBuf),

    #[error("cannot extract archive '{path}': {source}")]
    Extraction {
        path:   PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("cannot parse CSV '{path}': {source}")]
    Csv {
        path:   PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("required column '{0}' is missing from the driving log")]
    MissingColumn(String),

    #[error("column '{column}' has {found} cells, expected {expected}")]
    ColumnLength { column: String, expected: usize, found: usize },

    #[error("row {row}: steering angle '{value}' is not a number")]
    InvalidAngle { row: usize, value: String },

    #[error("row {0} does not exist in the dataset")]
    MissingRow(usize),

    #[error("cannot read image '{path}': {source}")]
    ImageRead {
        path:   PathBuf,
        #[source]
        source: image::ImageError,
    },
}
