use std::path::{Path, PathBuf};

use burn::data::dataset::Dataset;

use crate::data::DataError;
use crate::domain::{driving_log::DrivingLog, record::DrivingRecord};

pub const DEFAULT_IMAGE_COLUMN: &str = "CENTER_IMAGE";
pub const DEFAULT_ANGLE_COLUMN: &str = "STEERING_ANGLE";

/// Typed, immutable row table built once from a DrivingLog.
/// Relative image paths are resolved against the image root.
#[derive(Debug, Clone)]
pub struct DrivingDataset {
    records: Vec<DrivingRecord>,
}

impl DrivingDataset {
    pub fn new(records: Vec<DrivingRecord>) -> Self {
        Self { records }
    }

    pub fn from_log(
        log:          &DrivingLog,
        image_column: &str,
        angle_column: &str,
        image_root:   &Path,
    ) -> Result<Self, DataError> {
        let images = log
            .column(image_column)
            .ok_or_else(|| DataError::MissingColumn(image_column.to_string()))?;
        let angles = log
            .column(angle_column)
            .ok_or_else(|| DataError::MissingColumn(angle_column.to_string()))?;
        for (name, column) in [(image_column, images), (angle_column, angles)] {
            if column.len() != log.len() {
                return Err(DataError::ColumnLength {
                    column:   name.to_string(),
                    expected: log.len(),
                    found:    column.len(),
                });
            }
        }

        let records = images
            .iter()
            .zip(angles)
            .enumerate()
            .map(|(row, (image, angle))| {
                let steering_angle = angle.parse::<f32>().map_err(|_| DataError::InvalidAngle {
                    row,
                    value: angle.clone(),
                })?;
                Ok(DrivingRecord::new(resolve(image_root, image), steering_angle))
            })
            .collect::<Result<Vec<_>, DataError>>()?;

        Ok(Self { records })
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

fn resolve(root: &Path, image: &str) -> PathBuf {
    // join() keeps absolute paths as they are
    root.join(image)
}

impl Dataset<DrivingRecord> for DrivingDataset {
    fn get(&self, index: usize) -> Option<DrivingRecord> {
        self.records.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(angles: &[&str]) -> DrivingLog {
        let mut log = DrivingLog::with_headers(vec![
            DEFAULT_IMAGE_COLUMN.into(),
            "THROTTLE".into(),
            DEFAULT_ANGLE_COLUMN.into(),
        ]);
        for (i, a) in angles.iter().enumerate() {
            log.push_row([format!("img/{i}.png"), "1.0".to_string(), a.to_string()]);
        }
        log
    }

    #[test]
    fn test_records_resolve_against_root() {
        let ds = DrivingDataset::from_log(
            &log(&["0.5", "-0.25"]),
            DEFAULT_IMAGE_COLUMN,
            DEFAULT_ANGLE_COLUMN,
            Path::new("/data"),
        )
        .unwrap();

        assert_eq!(ds.len(), 2);
        let r = ds.get(1).unwrap();
        assert_eq!(r.image_path, PathBuf::from("/data/img/1.png"));
        assert_eq!(r.steering_angle, -0.25);
        assert!(ds.get(2).is_none());
    }

    #[test]
    fn test_missing_column() {
        let err = DrivingDataset::from_log(&log(&["0"]), "LEFT_IMAGE", DEFAULT_ANGLE_COLUMN, Path::new("."))
            .unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(c) if c == "LEFT_IMAGE"));
    }

    #[test]
    fn test_invalid_angle_reports_row() {
        let err = DrivingDataset::from_log(
            &log(&["0.1", "left"]),
            DEFAULT_IMAGE_COLUMN,
            DEFAULT_ANGLE_COLUMN,
            Path::new("."),
        )
        .unwrap_err();
        assert!(matches!(err, DataError::InvalidAngle { row: 1, .. }));
    }

    #[test]
    fn test_repeated_angle_header_keeps_row_pairing() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.csv");
        std::fs::write(
            &path,
            "CENTER_IMAGE,STEERING_ANGLE,STEERING_ANGLE\na.png,0.1,9.0\nb.png,0.2,8.0\n",
        )
        .unwrap();

        let log = crate::data::loader::load_driving_log(&path).unwrap();
        let ds  = DrivingDataset::from_log(&log, DEFAULT_IMAGE_COLUMN, DEFAULT_ANGLE_COLUMN, dir.path())
            .unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.get(0).unwrap().steering_angle, 0.1);
        assert_eq!(ds.get(1).unwrap().steering_angle, 0.2);
        assert_eq!(ds.get(1).unwrap().image_path, dir.path().join("b.png"));
    }
}
