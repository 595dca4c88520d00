// ============================================================
// Layer 4 — Archive Preparer
// ============================================================
// The recorded images ship as one zip archive. Extraction is
// slow, so it happens only when the expected layout is absent:
//
//   <root>/data_augmented/       ← marker directory
//   <root>/data_augmented.csv    ← marker driving log
//
// If both markers exist the archive is not even opened, which
// makes prepare() idempotent and lets the archive be deleted
// after the first run.

use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};

use zip::{result::ZipError, ZipArchive};

use crate::data::DataError;

/// What prepare() ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveOutcome {
    /// Both markers were present, nothing was touched
    AlreadyPresent,
    /// The archive was extracted into the root directory
    Extracted { entries: usize },
}

/// Ensures the image dataset is present under `root`.
#[derive(Debug, Clone)]
pub struct ArchivePreparer {
    root:       PathBuf,
    archive:    PathBuf,
    marker_dir: PathBuf,
    marker_csv: PathBuf,
}

impl ArchivePreparer {
    /// All three names are relative to `root` (absolute paths are kept).
    pub fn new(
        root:       impl Into<PathBuf>,
        archive:    impl AsRef<Path>,
        marker_dir: impl AsRef<Path>,
        marker_csv: impl AsRef<Path>,
    ) -> Self {
        let root = root.into();
        Self {
            archive:    root.join(archive),
            marker_dir: root.join(marker_dir),
            marker_csv: root.join(marker_csv),
            root,
        }
    }

    /// True when the extracted directory and the CSV both exist.
    pub fn is_prepared(&self) -> bool {
        self.marker_dir.is_dir() && self.marker_csv.exists()
    }

    /// Extract the archive into the root unless the markers already exist.
    pub fn prepare(&self) -> Result<ArchiveOutcome, DataError> {
        if self.is_prepared() {
            tracing::debug!(
                "'{}' and '{}' present, skipping extraction",
                self.marker_dir.display(),
                self.marker_csv.display()
            );
            return Ok(ArchiveOutcome::AlreadyPresent);
        }

        tracing::info!("unzipping data");
        let file = File::open(&self.archive).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => DataError::ArchiveMissing(self.archive.clone()),
            _ => self.extraction_error(ZipError::Io(e)),
        })?;

        let mut zip = ZipArchive::new(file).map_err(|e| self.extraction_error(e))?;
        let entries = zip.len();
        zip.extract(&self.root).map_err(|e| self.extraction_error(e))?;

        tracing::info!("Extracted {} entries from '{}'", entries, self.archive.display());
        Ok(ArchiveOutcome::Extracted { entries })
    }

    fn extraction_error(&self, source: ZipError) -> DataError {
        DataError::Extraction { path: self.archive.clone(), source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, io::Write};
    use zip::{write::SimpleFileOptions, ZipWriter};

    fn write_archive(path: &Path) {
        let mut zip = ZipWriter::new(File::create(path).unwrap());
        let opts    = SimpleFileOptions::default();
        zip.add_directory("data_augmented/", opts).unwrap();
        zip.start_file("data_augmented/0.png", opts).unwrap();
        zip.write_all(b"not really a png").unwrap();
        zip.start_file("data_augmented.csv", opts).unwrap();
        zip.write_all(b"CENTER_IMAGE,STEERING_ANGLE\ndata_augmented/0.png,0.1\n").unwrap();
        zip.finish().unwrap();
    }

    fn preparer(root: &Path) -> ArchivePreparer {
        ArchivePreparer::new(root, "data_augmented.zip", "data_augmented", "data_augmented.csv")
    }

    #[test]
    fn test_extracts_when_markers_missing() {
        let dir = tempfile::tempdir().unwrap();
        write_archive(&dir.path().join("data_augmented.zip"));

        let outcome = preparer(dir.path()).prepare().unwrap();
        assert!(matches!(outcome, ArchiveOutcome::Extracted { entries } if entries >= 2));
        assert!(dir.path().join("data_augmented/0.png").exists());
        assert!(dir.path().join("data_augmented.csv").exists());
    }

    #[test]
    fn test_second_call_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("data_augmented.zip");
        write_archive(&archive);

        let p = preparer(dir.path());
        assert!(matches!(p.prepare().unwrap(), ArchiveOutcome::Extracted { .. }));

        // Without the archive a second extraction would fail, so
        // success proves nothing was re-extracted.
        fs::remove_file(&archive).unwrap();
        assert_eq!(p.prepare().unwrap(), ArchiveOutcome::AlreadyPresent);
    }

    #[test]
    fn test_missing_archive_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = preparer(dir.path()).prepare().unwrap_err();
        assert!(matches!(err, DataError::ArchiveMissing(_)));
    }

    #[test]
    fn test_corrupt_archive_is_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("data_augmented.zip"), b"definitely not a zip").unwrap();
        let err = preparer(dir.path()).prepare().unwrap_err();
        assert!(matches!(err, DataError::Extraction { .. }));
    }

    #[test]
    fn test_partial_markers_trigger_extraction() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("data_augmented")).unwrap();
        write_archive(&dir.path().join("data_augmented.zip"));

        let p = preparer(dir.path());
        assert!(!p.is_prepared());
        assert!(matches!(p.prepare().unwrap(), ArchiveOutcome::Extracted { .. }));
        assert!(p.is_prepared());
    }
}
