// ============================================================
// Layer 3 — DrivingLog
// ============================================================
// The simulator writes one CSV row per recorded frame. The log
// keeps that table exactly as read: every column is an ordered
// Vec of raw cell strings, all of the same length. A header
// that repeats an earlier name is ignored; the first column
// with that name wins.
//
// Typed access (paths, angles) lives in data::dataset — this
// struct only knows about columns and rows.

use std::collections::HashMap;

/// Columnar view over a headered CSV file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrivingLog {
    /// Header names in file order
    headers: Vec<String>,
    /// Column name → one value per data row
    columns: HashMap<String, Vec<String>>,
    /// Per header position, whether it is the first with its name
    owners: Vec<bool>,
    /// Number of data rows (header excluded)
    rows: usize,
}

impl DrivingLog {
    /// Create an empty log with the given header row.
    pub fn with_headers(headers: Vec<String>) -> Self {
        let mut columns: HashMap<String, Vec<String>> = HashMap::with_capacity(headers.len());
        let owners = headers
            .iter()
            .map(|h| columns.insert(h.clone(), Vec::new()).is_none())
            .collect();
        Self { headers, columns, owners, rows: 0 }
    }

    /// Append one data row. Short rows are padded with empty
    /// cells and extra cells are dropped, so every column keeps
    /// the same length.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cells = cells.into_iter();
        for (header, &owner) in self.headers.iter().zip(&self.owners) {
            let value = cells.next().map(Into::into).unwrap_or_default();
            if !owner {
                continue;
            }
            if let Some(column) = self.columns.get_mut(header) {
                column.push(value);
            }
        }
        self.rows += 1;
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// All values of a column, in row order.
    pub fn column(&self, name: &str) -> Option<&[String]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log() -> DrivingLog {
        let mut log = DrivingLog::with_headers(vec!["CENTER_IMAGE".into(), "STEERING_ANGLE".into()]);
        log.push_row(["img/0.png", "0.0"]);
        log.push_row(["img/1.png", "-0.25"]);
        log
    }

    #[test]
    fn test_columns_keep_row_order() {
        let log = log();
        assert_eq!(log.len(), 2);
        assert_eq!(log.column("CENTER_IMAGE").unwrap(), ["img/0.png", "img/1.png"]);
        assert_eq!(log.column("STEERING_ANGLE").unwrap()[1], "-0.25");
    }

    #[test]
    fn test_unknown_column_is_none() {
        assert!(log().column("THROTTLE").is_none());
    }

    #[test]
    fn test_short_rows_are_padded() {
        let mut log = log();
        log.push_row(["img/2.png"]);
        assert_eq!(log.len(), 3);
        assert_eq!(log.column("STEERING_ANGLE").unwrap()[2], "");
    }

    #[test]
    fn test_repeated_header_keeps_first_column() {
        let mut log = DrivingLog::with_headers(vec![
            "CENTER_IMAGE".into(),
            "STEERING_ANGLE".into(),
            "STEERING_ANGLE".into(),
        ]);
        log.push_row(["a.png", "0.1", "9.0"]);
        log.push_row(["b.png", "0.2", "8.0"]);

        assert_eq!(log.len(), 2);
        assert_eq!(log.column("STEERING_ANGLE").unwrap(), ["0.1", "0.2"]);
        assert_eq!(log.column("CENTER_IMAGE").unwrap().len(), 2);
    }
}
