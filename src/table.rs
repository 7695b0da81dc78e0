//! Labeled tabular data exchanged with the engine.
//!
//! A [`DataFrame`] is a list of named columns, each numeric or text, plus
//! the provenance recorded when it was read from disk. Only the numeric
//! columns are ever sent to the engine.

use std::fs;
use std::path::{Path, PathBuf};

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::container::Describable;
use crate::error::{ExecutionError, ProjectError, ValidationError};

/// Values of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "snake_case")]
pub enum ColumnData {
    /// Floating-point values.
    Numeric(Vec<f64>),
    /// Anything that did not parse as a number.
    Text(Vec<String>),
}

impl ColumnData {
    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(v) => v.len(),
            Self::Text(v) => v.len(),
        }
    }

    /// Whether the column has no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the values are numeric.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric(_))
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Column values.
    pub data: ColumnData,
}

/// Where a table came from.
///
/// Recorded by [`read_delimited`] and consulted when a run has no
/// explicit dataset ID or data path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// Dataset ID.
    pub id_data: Option<String>,
    /// Directory the file was read from.
    pub path_data: Option<PathBuf>,
}

/// Column-oriented table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataFrame {
    columns: Vec<Column>,
    #[serde(default)]
    provenance: Provenance,
}

impl DataFrame {
    /// Creates an empty frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a numeric column, returning the frame for chaining.
    #[must_use]
    pub fn with_numeric(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.push_column(name, ColumnData::Numeric(values));
        self
    }

    /// Adds a text column, returning the frame for chaining.
    #[must_use]
    pub fn with_text<S: Into<String>>(mut self, name: impl Into<String>, values: Vec<S>) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.push_column(name, ColumnData::Text(values));
        self
    }

    /// Sets the provenance, returning the frame for chaining.
    #[must_use]
    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = provenance;
        self
    }

    /// Appends a column.
    pub fn push_column(&mut self, name: impl Into<String>, data: ColumnData) {
        self.columns.push(Column {
            name: name.into(),
            data,
        });
    }

    /// All columns in order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Looks a column up by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Values of a numeric column.
    #[must_use]
    pub fn numeric(&self, name: &str) -> Option<&[f64]> {
        match &self.column(name)?.data {
            ColumnData::Numeric(values) => Some(values),
            ColumnData::Text(_) => None,
        }
    }

    /// Number of rows, taken from the first column.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.data.len())
    }

    /// Number of columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Where the frame was read from.
    #[must_use]
    pub const fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// Checks that every column has the same number of rows.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let rows = self.n_rows();
        if let Some(bad) = self.columns.iter().find(|c| c.data.len() != rows) {
            return Err(ValidationError::InvalidData {
                reason: format!(
                    "column '{}' has {} rows, expected {rows}",
                    bad.name,
                    bad.data.len()
                ),
            });
        }
        Ok(())
    }

    /// Numeric columns as an observations × variables matrix.
    ///
    /// Text columns are skipped; the returned names follow column order.
    #[must_use]
    pub fn numeric_matrix(&self) -> (Vec<String>, Array2<f64>) {
        let numeric: Vec<(&str, &[f64])> = self
            .columns
            .iter()
            .filter_map(|c| match &c.data {
                ColumnData::Numeric(values) => Some((c.name.as_str(), values.as_slice())),
                ColumnData::Text(_) => None,
            })
            .collect();
        let rows = self.n_rows();
        let names = numeric.iter().map(|(name, _)| (*name).to_string()).collect();
        let matrix = Array2::from_shape_fn((rows, numeric.len()), |(r, c)| numeric[c].1[r]);
        (names, matrix)
    }

    /// Builds a frame from an observations × variables matrix.
    pub fn from_matrix(
        table: &str,
        matrix: &Array2<f64>,
        columns: &[String],
    ) -> Result<Self, ExecutionError> {
        if matrix.ncols() != columns.len() {
            return Err(ExecutionError::MalformedTable {
                table: table.to_string(),
                expected: columns.len(),
                actual: matrix.ncols(),
            });
        }
        let mut frame = Self::new();
        for (name, col) in columns.iter().zip(matrix.columns()) {
            frame.push_column(name.clone(), ColumnData::Numeric(col.to_vec()));
        }
        Ok(frame)
    }
}

impl Describable for DataFrame {
    fn middle_repr(&self) -> Option<String> {
        Some(format!("{} rows x {} columns", self.n_rows(), self.n_cols()))
    }
}

/// Reads `<dir>/<id>.txt`, a tab-delimited file with a header row.
///
/// A column is numeric when every non-blank cell parses as a float; blank
/// cells in a numeric column read as NaN. The frame records `id` and `dir`
/// as its provenance.
pub fn read_delimited(dir: &Path, id: &str) -> Result<DataFrame, ProjectError> {
    let path = dir.join(format!("{id}.txt"));
    let data_err = |message: String| ProjectError::DataFile {
        path: path.display().to_string(),
        message,
    };
    let text = fs::read_to_string(&path).map_err(|e| data_err(e.to_string()))?;

    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let header: Vec<&str> = lines
        .next()
        .ok_or_else(|| data_err("file has no header row".to_string()))?
        .split('\t')
        .map(str::trim)
        .collect();

    let mut cells: Vec<Vec<&str>> = vec![Vec::new(); header.len()];
    for (line_no, line) in lines.enumerate() {
        let row: Vec<&str> = line.split('\t').map(str::trim).collect();
        if row.len() != header.len() {
            return Err(data_err(format!(
                "row {} has {} fields, expected {}",
                line_no + 2,
                row.len(),
                header.len()
            )));
        }
        for (col, value) in cells.iter_mut().zip(row) {
            col.push(value);
        }
    }

    let mut frame = DataFrame::new().with_provenance(Provenance {
        id_data: Some(id.to_string()),
        path_data: Some(dir.to_path_buf()),
    });
    for (name, values) in header.into_iter().zip(cells) {
        let parsed: Option<Vec<f64>> = values.iter().map(|v| parse_cell(v)).collect();
        let data = match parsed {
            Some(numbers) => ColumnData::Numeric(numbers),
            None => ColumnData::Text(values.into_iter().map(str::to_string).collect()),
        };
        frame.push_column(name, data);
    }
    Ok(frame)
}

fn parse_cell(value: &str) -> Option<f64> {
    if value.is_empty() {
        return Some(f64::NAN);
    }
    value.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        DataFrame::new()
            .with_numeric("idhh", vec![1.0, 1.0, 2.0])
            .with_text("country", vec!["sl", "sl", "sl"])
            .with_numeric("yem", vec![100.0, 0.0, 250.0])
    }

    #[test]
    fn numeric_matrix_skips_text_columns() {
        let (names, m) = sample().numeric_matrix();
        assert_eq!(names, ["idhh", "yem"]);
        assert_eq!(m.dim(), (3, 2));
        assert_eq!(m[[2, 1]], 250.0);
    }

    #[test]
    fn validate_rejects_ragged_columns() {
        let frame = DataFrame::new()
            .with_numeric("a", vec![1.0, 2.0])
            .with_numeric("b", vec![1.0]);
        let err = frame.validate().unwrap_err();
        assert!(err.to_string().contains("'b'"));
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn from_matrix_checks_column_count() {
        let m = Array2::from_shape_vec((2, 2), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let frame = DataFrame::from_matrix("out", &m, &["a".into(), "b".into()]).unwrap();
        assert_eq!(frame.numeric("b").unwrap(), &[2.0, 4.0]);

        let err = DataFrame::from_matrix("out", &m, &["a".into()]).unwrap_err();
        assert!(matches!(err, ExecutionError::MalformedTable { expected: 1, actual: 2, .. }));
    }

    #[test]
    fn reads_tab_delimited_file_with_provenance() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("sl_demo.txt"),
            "idhh\tdct\tyem\n1\tSL\t100.5\n2\tSL\t0\n",
        )
        .unwrap();

        let frame = read_delimited(dir.path(), "sl_demo").unwrap();
        assert_eq!(frame.n_rows(), 2);
        assert_eq!(frame.numeric("yem").unwrap(), &[100.5, 0.0]);
        assert!(!frame.column("dct").unwrap().data.is_numeric());
        assert_eq!(frame.provenance().id_data.as_deref(), Some("sl_demo"));
        assert_eq!(frame.provenance().path_data.as_deref(), Some(dir.path()));
    }

    #[test]
    fn blank_cells_keep_a_column_numeric() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("gaps.txt"),
            "idhh\tyem\tdct\n1\t1000\tSL\n2\t\t\n",
        )
        .unwrap();

        let frame = read_delimited(dir.path(), "gaps").unwrap();
        let yem = frame.numeric("yem").unwrap();
        assert_eq!(yem[0], 1000.0);
        assert!(yem[1].is_nan());
        assert!(!frame.column("dct").unwrap().data.is_numeric());

        let (names, m) = frame.numeric_matrix();
        assert_eq!(names, ["idhh", "yem"]);
        assert!(m[[1, 1]].is_nan());
    }

    #[test]
    fn read_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_delimited(dir.path(), "missing").unwrap_err();
        assert!(err.to_string().contains("missing.txt"));
    }
}
