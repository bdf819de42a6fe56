//! Delimited-file ingestion and export.
//!
//! Survey exports are comma-separated with double-quote quoting, one header
//! row, and ISO-8859-1 (Latin-1) text. [`SurveyTable`] reads such a file into
//! owned UTF-8 rows ready for
//! [`VocabularyBuilder`](crate::preprocessing::VocabularyBuilder). The writer
//! helpers produce the CSV forms of encoded matrices and decoded answers used
//! by the command-line tool.
//!
//! # Example
//!
//! ```
//! use survey_encoding::dataset::SurveyTable;
//!
//! let csv = "q1,q2\nyes,\"red, dark\"\nNA,blue\n";
//! let table = SurveyTable::from_reader(csv.as_bytes()).unwrap();
//!
//! assert_eq!(table.headers(), &["q1", "q2"]);
//! assert_eq!(table.len(), 2);
//! assert_eq!(table.rows()[0][1], "red, dark");
//! ```

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder, Terminator, WriterBuilder};
use ndarray::{Array2, ArrayView2};
use tracing::info;

use crate::preprocessing::{PreprocessingError, Row};

/// A survey file held in memory: one header plus equally long answer rows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SurveyTable {
    headers: Vec<String>,
    rows: Vec<Row>,
}

impl SurveyTable {
    /// Create a table from already-decoded parts.
    ///
    /// # Errors
    /// [`PreprocessingError::SchemaMismatch`] if a row's length differs from
    /// the header's.
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Result<Self, PreprocessingError> {
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(PreprocessingError::schema_mismatch(
                    format!("row {}", idx),
                    headers.len(),
                    row.len(),
                ));
            }
        }
        Ok(Self { headers, rows })
    }

    /// Load a Latin-1 encoded CSV file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PreprocessingError> {
        let file = File::open(path.as_ref())?;
        let table = Self::from_reader(BufReader::new(file))?;
        info!(
            path = %path.as_ref().display(),
            rows = table.len(),
            columns = table.n_columns(),
            "loaded survey table"
        );
        Ok(table)
    }

    /// Read Latin-1 encoded CSV from any reader.
    ///
    /// The first record is taken as the header. Records with a different
    /// field count than the header are rejected.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PreprocessingError> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .quote(b'"')
            .has_headers(true)
            .from_reader(reader);

        let headers = latin1_record(rdr.byte_headers()?);
        let mut rows = Vec::new();
        let mut record = ByteRecord::new();
        while rdr.read_byte_record(&mut record)? {
            rows.push(latin1_record(&record));
        }
        Ok(Self { headers, rows })
    }

    /// Column names from the header row.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Answer rows, header excluded.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Consume the table, returning `(headers, rows)`.
    pub fn into_parts(self) -> (Vec<String>, Vec<Row>) {
        (self.headers, self.rows)
    }

    /// Number of answer rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no answer rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns in the header.
    pub fn n_columns(&self) -> usize {
        self.headers.len()
    }
}

/// ISO-8859-1 maps every byte to the code point of the same value.
fn latin1_record(record: &ByteRecord) -> Row {
    record
        .iter()
        .map(|field| field.iter().map(|&b| char::from(b)).collect())
        .collect()
}

fn csv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer)
}

/// Write rows of answers as UTF-8 CSV, with an optional header.
pub fn write_rows<W: Write>(
    writer: W,
    headers: Option<&[String]>,
    rows: &[Row],
) -> Result<(), PreprocessingError> {
    let mut wtr = csv_writer(writer);
    if let Some(headers) = headers {
        wtr.write_record(headers)?;
    }
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write a numeric matrix as CSV under a header of column labels.
///
/// # Errors
/// [`PreprocessingError::SchemaMismatch`] if the label count differs from the
/// matrix width.
pub fn write_matrix<W: Write>(
    writer: W,
    labels: &[String],
    matrix: ArrayView2<'_, f32>,
) -> Result<(), PreprocessingError> {
    if labels.len() != matrix.ncols() {
        return Err(PreprocessingError::schema_mismatch(
            "matrix labels",
            matrix.ncols(),
            labels.len(),
        ));
    }
    let mut wtr = csv_writer(writer);
    wtr.write_record(labels)?;
    for row in matrix.rows() {
        wtr.write_record(row.iter().map(|v| v.to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Read a numeric matrix written by [`write_matrix`] (header row skipped).
///
/// # Errors
/// [`PreprocessingError::InvalidNumber`] for a field that isn't an `f32`.
pub fn read_matrix<R: Read>(reader: R) -> Result<Array2<f32>, PreprocessingError> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let width = rdr.headers()?.len();

    let mut data = Vec::new();
    let mut n_rows = 0;
    for (row_idx, record) in rdr.records().enumerate() {
        let record = record?;
        for (col_idx, field) in record.iter().enumerate() {
            let value = field
                .trim()
                .parse::<f32>()
                .map_err(|_| PreprocessingError::InvalidNumber {
                    row: row_idx,
                    column: col_idx,
                    value: field.to_string(),
                })?;
            data.push(value);
        }
        n_rows += 1;
    }
    Array2::from_shape_vec((n_rows, width), data)
        .map_err(|e| PreprocessingError::SerializationError(e.to_string()))
}
