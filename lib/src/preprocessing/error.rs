//! Error types for vocabulary construction, encoding and decoding.

use thiserror::Error;

/// Error type for preprocessing operations.
///
/// Every variant is raised synchronously by the call that violated its
/// contract; none of them describe transient conditions worth retrying.
#[derive(Debug, Error)]
pub enum PreprocessingError {
    /// A row (or matrix) does not have the number of columns the vocabulary
    /// or the rest of the input expects.
    #[error("Schema mismatch at {context}: expected {expected} columns, got {got}")]
    SchemaMismatch {
        context: String,
        expected: usize,
        got: usize,
    },
    /// The frequency cutoff must be at least 1.
    #[error("Invalid cutoff: {0} (must be >= 1)")]
    InvalidCutoff(usize),
    /// A column index past the end of the schema.
    #[error("Column index {index} out of range for {n_columns} columns")]
    IndexOutOfRange { index: usize, n_columns: usize },
    /// Empty data provided where non-empty was required.
    #[error("Empty data: {0}")]
    EmptyData(String),
    /// A matrix field that doesn't parse as a number.
    #[error("Invalid number {value:?} at row {row}, column {column}")]
    InvalidNumber {
        row: usize,
        column: usize,
        value: String,
    },
    /// Deserialized parameters violate a vocabulary invariant.
    #[error("Corrupt vocabulary: {0}")]
    CorruptVocabulary(String),
    /// Serialization or deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Malformed delimited input.
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl PreprocessingError {
    pub(crate) fn schema_mismatch(context: impl Into<String>, expected: usize, got: usize) -> Self {
        PreprocessingError::SchemaMismatch {
            context: context.into(),
            expected,
            got,
        }
    }
}

impl From<bincode::Error> for PreprocessingError {
    fn from(err: bincode::Error) -> Self {
        PreprocessingError::SerializationError(err.to_string())
    }
}

impl From<serde_json::Error> for PreprocessingError {
    fn from(err: serde_json::Error) -> Self {
        PreprocessingError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_schema_mismatch() {
        let err = PreprocessingError::schema_mismatch("row 4", 3, 2);
        let msg = err.to_string();
        assert!(msg.contains("Schema mismatch"));
        assert!(msg.contains("row 4"));
        assert!(msg.contains("expected 3"));
    }

    #[test]
    fn test_error_display_invalid_cutoff() {
        let err = PreprocessingError::InvalidCutoff(0);
        assert!(err.to_string().contains("Invalid cutoff"));
    }

    #[test]
    fn test_error_display_index_out_of_range() {
        let err = PreprocessingError::IndexOutOfRange {
            index: 7,
            n_columns: 2,
        };
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_error_display_corrupt_vocabulary() {
        let err = PreprocessingError::CorruptVocabulary("widths".to_string());
        assert!(err.to_string().contains("Corrupt vocabulary"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: PreprocessingError = io_err.into();
        assert!(matches!(err, PreprocessingError::IoError(_)));
    }

    #[test]
    fn test_error_from_bincode_error() {
        let bad_bytes: &[u8] = &[0xff, 0xff, 0xff, 0xff];
        let bincode_result: Result<String, bincode::Error> = bincode::deserialize(bad_bytes);
        if let Err(e) = bincode_result {
            let err: PreprocessingError = e.into();
            assert!(matches!(err, PreprocessingError::SerializationError(_)));
        }
    }

    #[test]
    fn test_error_is_std_error() {
        let err = PreprocessingError::InvalidCutoff(0);
        let _: &dyn std::error::Error = &err;
    }
}
