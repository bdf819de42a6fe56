//! Multi-hot encoding of answer rows.

use ndarray::{s, Array2};
use tracing::debug;

use super::vocabulary::Vocabulary;
use crate::preprocessing::error::PreprocessingError;

/// Output of [`encode`]: two row-aligned `(n_rows, total_width)` matrices.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodedMatrix {
    /// 1.0 across a column's whole block when the row's answer is present
    /// and retained, 0.0 otherwise.
    pub existence: Array2<f32>,
    /// 1.0 at the slot of the row's answer, 0.0 everywhere else.
    pub values: Array2<f32>,
}

impl EncodedMatrix {
    /// Number of encoded rows.
    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    /// Width of each row (the vocabulary's total width).
    pub fn width(&self) -> usize {
        self.values.ncols()
    }

    /// Split into `(existence, values)`.
    pub fn into_parts(self) -> (Array2<f32>, Array2<f32>) {
        (self.existence, self.values)
    }
}

/// Encode answer rows against a fixed vocabulary.
///
/// For each row and column:
/// - a missing or unretained answer leaves the column's block at 0 in both
///   matrices;
/// - a retained answer sets the whole block to 1 in `existence` and the
///   answer's slot to 1 in `values`.
///
/// Columns with zero width contribute nothing. Every row is checked before any
/// output is produced.
///
/// # Errors
/// [`PreprocessingError::SchemaMismatch`] if any row's length differs from the
/// vocabulary's column count.
///
/// # Example
/// ```
/// use survey_encoding::preprocessing::{build_vocabulary, encode};
///
/// let vocabulary = build_vocabulary(&[["X", "A"], ["X", "A"], ["X", "B"]], 2).unwrap();
/// let encoded = encode(&[["X", "B"]], &vocabulary).unwrap();
///
/// assert_eq!(encoded.values.row(0).to_vec(), vec![1.0, 0.0]);
/// assert_eq!(encoded.existence.row(0).to_vec(), vec![1.0, 0.0]);
/// ```
pub fn encode<R, S>(rows: &[R], vocabulary: &Vocabulary) -> Result<EncodedMatrix, PreprocessingError>
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let n_columns = vocabulary.n_columns();
    for (row_idx, row) in rows.iter().enumerate() {
        let len = row.as_ref().len();
        if len != n_columns {
            return Err(PreprocessingError::schema_mismatch(
                format!("row {}", row_idx),
                n_columns,
                len,
            ));
        }
    }

    let shape = (rows.len(), vocabulary.total_width());
    let mut values = Array2::<f32>::zeros(shape);
    let mut existence = Array2::<f32>::zeros(shape);
    let mut unmatched = 0usize;

    for (r, row) in rows.iter().enumerate() {
        for (col, answer) in row.as_ref().iter().enumerate() {
            let answer = answer.as_ref();
            if answer == vocabulary.missing_marker() {
                continue;
            }
            let Some(local) = vocabulary.local_index(col, answer) else {
                unmatched += 1;
                continue;
            };
            let block = vocabulary.block_unchecked(col);
            existence.slice_mut(s![r, block.start..block.end]).fill(1.0);
            values[[r, block.start + local]] = 1.0;
        }
    }

    debug!(
        rows = rows.len(),
        width = shape.1,
        unmatched,
        "encoded rows"
    );
    Ok(EncodedMatrix { existence, values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::encoding::build_vocabulary;

    fn survey() -> Vocabulary {
        // col 0: yes, no    col 1: red, blue, green    col 2: (nothing)
        build_vocabulary(
            &[
                ["yes", "red", "NA"],
                ["no", "blue", "NA"],
                ["yes", "green", "NA"],
            ],
            1,
        )
        .unwrap()
    }

    #[test]
    fn test_encode_shape() {
        let vocabulary = survey();
        let encoded = encode(&[["yes", "red", "NA"], ["no", "blue", "NA"]], &vocabulary).unwrap();

        assert_eq!(encoded.values.dim(), (2, 5));
        assert_eq!(encoded.existence.dim(), (2, 5));
        assert_eq!(encoded.n_rows(), 2);
        assert_eq!(encoded.width(), 5);
    }

    #[test]
    fn test_encode_retained_answers() {
        let vocabulary = survey();
        let encoded = encode(&[["no", "green", "NA"]], &vocabulary).unwrap();

        assert_eq!(encoded.values.row(0).to_vec(), vec![0.0, 1.0, 0.0, 0.0, 1.0]);
        assert_eq!(encoded.existence.row(0).to_vec(), vec![1.0; 5]);
    }

    #[test]
    fn test_encode_missing_answer_zeroes_block() {
        let vocabulary = survey();
        let encoded = encode(&[["NA", "blue", "NA"]], &vocabulary).unwrap();

        assert_eq!(encoded.values.row(0).to_vec(), vec![0.0, 0.0, 0.0, 1.0, 0.0]);
        assert_eq!(encoded.existence.row(0).to_vec(), vec![0.0, 0.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_encode_unseen_answer_zeroes_block() {
        let vocabulary = survey();
        let encoded = encode(&[["maybe", "purple", "anything"]], &vocabulary).unwrap();

        assert!(encoded.values.iter().all(|&v| v == 0.0));
        assert!(encoded.existence.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_encode_filtered_answer_zeroes_block() {
        let vocabulary = build_vocabulary(&[["X", "A"], ["X", "A"], ["X", "B"]], 2).unwrap();
        let encoded = encode(&[["X", "B"]], &vocabulary).unwrap();

        assert_eq!(encoded.values.row(0).to_vec(), vec![1.0, 0.0]);
        assert_eq!(encoded.existence.row(0).to_vec(), vec![1.0, 0.0]);
    }

    #[test]
    fn test_encode_one_slot_per_retained_block() {
        let vocabulary = survey();
        let encoded = encode(
            &[["yes", "blue", "NA"], ["no", "NA", "x"], ["NA", "NA", "NA"]],
            &vocabulary,
        )
        .unwrap();

        let row_sums: Vec<f32> = encoded.values.rows().into_iter().map(|r| r.sum()).collect();
        assert_eq!(row_sums, vec![2.0, 1.0, 0.0]);
    }

    #[test]
    fn test_encode_empty_rows() {
        let vocabulary = survey();
        let rows: Vec<Vec<String>> = Vec::new();
        let encoded = encode(&rows, &vocabulary).unwrap();
        assert_eq!(encoded.values.dim(), (0, 5));
        assert_eq!(encoded.existence.dim(), (0, 5));
    }

    #[test]
    fn test_encode_schema_mismatch() {
        let vocabulary = survey();
        let result = encode(&[vec!["yes", "red"]], &vocabulary);
        assert!(matches!(
            result,
            Err(PreprocessingError::SchemaMismatch {
                expected: 3,
                got: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_encode_checks_every_row_before_output() {
        let vocabulary = survey();
        let rows = vec![vec!["yes", "red", "NA"], vec!["no"]];
        assert!(encode(&rows, &vocabulary).is_err());
    }

    #[test]
    fn test_into_parts_order() {
        let vocabulary = survey();
        let encoded = encode(&[["NA", "red", "NA"]], &vocabulary).unwrap();
        let (existence, values) = encoded.into_parts();
        assert_eq!(existence.row(0).to_vec(), vec![0.0, 0.0, 1.0, 1.0, 1.0]);
        assert_eq!(values.row(0).to_vec(), vec![0.0, 0.0, 1.0, 0.0, 0.0]);
    }
}
