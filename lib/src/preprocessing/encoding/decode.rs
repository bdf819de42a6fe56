//! Arg-max decoding back to categorical answers.

use ndarray::{s, ArrayView1, ArrayView2};

use super::vocabulary::Vocabulary;
use super::Row;
use crate::preprocessing::error::PreprocessingError;

/// Decode a `(n_rows, total_width)` matrix into one answer per column per row.
///
/// A zero-width column always decodes to the missing marker. Any other column
/// decodes to the answer at the arg-max of its block, with ties going to the
/// lowest index. The existence mask is not consulted, so an all-zero block
/// yields the answer at local index 0; use [`decode_masked`] when that case
/// must come back as missing.
///
/// # Errors
/// [`PreprocessingError::SchemaMismatch`] if the matrix width differs from the
/// vocabulary's total width.
///
/// # Example
/// ```
/// use ndarray::array;
/// use survey_encoding::preprocessing::{build_vocabulary, decode};
///
/// let vocabulary = build_vocabulary(&[["X", "A"], ["X", "A"], ["X", "B"]], 2).unwrap();
/// let rows = decode(array![[1.0f32, 0.0]].view(), &vocabulary).unwrap();
/// assert_eq!(rows, vec![vec!["X".to_string(), "A".to_string()]]);
/// ```
pub fn decode(values: ArrayView2<'_, f32>, vocabulary: &Vocabulary) -> Result<Vec<Row>, PreprocessingError> {
    check_width("values matrix", values.ncols(), vocabulary)?;

    Ok(values
        .rows()
        .into_iter()
        .map(|row| decode_row(row, None, vocabulary))
        .collect())
}

/// Like [`decode`], but a block whose existence entries are all zero decodes
/// to the missing marker instead of the local-index-0 answer.
///
/// # Errors
/// [`PreprocessingError::SchemaMismatch`] if either matrix has the wrong width
/// or the two matrices differ in row count.
pub fn decode_masked(
    values: ArrayView2<'_, f32>,
    existence: ArrayView2<'_, f32>,
    vocabulary: &Vocabulary,
) -> Result<Vec<Row>, PreprocessingError> {
    check_width("values matrix", values.ncols(), vocabulary)?;
    check_width("existence mask", existence.ncols(), vocabulary)?;
    if existence.nrows() != values.nrows() {
        return Err(PreprocessingError::schema_mismatch(
            "existence mask rows",
            values.nrows(),
            existence.nrows(),
        ));
    }

    Ok(values
        .rows()
        .into_iter()
        .zip(existence.rows())
        .map(|(row, mask)| decode_row(row, Some(mask), vocabulary))
        .collect())
}

fn check_width(context: &str, got: usize, vocabulary: &Vocabulary) -> Result<(), PreprocessingError> {
    if got != vocabulary.total_width() {
        return Err(PreprocessingError::schema_mismatch(
            context,
            vocabulary.total_width(),
            got,
        ));
    }
    Ok(())
}

fn decode_row(row: ArrayView1<'_, f32>, mask: Option<ArrayView1<'_, f32>>, vocabulary: &Vocabulary) -> Row {
    (0..vocabulary.n_columns())
        .map(|col| {
            let block = vocabulary.block_unchecked(col);
            if block.is_empty() {
                return vocabulary.missing_marker().to_string();
            }
            if let Some(mask) = &mask {
                if mask.slice(s![block.start..block.end]).iter().all(|&e| e == 0.0) {
                    return vocabulary.missing_marker().to_string();
                }
            }
            let local = arg_max(row.slice(s![block.start..block.end]));
            vocabulary.global_values()[block.start + local].clone()
        })
        .collect()
}

/// Index of the first maximum. NaN never beats a number.
fn arg_max(block: ArrayView1<'_, f32>) -> usize {
    let mut best = 0;
    let mut best_value = block[0];
    for (idx, &value) in block.iter().enumerate().skip(1) {
        if value > best_value || (best_value.is_nan() && !value.is_nan()) {
            best = idx;
            best_value = value;
        }
    }
    best
}
