use ndarray::{s, ArrayView2};

use super::vocabulary::Vocabulary;
use crate::preprocessing::error::PreprocessingError;

/// Borrow the block of encoded columns owned by one schema column.
///
/// Works on either matrix returned by `encode`, or on any model output
/// with the same layout. A zero-width column yields an `(n_rows, 0)` view.
///
/// # Errors
/// - [`PreprocessingError::IndexOutOfRange`] if `column` is not a schema column
/// - [`PreprocessingError::SchemaMismatch`] if the matrix width differs from the
///   vocabulary's total width
pub fn column_slice<'a, A>(
    matrix: ArrayView2<'a, A>,
    vocabulary: &Vocabulary,
    column: usize,
) -> Result<ArrayView2<'a, A>, PreprocessingError> {
    let block = vocabulary.block(column)?;
    if matrix.ncols() != vocabulary.total_width() {
        return Err(PreprocessingError::schema_mismatch(
            "sliced matrix",
            vocabulary.total_width(),
            matrix.ncols(),
        ));
    }
    Ok(matrix.slice_move(s![.., block.start..block.end]))
}
