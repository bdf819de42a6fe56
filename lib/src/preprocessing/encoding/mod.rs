//! Categorical answer encoding.
//!
//! Survey answers arrive as strings, one per question, with `"NA"` marking a
//! question that was not answered. This module turns such rows into a
//! fixed-width multi-hot layout and back:
//!
//! ```text
//! // vocabulary (cutoff = 1) built from [["yes", "red"], ["no", "blue"]]
//! //   column 0 -> block [yes, no]      column 1 -> block [red, blue]
//! // encode ["no", "NA"]
//! //   values    = [0, 1, 0, 0]
//! //   existence = [1, 1, 0, 0]
//! // decode [0, 1, 0, 0] -> ["no", "red"]
//! ```
//!
//! # Pieces
//!
//! - [`VocabularyBuilder`] / [`build_vocabulary`]: count answers and keep those
//!   seen at least `cutoff` times
//! - [`encode`]: rows to an [`EncodedMatrix`] (`values` + `existence`)
//! - [`decode`] / [`decode_masked`]: per-block arg-max back to answers
//! - [`column_slice`]: one question's block of any encoded matrix
//!
//! Every function takes the [`Vocabulary`] explicitly; there is no process-wide
//! "current" vocabulary.

mod decode;
mod encode;
mod slice;
mod vocabulary;

pub use decode::{decode, decode_masked};
pub use encode::{encode, EncodedMatrix};
pub use slice::column_slice;
pub use vocabulary::{build_vocabulary, Vocabulary, VocabularyBuilder, VocabularyParams};

/// Marker for an unanswered question.
pub const MISSING_MARKER: &str = "NA";

/// One respondent's answers, one string per question.
pub type Row = Vec<String>;
