//! # survey-encoding
//!
//! Multi-hot encoding of categorical survey answers for downstream modeling,
//! and arg-max decoding of model outputs back to answers.
//!
//! ## Core Design Principles
//!
//! - **Fit once, then read-only**: a [`Vocabulary`] is built from a training
//!   corpus and never mutated afterwards. Encoding and decoding borrow it, so
//!   one vocabulary can serve many threads.
//! - **Reproducible layout**: answers kept by the frequency cutoff get local
//!   indices in first-encounter order. Rebuilding from the same rows yields
//!   the same layout and byte-identical serialized parameters.
//! - **Explicit missingness**: every encode returns an `existence` mask next
//!   to the `values` matrix, so "not answered / not in vocabulary" stays
//!   distinguishable from "answered with the first option".
//!
//! ## Quick Start
//!
//! ```rust
//! use survey_encoding::preprocessing::{build_vocabulary, decode, encode};
//!
//! let training = [["X", "A"], ["X", "A"], ["X", "B"]];
//! let vocabulary = build_vocabulary(&training, 2).unwrap();
//!
//! let encoded = encode(&[["X", "B"]], &vocabulary).unwrap();
//! assert_eq!(encoded.values.row(0).to_vec(), vec![1.0, 0.0]);
//! assert_eq!(encoded.existence.row(0).to_vec(), vec![1.0, 0.0]);
//!
//! let decoded = decode(encoded.values.view(), &vocabulary).unwrap();
//! assert_eq!(decoded[0], vec!["X", "A"]);
//! ```
//!
//! ## Module Structure
//!
//! - `preprocessing`: vocabulary building, encode, decode, column slicing
//! - `dataset`: Latin-1 CSV ingestion and CSV export of matrices and answers
//! - `serialization`: byte-level persistence of fitted parameters
//! - `text`: n-gram tokenization for free-text answers

/// Delimited-file ingestion and export.
pub mod dataset;

/// Vocabulary construction, encoding and decoding.
pub mod preprocessing;

/// Persistence of fitted parameters.
pub mod serialization;

/// Free-text tokenization helpers.
pub mod text;

pub use preprocessing::{
    build_vocabulary, column_slice, decode, decode_masked, encode, EncodedMatrix,
    FittedTransformer, PreprocessingError, Row, Transformer, Vocabulary, VocabularyBuilder,
    MISSING_MARKER,
};
