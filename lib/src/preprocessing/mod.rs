//! Vocabulary construction, encoding and decoding for categorical survey data.
//!
//! The transformer traits follow a fit-then-use split:
//!
//! - [`Transformer`]: unfitted, carries hyperparameters ([`VocabularyBuilder`])
//! - [`FittedTransformer`]: learned state, immutable and serializable ([`Vocabulary`])
//!
//! # Example
//!
//! ```no_run
//! use survey_encoding::preprocessing::{FittedTransformer, Vocabulary, VocabularyBuilder};
//!
//! # fn main() -> Result<(), survey_encoding::preprocessing::PreprocessingError> {
//! # let training_rows: Vec<Vec<String>> = Vec::new();
//! let vocabulary = VocabularyBuilder::new(3).build(&training_rows)?;
//! vocabulary.save_to_file("vocabulary.bin")?;
//!
//! let loaded = Vocabulary::load_from_file("vocabulary.bin")?;
//! let encoded = loaded.encode(&training_rows)?;
//! let answers = loaded.decode(encoded.values.view())?;
//! # Ok(())
//! # }
//! ```

pub mod encoding;
pub mod error;
pub mod traits;

pub use encoding::{
    build_vocabulary, column_slice, decode, decode_masked, encode, EncodedMatrix, Row, Vocabulary,
    VocabularyBuilder, VocabularyParams, MISSING_MARKER,
};
pub use error::PreprocessingError;
pub use traits::{FittedTransformer, Transformer};
