//! Free-text helpers for open-ended survey answers.
//!
//! Independent of the categorical encoder: nothing here reads or produces a
//! [`Vocabulary`](crate::preprocessing::Vocabulary).

mod ngrams;

pub use ngrams::{generate_ngrams, tokenize};
