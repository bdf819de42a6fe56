//! Core traits for preprocessing transformers.
//!
//! This module defines the two central traits:
//! - [`Transformer`]: Used during fitting; has hyperparameters and can learn from data.
//! - [`FittedTransformer`]: After fitting; ready for inference and serialization.

use std::path::Path;

use tracing::info;

use crate::preprocessing::error::PreprocessingError;
use crate::serialization::SerializableParams;

/// Trait for unfitted transformers with hyperparameters.
///
/// A transformer learns parameters from training data and can then transform
/// new data using those learned parameters. This trait represents the
/// configurable, unfitted state.
///
/// # Example
/// ```
/// use survey_encoding::preprocessing::{FittedTransformer, Transformer, VocabularyBuilder};
///
/// let rows = vec![
///     vec!["yes".to_string(), "red".to_string()],
///     vec!["no".to_string(), "red".to_string()],
/// ];
/// let vocabulary = VocabularyBuilder::new(1).fit(&rows[..]).unwrap();
/// let encoded = vocabulary.transform(&rows[..]).unwrap();
/// assert_eq!(encoded.values.dim(), (2, 3));
/// ```
pub trait Transformer: Clone {
    /// Input data type consumed by `fit` and `transform`.
    type Input: ?Sized;
    /// Output data type after transformation.
    type Output;
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;
    /// The fitted transformer type ready for inference.
    type Fitted: FittedTransformer<Params = Self::Params, Input = Self::Input, Output = Self::Output>;

    /// Fit the transformer to the training data.
    ///
    /// # Errors
    /// Returns [`PreprocessingError`] if the data is empty, ragged, or the
    /// hyperparameters are invalid.
    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError>;

    /// Fit the transformer and transform the same data in one step.
    fn fit_transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        let fitted = self.fit(data)?;
        fitted.transform(data)
    }
}

/// Trait for fitted transformers ready for inference.
///
/// # Guarantees
/// - `extract_params()` + `from_params()` is a round-trip.
/// - `save_to_file` / `load_from_file` go through [`SerializableParams`], so a
///   file written on one platform loads on any other.
pub trait FittedTransformer: Sized {
    /// Input data type for transformation.
    type Input: ?Sized;
    /// Output data type after transformation.
    type Output;
    /// Result of reversing a transformation.
    type Inverse;
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;

    /// Transform data using learned parameters.
    ///
    /// # Errors
    /// Returns [`PreprocessingError`] if the input shape doesn't match the
    /// number of features seen during fit.
    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError>;

    /// Reverse the transformation.
    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Inverse, PreprocessingError>;

    /// Extract learned parameters as a serializable representation.
    fn extract_params(&self) -> Self::Params;

    /// Reconstruct a fitted transformer from parameters.
    ///
    /// Implementations must reject parameters that violate their invariants
    /// rather than produce a transformer that misbehaves later.
    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError>;

    /// Serialize the learned parameters to bytes.
    fn to_bytes(&self) -> Result<Vec<u8>, PreprocessingError> {
        self.extract_params()
            .to_bytes()
            .map_err(|e| PreprocessingError::SerializationError(e.to_string()))
    }

    /// Rebuild a fitted transformer from bytes produced by [`to_bytes`](Self::to_bytes).
    fn from_bytes(bytes: &[u8]) -> Result<Self, PreprocessingError> {
        let params = Self::Params::from_bytes(bytes)
            .map_err(|e| PreprocessingError::SerializationError(e.to_string()))?;
        Self::from_params(params)
    }

    /// Save the fitted transformer to a file.
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PreprocessingError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!(path = %path.as_ref().display(), bytes = bytes.len(), "saved fitted parameters");
        Ok(())
    }

    /// Load a fitted transformer from a file.
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, PreprocessingError> {
        let bytes = std::fs::read(path.as_ref())?;
        info!(path = %path.as_ref().display(), bytes = bytes.len(), "loaded fitted parameters");
        Self::from_bytes(&bytes)
    }

    /// Returns the number of input columns seen during fit.
    fn n_features_in(&self) -> usize;
}
