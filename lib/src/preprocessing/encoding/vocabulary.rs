//! Frequency-filtered per-column vocabulary.
//!
//! A [`Vocabulary`] fixes the layout of the multi-hot representation: every
//! schema column owns a contiguous block of output columns, one per retained
//! answer, and blocks are laid out in schema order.

use std::collections::{BTreeMap, HashMap};
use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::encode::{encode, EncodedMatrix};
use super::decode::{decode, decode_masked};
use super::slice::column_slice;
use super::{Row, MISSING_MARKER};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};

/// Builds a [`Vocabulary`] from training rows.
///
/// Answers seen at least `cutoff` times in a column are retained. Within a
/// column, local indices follow the order in which answers are first
/// encountered scanning the rows top to bottom, so rebuilding from the same
/// rows always reproduces the same layout.
///
/// # Example
/// ```
/// use survey_encoding::preprocessing::VocabularyBuilder;
///
/// let rows = [["X", "A"], ["X", "A"], ["X", "B"]];
/// let vocabulary = VocabularyBuilder::new(2).build(&rows).unwrap();
///
/// assert_eq!(vocabulary.column_widths(), &[1, 1]);
/// assert_eq!(vocabulary.local_index(1, "A"), Some(0));
/// assert_eq!(vocabulary.local_index(1, "B"), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VocabularyBuilder {
    cutoff: usize,
    missing_marker: String,
    column_names: Option<Vec<String>>,
}

impl VocabularyBuilder {
    /// Create a builder that retains answers seen at least `cutoff` times.
    ///
    /// The cutoff is validated by [`build`](Self::build).
    pub fn new(cutoff: usize) -> Self {
        Self {
            cutoff,
            missing_marker: MISSING_MARKER.to_string(),
            column_names: None,
        }
    }

    /// Use a different missing-answer marker than `"NA"`.
    pub fn with_missing_marker(mut self, marker: impl Into<String>) -> Self {
        self.missing_marker = marker.into();
        self
    }

    /// Attach header names, one per column. Names are carried for
    /// diagnostics only and never influence the layout.
    pub fn with_column_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.column_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Minimum frequency for an answer to be retained.
    pub fn cutoff(&self) -> usize {
        self.cutoff
    }

    /// Count answers per column and assign local indices.
    ///
    /// # Errors
    /// - [`PreprocessingError::InvalidCutoff`] if `cutoff < 1`
    /// - [`PreprocessingError::EmptyData`] if there are no rows or no columns
    /// - [`PreprocessingError::SchemaMismatch`] if rows differ in length, or
    ///   attached column names don't match the row length
    pub fn build<R, S>(&self, rows: &[R]) -> Result<Vocabulary, PreprocessingError>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        if self.cutoff < 1 {
            return Err(PreprocessingError::InvalidCutoff(self.cutoff));
        }
        let first = rows.first().ok_or_else(|| {
            PreprocessingError::EmptyData("Cannot build a vocabulary from zero rows".to_string())
        })?;
        let n_columns = first.as_ref().len();
        if n_columns == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot build a vocabulary from rows with zero columns".to_string(),
            ));
        }
        if let Some(names) = &self.column_names {
            if names.len() != n_columns {
                return Err(PreprocessingError::schema_mismatch(
                    "column names",
                    n_columns,
                    names.len(),
                ));
            }
        }

        // Per column: answers in first-encounter order with their counts, plus
        // a lookup from answer to its slot in that list.
        let mut tallies: Vec<Vec<(&str, usize)>> = vec![Vec::new(); n_columns];
        let mut slots: Vec<HashMap<&str, usize>> = vec![HashMap::new(); n_columns];

        for (row_idx, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != n_columns {
                return Err(PreprocessingError::schema_mismatch(
                    format!("training row {}", row_idx),
                    n_columns,
                    row.len(),
                ));
            }
            for (col, answer) in row.iter().enumerate() {
                let answer = answer.as_ref();
                if answer == self.missing_marker {
                    continue;
                }
                let next = tallies[col].len();
                let slot = *slots[col].entry(answer).or_insert(next);
                if slot == next {
                    tallies[col].push((answer, 0));
                }
                tallies[col][slot].1 += 1;
            }
        }

        let mut global_values = Vec::new();
        let mut column_widths = Vec::with_capacity(n_columns);
        let mut value_to_local_index = Vec::with_capacity(n_columns);

        for (col, tally) in tallies.iter().enumerate() {
            let mut mapping = HashMap::new();
            for &(answer, count) in tally {
                if count >= self.cutoff {
                    mapping.insert(answer.to_string(), mapping.len());
                    global_values.push(answer.to_string());
                }
            }
            debug!(
                column = col,
                distinct = tally.len(),
                retained = mapping.len(),
                "column vocabulary"
            );
            column_widths.push(mapping.len());
            value_to_local_index.push(mapping);
        }

        let vocabulary = Vocabulary {
            cutoff: self.cutoff,
            missing_marker: self.missing_marker.clone(),
            column_names: self.column_names.clone(),
            column_offsets: offsets(&column_widths),
            column_widths,
            value_to_local_index,
            global_values,
            row_count: rows.len(),
        };
        info!(
            rows = vocabulary.row_count,
            columns = vocabulary.n_columns(),
            total_width = vocabulary.total_width(),
            cutoff = vocabulary.cutoff,
            "built vocabulary"
        );
        Ok(vocabulary)
    }
}

impl Default for VocabularyBuilder {
    /// Retains every answer seen at least once.
    fn default() -> Self {
        Self::new(1)
    }
}

/// Build a vocabulary with the default missing marker.
///
/// Shorthand for `VocabularyBuilder::new(cutoff).build(rows)`.
pub fn build_vocabulary<R, S>(rows: &[R], cutoff: usize) -> Result<Vocabulary, PreprocessingError>
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    VocabularyBuilder::new(cutoff).build(rows)
}

/// Immutable vocabulary state shared by encoding and decoding.
///
/// Once built (or loaded), a vocabulary is never mutated, so one instance can
/// serve any number of concurrent encode/decode calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vocabulary {
    cutoff: usize,
    missing_marker: String,
    column_names: Option<Vec<String>>,
    /// Retained answers per column.
    column_widths: Vec<usize>,
    /// Prefix sums of `column_widths`.
    column_offsets: Vec<usize>,
    value_to_local_index: Vec<HashMap<String, usize>>,
    /// Retained answers of every column, concatenated in block order.
    global_values: Vec<String>,
    row_count: usize,
}

impl Vocabulary {
    /// Minimum frequency the vocabulary was built with.
    pub fn cutoff(&self) -> usize {
        self.cutoff
    }

    /// Marker for a missing answer.
    pub fn missing_marker(&self) -> &str {
        &self.missing_marker
    }

    /// Header names, when the builder was given them.
    pub fn column_names(&self) -> Option<&[String]> {
        self.column_names.as_deref()
    }

    /// Number of schema columns.
    pub fn n_columns(&self) -> usize {
        self.column_widths.len()
    }

    /// Block width of each schema column.
    pub fn column_widths(&self) -> &[usize] {
        &self.column_widths
    }

    /// Width of the encoded representation (sum of all block widths).
    pub fn total_width(&self) -> usize {
        self.global_values.len()
    }

    /// Number of rows the vocabulary was built from.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Every retained answer, in encoded-column order.
    pub fn global_values(&self) -> &[String] {
        &self.global_values
    }

    /// Local index of `answer` within `column`'s block, if retained.
    pub fn local_index(&self, column: usize, answer: &str) -> Option<usize> {
        self.value_to_local_index
            .get(column)
            .and_then(|mapping| mapping.get(answer))
            .copied()
    }

    /// Whether `answer` has a slot in `column`'s block.
    pub fn is_retained(&self, column: usize, answer: &str) -> bool {
        self.local_index(column, answer).is_some()
    }

    /// Retained answers of one column in local-index order.
    pub fn column_values(&self, column: usize) -> Result<&[String], PreprocessingError> {
        let block = self.block(column)?;
        Ok(&self.global_values[block])
    }

    /// Range of encoded columns owned by `column`.
    pub fn block(&self, column: usize) -> Result<Range<usize>, PreprocessingError> {
        if column >= self.n_columns() {
            return Err(PreprocessingError::IndexOutOfRange {
                index: column,
                n_columns: self.n_columns(),
            });
        }
        Ok(self.block_unchecked(column))
    }

    pub(crate) fn block_unchecked(&self, column: usize) -> Range<usize> {
        let start = self.column_offsets[column];
        start..start + self.column_widths[column]
    }

    /// Encode rows against this vocabulary. See [`encode`].
    pub fn encode<R, S>(&self, rows: &[R]) -> Result<EncodedMatrix, PreprocessingError>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        encode(rows, self)
    }

    /// Decode a values matrix with this vocabulary. See [`decode`].
    pub fn decode(&self, values: ndarray::ArrayView2<'_, f32>) -> Result<Vec<Row>, PreprocessingError> {
        decode(values, self)
    }

    /// Mask-aware decode with this vocabulary. See [`decode_masked`].
    pub fn decode_masked(
        &self,
        values: ndarray::ArrayView2<'_, f32>,
        existence: ndarray::ArrayView2<'_, f32>,
    ) -> Result<Vec<Row>, PreprocessingError> {
        decode_masked(values, existence, self)
    }

    /// One column's block of an encoded matrix. See [`column_slice`].
    pub fn column_slice<'a, A>(
        &self,
        matrix: ndarray::ArrayView2<'a, A>,
        column: usize,
    ) -> Result<ndarray::ArrayView2<'a, A>, PreprocessingError> {
        column_slice(matrix, self, column)
    }

    /// A `question=answer` label for every encoded column.
    ///
    /// Columns without a header name are labelled by position (`col0`, ...).
    pub fn feature_labels(&self) -> Vec<String> {
        let mut labels = Vec::with_capacity(self.total_width());
        for col in 0..self.n_columns() {
            let question = match &self.column_names {
                Some(names) => names[col].clone(),
                None => format!("col{}", col),
            };
            for answer in &self.global_values[self.block_unchecked(col)] {
                labels.push(format!("{}={}", question, answer));
            }
        }
        labels
    }

    /// Serialize the vocabulary as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, PreprocessingError> {
        Ok(serde_json::to_string_pretty(&self.extract_params())?)
    }

    /// Load a vocabulary from JSON written by [`to_json`](Self::to_json).
    pub fn from_json(json: &str) -> Result<Self, PreprocessingError> {
        let params: VocabularyParams = serde_json::from_str(json)?;
        Self::from_params(params)
    }
}

fn offsets(widths: &[usize]) -> Vec<usize> {
    widths
        .iter()
        .scan(0usize, |acc, &width| {
            let start = *acc;
            *acc += width;
            Some(start)
        })
        .collect()
}

/// Serializable parameters for a fitted [`Vocabulary`].
///
/// Mappings are stored as `BTreeMap`s so the serialized bytes of a vocabulary
/// are identical across runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyParams {
    /// Minimum frequency used during the build.
    pub cutoff: usize,
    /// Marker for a missing answer.
    pub missing_marker: String,
    /// Optional header names.
    pub column_names: Option<Vec<String>>,
    /// Block width per column.
    pub column_widths: Vec<usize>,
    /// Answer to local index, per column.
    pub value_to_local_index: Vec<BTreeMap<String, usize>>,
    /// Retained answers in encoded-column order.
    pub global_values: Vec<String>,
    /// Number of training rows.
    pub row_count: usize,
}

impl VocabularyParams {
    fn validate(&self) -> Result<(), PreprocessingError> {
        let corrupt = |msg: String| Err(PreprocessingError::CorruptVocabulary(msg));

        if self.cutoff < 1 {
            return corrupt(format!("cutoff {} is below 1", self.cutoff));
        }
        let n_columns = self.column_widths.len();
        if n_columns == 0 {
            return corrupt("no columns".to_string());
        }
        if self.value_to_local_index.len() != n_columns {
            return corrupt(format!(
                "{} mappings for {} columns",
                self.value_to_local_index.len(),
                n_columns
            ));
        }
        if let Some(names) = &self.column_names {
            if names.len() != n_columns {
                return corrupt(format!("{} names for {} columns", names.len(), n_columns));
            }
        }
        let total: usize = self.column_widths.iter().sum();
        if total != self.global_values.len() {
            return corrupt(format!(
                "widths sum to {} but {} values are listed",
                total,
                self.global_values.len()
            ));
        }

        let mut offset = 0;
        for (col, (mapping, &width)) in self
            .value_to_local_index
            .iter()
            .zip(&self.column_widths)
            .enumerate()
        {
            if mapping.len() != width {
                return corrupt(format!(
                    "column {} has width {} but {} mapped answers",
                    col,
                    width,
                    mapping.len()
                ));
            }
            if mapping.contains_key(&self.missing_marker) {
                return corrupt(format!("column {} maps the missing marker", col));
            }
            for (answer, &local) in mapping {
                if local >= width || self.global_values[offset + local] != *answer {
                    return corrupt(format!(
                        "column {} maps {:?} to {} which disagrees with the value list",
                        col, answer, local
                    ));
                }
            }
            offset += width;
        }
        Ok(())
    }
}

impl Transformer for VocabularyBuilder {
    type Input = [Row];
    type Output = EncodedMatrix;
    type Params = VocabularyParams;
    type Fitted = Vocabulary;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        self.build(data)
    }
}

impl FittedTransformer for Vocabulary {
    type Input = [Row];
    type Output = EncodedMatrix;
    type Inverse = Vec<Row>;
    type Params = VocabularyParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        encode(data, self)
    }

    /// Arg-max decode of the `values` matrix; the existence mask is ignored.
    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Inverse, PreprocessingError> {
        decode(data.values.view(), self)
    }

    fn extract_params(&self) -> Self::Params {
        VocabularyParams {
            cutoff: self.cutoff,
            missing_marker: self.missing_marker.clone(),
            column_names: self.column_names.clone(),
            column_widths: self.column_widths.clone(),
            value_to_local_index: self
                .value_to_local_index
                .iter()
                .map(|mapping| mapping.iter().map(|(k, &v)| (k.clone(), v)).collect())
                .collect(),
            global_values: self.global_values.clone(),
            row_count: self.row_count,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        params.validate()?;
        info!(
            columns = params.column_widths.len(),
            total_width = params.global_values.len(),
            cutoff = params.cutoff,
            "restored vocabulary"
        );
        Ok(Vocabulary {
            cutoff: params.cutoff,
            missing_marker: params.missing_marker,
            column_names: params.column_names,
            column_offsets: offsets(&params.column_widths),
            column_widths: params.column_widths,
            value_to_local_index: params
                .value_to_local_index
                .into_iter()
                .map(|mapping| mapping.into_iter().collect())
                .collect(),
            global_values: params.global_values,
            row_count: params.row_count,
        })
    }

    fn n_features_in(&self) -> usize {
        self.n_columns()
    }
}
