use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use survey_encoding::{Row, MISSING_MARKER};

/// Randomly generated survey used as benchmark input.
///
/// Each column draws from its own pool of `answers_per_column` answers with a
/// Zipf-like skew, so small cutoffs keep the head of the pool and drop the
/// tail. A fraction of cells is left unanswered.
#[derive(Debug, Clone)]
pub struct SyntheticSurvey {
    pub rows: Vec<Row>,
    pub n_columns: usize,
}

impl SyntheticSurvey {
    pub fn generate(
        n_rows: usize,
        n_columns: usize,
        answers_per_column: usize,
        missing_rate: f64,
        seed: u64,
    ) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let weights: Vec<f64> = (1..=answers_per_column.max(1))
            .map(|rank| 1.0 / rank as f64)
            .collect();
        let total: f64 = weights.iter().sum();

        let rows = (0..n_rows)
            .map(|_| {
                (0..n_columns)
                    .map(|col| {
                        if rng.gen_bool(missing_rate) {
                            return MISSING_MARKER.to_string();
                        }
                        let mut draw = rng.gen_range(0.0..total);
                        let mut pick = weights.len() - 1;
                        for (idx, w) in weights.iter().enumerate() {
                            if draw < *w {
                                pick = idx;
                                break;
                            }
                            draw -= w;
                        }
                        format!("q{col}_a{pick}")
                    })
                    .collect()
            })
            .collect();

        Self { rows, n_columns }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Random scores in `[0, 1)`, shaped like model output for `width` features.
    pub fn random_scores(n_rows: usize, width: usize, seed: u64) -> Array2<f32> {
        let mut rng = StdRng::seed_from_u64(seed);
        Array2::from_shape_fn((n_rows, width), |_| rng.gen::<f32>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_seeded() {
        let a = SyntheticSurvey::generate(50, 4, 10, 0.1, 9);
        let b = SyntheticSurvey::generate(50, 4, 10, 0.1, 9);
        assert_eq!(a.rows, b.rows);
        assert_eq!(a.len(), 50);
        assert!(a.rows.iter().all(|row| row.len() == 4));
    }

    #[test]
    fn answers_stay_in_their_column_pool() {
        let survey = SyntheticSurvey::generate(100, 3, 5, 0.0, 1);
        for row in &survey.rows {
            for (col, answer) in row.iter().enumerate() {
                assert!(answer.starts_with(&format!("q{col}_a")));
            }
        }
    }
}
