use std::time::{Duration, Instant};

/// Run a function and measure its execution time.
pub fn time_fn<F, R>(f: F) -> (R, Duration)
where
    F: FnOnce() -> R,
{
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}

/// Run `f` `warmup` times unmeasured, then `iterations` times measured.
///
/// Returns the last result together with the timing statistics.
pub fn benchmark_with_warmup<F, R>(warmup: usize, iterations: usize, mut f: F) -> (R, BenchmarkStats)
where
    F: FnMut() -> R,
{
    for _ in 0..warmup {
        let _ = f();
    }

    let (mut last, first) = time_fn(&mut f);
    let mut times = Vec::with_capacity(iterations.max(1));
    times.push(first.as_secs_f64() * 1000.0);
    for _ in 1..iterations {
        let (result, elapsed) = time_fn(&mut f);
        last = result;
        times.push(elapsed.as_secs_f64() * 1000.0);
    }

    (last, BenchmarkStats::from_times(times))
}

/// Timing summary in milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkStats {
    pub mean_ms: f64,
    pub std_dev_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
}

impl BenchmarkStats {
    pub fn from_times(mut times: Vec<f64>) -> Self {
        if times.is_empty() {
            return Self {
                mean_ms: 0.0,
                std_dev_ms: 0.0,
                min_ms: 0.0,
                max_ms: 0.0,
                median_ms: 0.0,
                p95_ms: 0.0,
            };
        }
        times.sort_by(f64::total_cmp);

        let n = times.len();
        let mean = times.iter().sum::<f64>() / n as f64;
        let variance = times.iter().map(|&t| (t - mean).powi(2)).sum::<f64>() / n as f64;
        let median = if n % 2 == 0 {
            (times[n / 2 - 1] + times[n / 2]) / 2.0
        } else {
            times[n / 2]
        };
        let p95 = times[((n as f64 * 0.95) as usize).min(n - 1)];

        Self {
            mean_ms: mean,
            std_dev_ms: variance.sqrt(),
            min_ms: times[0],
            max_ms: times[n - 1],
            median_ms: median,
            p95_ms: p95,
        }
    }

    /// Rows processed per second at the mean time.
    pub fn rows_per_sec(&self, n_rows: usize) -> f64 {
        if self.mean_ms == 0.0 {
            return f64::INFINITY;
        }
        n_rows as f64 / (self.mean_ms / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_from_known_times() {
        let stats = BenchmarkStats::from_times(vec![4.0, 1.0, 3.0, 2.0]);
        assert_eq!(stats.min_ms, 1.0);
        assert_eq!(stats.max_ms, 4.0);
        assert_eq!(stats.mean_ms, 2.5);
        assert_eq!(stats.median_ms, 2.5);
        assert_eq!(stats.p95_ms, 4.0);
    }

    #[test]
    fn empty_times_give_zeros() {
        let stats = BenchmarkStats::from_times(Vec::new());
        assert_eq!(stats.mean_ms, 0.0);
        assert!(stats.rows_per_sec(10).is_infinite());
    }

    #[test]
    fn warmup_runs_are_not_measured() {
        let mut calls = 0;
        let (last, _) = benchmark_with_warmup(2, 3, || {
            calls += 1;
            calls
        });
        assert_eq!(last, 5);
    }
}
