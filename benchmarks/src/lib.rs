//! Benchmark utilities for survey-encoding.
//!
//! - Synthetic survey generation with a controllable answer skew
//! - Timing helpers for the standalone throughput report

pub mod data;
pub mod utils;

pub use data::SyntheticSurvey;
pub use utils::{benchmark_with_warmup, time_fn, BenchmarkStats};
