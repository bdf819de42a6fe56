use benchmarks::{benchmark_with_warmup, time_fn, SyntheticSurvey};
use survey_encoding::{build_vocabulary, decode, decode_masked, encode};

const CUTOFF: usize = 3;

fn main() {
    println!("survey-encoding throughput report");
    println!("(criterion benches: cargo bench --package benchmarks)");
    println!();
    println!(
        "{:>8} {:>6} {:>6} {:>12} {:>12} {:>12} {:>12}",
        "rows", "cols", "width", "build ms", "encode ms", "decode ms", "rows/s enc"
    );

    for &(n_rows, n_columns) in &[(1_000, 10), (10_000, 20), (50_000, 40)] {
        let survey = SyntheticSurvey::generate(n_rows, n_columns, 25, 0.05, 42);

        let (vocabulary, build_time) = time_fn(|| build_vocabulary(&survey.rows, CUTOFF));
        let vocabulary = match vocabulary {
            Ok(v) => v,
            Err(err) => {
                eprintln!("build failed for {n_rows}x{n_columns}: {err}");
                continue;
            }
        };

        let (encoded, encode_stats) = benchmark_with_warmup(1, 5, || encode(&survey.rows, &vocabulary));
        let encoded = match encoded {
            Ok(e) => e,
            Err(err) => {
                eprintln!("encode failed for {n_rows}x{n_columns}: {err}");
                continue;
            }
        };
        let (_, decode_stats) =
            benchmark_with_warmup(1, 5, || decode(encoded.values.view(), &vocabulary));

        println!(
            "{:>8} {:>6} {:>6} {:>12.2} {:>12.2} {:>12.2} {:>12.0}",
            n_rows,
            n_columns,
            vocabulary.total_width(),
            build_time.as_secs_f64() * 1000.0,
            encode_stats.mean_ms,
            decode_stats.mean_ms,
            encode_stats.rows_per_sec(n_rows),
        );

        let (_, masked) = time_fn(|| {
            decode_masked(encoded.values.view(), encoded.existence.view(), &vocabulary)
        });
        println!("{:>8} masked decode: {:.2} ms", "", masked.as_secs_f64() * 1000.0);
    }
}
