use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use ndarray::Array2;
use survey_encoding::dataset::{read_matrix, write_matrix, write_rows, SurveyTable};
use survey_encoding::text::generate_ngrams;
use survey_encoding::{FittedTransformer, Vocabulary, VocabularyBuilder};
use tracing::{info, warn};

use crate::config::{BuildSettings, DecodeSettings, EncodeSettings};

pub fn run_build(input: &Path, settings: &BuildSettings) -> Result<()> {
    info!(?settings, "build configuration");
    let table = SurveyTable::from_path(input)
        .with_context(|| format!("failed to read survey from {}", input.display()))?;

    let vocabulary = VocabularyBuilder::new(settings.cutoff)
        .with_missing_marker(settings.missing_marker.as_str())
        .with_column_names(table.headers().iter().cloned())
        .build(table.rows())
        .context("failed to build vocabulary")?;

    let empty: Vec<&str> = (0..vocabulary.n_columns())
        .filter(|&col| vocabulary.column_widths()[col] == 0)
        .map(|col| table.headers()[col].as_str())
        .collect();
    if !empty.is_empty() {
        warn!(columns = ?empty, "no answer met the cutoff; these columns always decode as missing");
    }

    ensure_parent(&settings.output)?;
    vocabulary
        .save_to_file(&settings.output)
        .with_context(|| format!("failed to write vocabulary to {}", settings.output.display()))?;
    println!(
        "Vocabulary with {} encoded columns written to {}",
        vocabulary.total_width(),
        settings.output.display()
    );
    Ok(())
}

pub fn run_inspect(vocabulary_path: &Path, json: bool) -> Result<()> {
    let vocabulary = load_vocabulary(vocabulary_path)?;
    if json {
        println!("{}", vocabulary.to_json()?);
    } else {
        print!("{}", render_summary(&vocabulary));
    }
    Ok(())
}

pub fn run_encode(input: &Path, settings: &EncodeSettings) -> Result<()> {
    let vocabulary = load_vocabulary(&settings.vocabulary)?;
    let table = SurveyTable::from_path(input)
        .with_context(|| format!("failed to read survey from {}", input.display()))?;

    let encoded = vocabulary
        .encode(table.rows())
        .context("failed to encode survey")?;
    let labels = vocabulary.feature_labels();

    for (path, matrix) in [
        (&settings.values, &encoded.values),
        (&settings.existence, &encoded.existence),
    ] {
        ensure_parent(path)?;
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        write_matrix(BufWriter::new(file), &labels, matrix.view())
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    info!(
        rows = encoded.n_rows(),
        width = encoded.width(),
        "encoded survey"
    );
    println!(
        "Encoded {} rows into {} and {}",
        encoded.n_rows(),
        settings.values.display(),
        settings.existence.display()
    );
    Ok(())
}

pub fn run_decode(input: &Path, existence: Option<&Path>, settings: &DecodeSettings) -> Result<()> {
    let vocabulary = load_vocabulary(&settings.vocabulary)?;
    let values = read_matrix_file(input)?;

    let rows = match existence {
        Some(mask_path) => {
            let mask = read_matrix_file(mask_path)?;
            vocabulary.decode_masked(values.view(), mask.view())
        }
        None => vocabulary.decode(values.view()),
    }
    .context("failed to decode matrix")?;

    ensure_parent(&settings.output)?;
    let file = File::create(&settings.output)
        .with_context(|| format!("failed to create {}", settings.output.display()))?;
    write_rows(BufWriter::new(file), vocabulary.column_names(), &rows)
        .with_context(|| format!("failed to write {}", settings.output.display()))?;
    println!(
        "Decoded {} rows into {}",
        rows.len(),
        settings.output.display()
    );
    Ok(())
}

pub fn run_ngrams(text: &str, n: usize) -> Result<()> {
    for ngram in generate_ngrams(text, n) {
        println!("{ngram}");
    }
    Ok(())
}

fn load_vocabulary(path: &Path) -> Result<Vocabulary> {
    Vocabulary::load_from_file(path)
        .with_context(|| format!("failed to load vocabulary from {}", path.display()))
}

fn read_matrix_file(path: &Path) -> Result<Array2<f32>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    read_matrix(file).with_context(|| format!("failed to parse matrix in {}", path.display()))
}

fn render_summary(vocabulary: &Vocabulary) -> String {
    let mut lines = vec![
        format!("Rows seen:      {}", vocabulary.row_count()),
        format!("Cutoff:         {}", vocabulary.cutoff()),
        format!("Missing marker: {}", vocabulary.missing_marker()),
        format!("Columns:        {}", vocabulary.n_columns()),
        format!("Encoded width:  {}", vocabulary.total_width()),
    ];
    for col in 0..vocabulary.n_columns() {
        let name = vocabulary
            .column_names()
            .map(|names| names[col].clone())
            .unwrap_or_else(|| format!("col{col}"));
        let answers = vocabulary.column_values(col).unwrap_or_default();
        lines.push(format!(
            "  [{col}] {name} ({}): {}",
            answers.len(),
            answers.join(", ")
        ));
    }
    lines.join("\n") + "\n"
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }
    Ok(())
}
