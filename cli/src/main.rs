mod commands;
mod config;
mod telemetry;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::{load_settings, BuildSettings, DecodeSettings, EncodeSettings};

/// Build survey vocabularies, encode answers to multi-hot matrices and decode them back.
#[derive(Debug, Parser)]
#[command(name = "survey-encode", version, about)]
struct Cli {
    /// TOML settings for the chosen command (defaults to `<command>.toml` if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build a vocabulary from a training survey CSV
    Build {
        /// Survey CSV with a header row
        input: PathBuf,
        /// Minimum occurrences for an answer to be kept
        #[arg(long)]
        cutoff: Option<usize>,
        /// Where to write the vocabulary
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Marker for an unanswered question
        #[arg(long)]
        missing_marker: Option<String>,
    },
    /// Print a saved vocabulary
    Inspect {
        #[arg(long, default_value = "vocabulary.bin")]
        vocabulary: PathBuf,
        /// Dump the parameters as JSON
        #[arg(long)]
        json: bool,
    },
    /// Encode a survey CSV with a saved vocabulary
    Encode {
        input: PathBuf,
        #[arg(long)]
        vocabulary: Option<PathBuf>,
        /// Output CSV for the values matrix
        #[arg(long)]
        values: Option<PathBuf>,
        /// Output CSV for the existence mask
        #[arg(long)]
        existence: Option<PathBuf>,
    },
    /// Decode a values matrix CSV back to answers
    Decode {
        input: PathBuf,
        #[arg(long)]
        vocabulary: Option<PathBuf>,
        /// Existence mask; blocks masked out decode as the missing marker
        #[arg(long)]
        existence: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print word n-grams of a line of free text
    Ngrams {
        text: String,
        #[arg(short, default_value_t = 2)]
        n: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init_telemetry(cli.verbose);

    match cli.command {
        Command::Build {
            input,
            cutoff,
            output,
            missing_marker,
        } => {
            let mut settings: BuildSettings = load_settings("build", cli.config)?;
            if let Some(cutoff) = cutoff {
                settings.cutoff = cutoff;
            }
            if let Some(output) = output {
                settings.output = output;
            }
            if let Some(marker) = missing_marker {
                settings.missing_marker = marker;
            }
            commands::run_build(&input, &settings)
        }
        Command::Inspect { vocabulary, json } => commands::run_inspect(&vocabulary, json),
        Command::Encode {
            input,
            vocabulary,
            values,
            existence,
        } => {
            let mut settings: EncodeSettings = load_settings("encode", cli.config)?;
            if let Some(vocabulary) = vocabulary {
                settings.vocabulary = vocabulary;
            }
            if let Some(values) = values {
                settings.values = values;
            }
            if let Some(existence) = existence {
                settings.existence = existence;
            }
            commands::run_encode(&input, &settings)
        }
        Command::Decode {
            input,
            vocabulary,
            existence,
            output,
        } => {
            let mut settings: DecodeSettings = load_settings("decode", cli.config)?;
            if let Some(vocabulary) = vocabulary {
                settings.vocabulary = vocabulary;
            }
            if let Some(output) = output {
                settings.output = output;
            }
            commands::run_decode(&input, existence.as_deref(), &settings)
        }
        Command::Ngrams { text, n } => commands::run_ngrams(&text, n),
    }
}
