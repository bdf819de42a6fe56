use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use survey_encoding::MISSING_MARKER;

fn default_vocabulary() -> PathBuf {
    PathBuf::from("vocabulary.bin")
}

/// Settings driving the `build` command.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BuildSettings {
    /// Minimum number of occurrences for an answer to get a slot.
    #[serde(default = "BuildSettings::default_cutoff")]
    pub cutoff: usize,
    /// Marker for an unanswered question.
    #[serde(default = "BuildSettings::default_missing_marker")]
    pub missing_marker: String,
    /// Where the built vocabulary is written.
    #[serde(default = "default_vocabulary")]
    pub output: PathBuf,
}

impl BuildSettings {
    fn default_cutoff() -> usize {
        3
    }

    fn default_missing_marker() -> String {
        MISSING_MARKER.to_string()
    }
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            cutoff: Self::default_cutoff(),
            missing_marker: Self::default_missing_marker(),
            output: default_vocabulary(),
        }
    }
}

/// Settings powering the `encode` command.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EncodeSettings {
    /// Vocabulary produced by `build`.
    #[serde(default = "default_vocabulary")]
    pub vocabulary: PathBuf,
    /// Destination of the multi-hot values matrix.
    #[serde(default = "EncodeSettings::default_values")]
    pub values: PathBuf,
    /// Destination of the existence mask.
    #[serde(default = "EncodeSettings::default_existence")]
    pub existence: PathBuf,
}

impl EncodeSettings {
    fn default_values() -> PathBuf {
        PathBuf::from("encoded_values.csv")
    }

    fn default_existence() -> PathBuf {
        PathBuf::from("encoded_existence.csv")
    }
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            vocabulary: default_vocabulary(),
            values: Self::default_values(),
            existence: Self::default_existence(),
        }
    }
}

/// Settings consumed by the `decode` command.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DecodeSettings {
    /// Vocabulary produced by `build`.
    #[serde(default = "default_vocabulary")]
    pub vocabulary: PathBuf,
    /// Destination of the decoded answers.
    #[serde(default = "DecodeSettings::default_output")]
    pub output: PathBuf,
}

impl DecodeSettings {
    fn default_output() -> PathBuf {
        PathBuf::from("decoded.csv")
    }
}

impl Default for DecodeSettings {
    fn default() -> Self {
        Self {
            vocabulary: default_vocabulary(),
            output: Self::default_output(),
        }
    }
}

/// Loads TOML settings for the requested command, falling back to defaults when missing.
///
/// Without an explicit path, `<command>.toml` in the working directory is used
/// if it exists.
pub fn load_settings<T>(command: &str, explicit: Option<PathBuf>) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let (candidate, explicit_provided) = match explicit {
        Some(path) => (path, true),
        None => (PathBuf::from(format!("{command}.toml")), false),
    };

    if candidate.exists() {
        let raw = std::fs::read_to_string(&candidate).with_context(|| {
            format!(
                "failed to read configuration for `{command}` from {}",
                candidate.display()
            )
        })?;
        let parsed = toml::from_str(&raw).with_context(|| {
            format!(
                "failed to parse TOML configuration for `{command}` at {}",
                candidate.display()
            )
        })?;
        Ok(parsed)
    } else if explicit_provided {
        bail!(
            "configuration file for `{command}` not found at {}",
            candidate.display()
        );
    } else {
        Ok(T::default())
    }
}
