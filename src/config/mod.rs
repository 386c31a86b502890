//! JSON configuration for the command-line tools.
//!
//! Relative paths inside a config file resolve against the directory that
//! holds the file, so configs can travel with their images.
pub mod parse;
pub mod training;

pub use parse::{load_parse_config, ParseConfig, ParseOutputConfig};
pub use training::{load_training_config, PuzzleEntry, SampleEntry, TrainingConfig};

use crate::error::{Result, SudokuError};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path).map_err(|source| SudokuError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|e| SudokuError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn config_dir(path: &Path) -> PathBuf {
    path.parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

pub(crate) fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
