//! Training-set description consumed by [`crate::model::train_from_config`].
use super::{config_dir, read_json, resolve};
use crate::cells::SegmenterParams;
use crate::classifier::ClassifierParams;
use crate::error::Result;
use crate::locator::LocatorParams;
use crate::model::TrainingParams;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Single-cell image with its label; 0 marks an empty cell.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SampleEntry {
    pub image: PathBuf,
    pub label: u8,
}

/// Full puzzle photo with its 81-character layout.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PuzzleEntry {
    pub image: PathBuf,
    pub grid: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrainingConfig {
    #[serde(default)]
    pub samples: Vec<SampleEntry>,
    #[serde(default)]
    pub puzzles: Vec<PuzzleEntry>,
    #[serde(default)]
    pub params: TrainingParams,
    #[serde(default)]
    pub locator: LocatorParams,
    #[serde(default)]
    pub segmenter: SegmenterParams,
    #[serde(default)]
    pub classifier: ClassifierParams,
    /// Where the fitted model is written.
    pub output: PathBuf,
}

pub fn load_training_config(path: &Path) -> Result<TrainingConfig> {
    let mut config: TrainingConfig = read_json(path)?;
    let base = config_dir(path);
    for s in config.samples.iter_mut() {
        s.image = resolve(&base, &s.image);
    }
    for p in config.puzzles.iter_mut() {
        p.image = resolve(&base, &p.image);
    }
    config.output = resolve(&base, &config.output);
    Ok(config)
}
