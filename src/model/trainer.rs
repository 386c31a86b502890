//! Model fitting: standardization plus one-vs-rest linear SVMs trained with
//! stochastic subgradient descent on the L2-regularized hinge loss.
//!
//! Every class is fitted independently with its own seeded RNG, so the
//! rayon fan-out over classes does not affect the result: the same samples
//! and parameters always produce the same model bytes.
use super::svm::{dot, Model, MODEL_VERSION};
use crate::cells::{Cell, CellSegmenter};
use crate::classifier::{extract_features, DigitClassifier, InkAnalysis, FEATURE_LEN};
use crate::config::{load_training_config, TrainingConfig};
use crate::error::{Result, SudokuError};
use crate::image::io::load_grayscale_image;
use crate::locator::GridLocator;
use crate::puzzle::PuzzleGrid;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingParams {
    pub epochs: usize,
    pub learning_rate: f32,
    /// L2 regularization strength.
    pub lambda: f32,
    pub seed: u64,
    /// Weight positives and negatives so both halves of each one-vs-rest
    /// problem carry equal total weight.
    pub balance_classes: bool,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            epochs: 40,
            learning_rate: 0.1,
            lambda: 1e-3,
            seed: 42,
            balance_classes: true,
        }
    }
}

/// Labelled feature vector.
#[derive(Clone, Debug)]
pub struct TrainingSample {
    pub features: Vec<f32>,
    pub label: u8,
}

/// Samples collected from cells, with the bookkeeping the trainer reports.
#[derive(Clone, Debug, Default)]
pub struct TrainingSet {
    pub samples: Vec<TrainingSample>,
    /// Digit cells the emptiness test rejected.
    pub skipped: usize,
    /// Cells labelled empty where the emptiness test found a glyph.
    pub empty_disagreements: usize,
}

impl TrainingSet {
    /// Add one labelled cell. Label 0 marks an empty cell: it contributes no
    /// sample and only audits the emptiness test.
    pub fn add_cell(&mut self, cell: &Cell, label: u8, classifier: &DigitClassifier) -> Result<()> {
        if label > 9 {
            return Err(SudokuError::TrainingData(format!(
                "label {label} is outside 0..=9"
            )));
        }
        match (label, classifier.analyze(cell)) {
            (0, InkAnalysis::Empty(_)) => {}
            (0, InkAnalysis::Glyph(g)) => {
                self.empty_disagreements += 1;
                warn!(
                    "cell ({}, {}) labelled empty but holds ink (fraction {:.3})",
                    cell.row, cell.col, g.ink_fraction
                );
            }
            (digit, InkAnalysis::Empty(reason)) => {
                self.skipped += 1;
                warn!(
                    "cell ({}, {}) labelled {digit} judged empty ({reason}); skipped",
                    cell.row, cell.col
                );
            }
            (digit, InkAnalysis::Glyph(glyph)) => self.samples.push(TrainingSample {
                features: extract_features(&glyph),
                label: digit,
            }),
        }
        Ok(())
    }

    pub fn class_counts(&self) -> BTreeMap<u8, usize> {
        let mut counts = BTreeMap::new();
        for s in &self.samples {
            *counts.entry(s.label).or_insert(0) += 1;
        }
        counts
    }
}

pub struct Trainer {
    params: TrainingParams,
}

impl Trainer {
    pub fn new(params: TrainingParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &TrainingParams {
        &self.params
    }

    pub fn fit(&self, samples: &[TrainingSample]) -> Result<Model> {
        if samples.is_empty() {
            return Err(SudokuError::TrainingData("no usable digit samples".into()));
        }
        if let Some(bad) = samples.iter().find(|s| !(1..=9).contains(&s.label)) {
            return Err(SudokuError::TrainingData(format!(
                "sample label {} is not a digit 1..=9",
                bad.label
            )));
        }
        if let Some(bad) = samples.iter().find(|s| s.features.len() != FEATURE_LEN) {
            return Err(SudokuError::TrainingData(format!(
                "sample has {} features, expected {FEATURE_LEN}",
                bad.features.len()
            )));
        }
        let mut classes: Vec<u8> = samples.iter().map(|s| s.label).collect();
        classes.sort_unstable();
        classes.dedup();
        if classes.len() < 2 {
            return Err(SudokuError::TrainingData(format!(
                "need at least two digit classes, found {classes:?}"
            )));
        }

        let (mean, inv_std) = feature_statistics(samples);
        let standardized: Vec<Vec<f32>> = samples
            .iter()
            .map(|s| {
                s.features
                    .iter()
                    .zip(mean.iter().zip(&inv_std))
                    .map(|(&x, (&m, &k))| (x - m) * k)
                    .collect()
            })
            .collect();
        let labels: Vec<u8> = samples.iter().map(|s| s.label).collect();

        let fitted: Vec<(Vec<f32>, f32)> = classes
            .par_iter()
            .map(|&class| self.fit_binary(&standardized, &labels, class))
            .collect();
        let (weights, bias): (Vec<Vec<f32>>, Vec<f32>) = fitted.into_iter().unzip();

        let model = Model {
            version: MODEL_VERSION,
            feature_len: FEATURE_LEN,
            classes,
            mean,
            inv_std,
            weights,
            bias,
            params: self.params.clone(),
        };
        model
            .validate()
            .map_err(|reason| SudokuError::TrainingData(format!("training diverged: {reason}")))?;
        Ok(model)
    }

    fn fit_binary(&self, x: &[Vec<f32>], labels: &[u8], class: u8) -> (Vec<f32>, f32) {
        let p = &self.params;
        let n = x.len();
        let positives = labels.iter().filter(|&&l| l == class).count();
        let negatives = n - positives;
        let (w_pos, w_neg) = if p.balance_classes && positives > 0 && negatives > 0 {
            (
                n as f32 / (2.0 * positives as f32),
                n as f32 / (2.0 * negatives as f32),
            )
        } else {
            (1.0, 1.0)
        };

        let mut rng = StdRng::seed_from_u64(p.seed.wrapping_add(class as u64));
        let mut order: Vec<usize> = (0..n).collect();
        let mut w = vec![0.0f32; FEATURE_LEN];
        let mut b = 0.0f32;
        let mut t = 0u64;
        for _ in 0..p.epochs {
            order.shuffle(&mut rng);
            for &i in &order {
                t += 1;
                let eta = p.learning_rate / (1.0 + p.learning_rate * p.lambda * t as f32);
                let (y, weight) = if labels[i] == class {
                    (1.0, w_pos)
                } else {
                    (-1.0, w_neg)
                };
                let margin = y * (dot(&w, &x[i]) + b);
                let shrink = 1.0 - eta * p.lambda;
                w.iter_mut().for_each(|v| *v *= shrink);
                if margin < 1.0 {
                    let step = eta * weight * y;
                    w.iter_mut().zip(&x[i]).for_each(|(v, &xi)| *v += step * xi);
                    b += step;
                }
            }
        }
        debug!("Trainer: class {class} fitted ({positives} positives, {t} updates)");
        (w, b)
    }
}

impl Default for Trainer {
    fn default() -> Self {
        Self::new(TrainingParams::default())
    }
}

fn feature_statistics(samples: &[TrainingSample]) -> (Vec<f32>, Vec<f32>) {
    let n = samples.len() as f64;
    let mut sum = vec![0.0f64; FEATURE_LEN];
    let mut sum_sq = vec![0.0f64; FEATURE_LEN];
    for s in samples {
        for (j, &v) in s.features.iter().enumerate() {
            sum[j] += v as f64;
            sum_sq[j] += (v as f64) * (v as f64);
        }
    }
    let mut mean = Vec::with_capacity(FEATURE_LEN);
    let mut inv_std = Vec::with_capacity(FEATURE_LEN);
    for j in 0..FEATURE_LEN {
        let m = sum[j] / n;
        let var = (sum_sq[j] / n - m * m).max(0.0);
        let std = var.sqrt();
        mean.push(m as f32);
        inv_std.push(if std > 1e-6 { (1.0 / std) as f32 } else { 0.0 });
    }
    (mean, inv_std)
}

/// Share of samples the model labels correctly.
pub fn training_accuracy(model: &Model, samples: &[TrainingSample]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let correct = samples
        .iter()
        .filter(|s| matches!(model.predict(&s.features), Ok(p) if p.digit == s.label))
        .count();
    correct as f32 / samples.len() as f32
}

/// Summary of a training run.
#[derive(Clone, Debug, Serialize)]
pub struct TrainingOutcome {
    pub model_path: PathBuf,
    pub samples_used: usize,
    pub samples_skipped: usize,
    pub class_counts: BTreeMap<u8, usize>,
    pub training_accuracy: f32,
    pub empty_disagreements: usize,
}

/// Read a training configuration, fit a model and write it to the
/// configured output path.
pub fn train_from_config(path: &Path) -> Result<TrainingOutcome> {
    let config = load_training_config(path)?;
    train_with_config(&config)
}

/// Same as [`train_from_config`] for an already loaded configuration whose
/// paths are absolute or relative to the working directory.
pub fn train_with_config(config: &TrainingConfig) -> Result<TrainingOutcome> {
    if config.samples.is_empty() && config.puzzles.is_empty() {
        return Err(SudokuError::TrainingData(
            "training config lists no samples or puzzles".into(),
        ));
    }
    let classifier = DigitClassifier::new(config.classifier.clone());
    let mut set = TrainingSet::default();

    for entry in &config.samples {
        let gray = load_grayscale_image(&entry.image)?;
        let cell = Cell::from_image(gray.as_view().to_f32(), config.segmenter.inset_fraction);
        set.add_cell(&cell, entry.label, &classifier)?;
    }

    let locator = GridLocator::new(config.locator.clone());
    let segmenter = CellSegmenter::new(config.segmenter.clone());
    for entry in &config.puzzles {
        let expected: PuzzleGrid = entry.grid.parse().map_err(|e| {
            SudokuError::TrainingData(format!("puzzle {}: {e}", entry.image.display()))
        })?;
        let gray = load_grayscale_image(&entry.image)?;
        let located = locator.locate(gray.as_view())?;
        for cell in segmenter.segment(&located.grid)? {
            let label = expected.get(cell.row, cell.col).digit.unwrap_or(0);
            set.add_cell(&cell, label, &classifier)?;
        }
        debug!("Trainer: collected cells from {}", entry.image.display());
    }

    let trainer = Trainer::new(config.params.clone());
    let model = trainer.fit(&set.samples)?;
    let accuracy = training_accuracy(&model, &set.samples);

    if let Some(parent) = config.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| SudokuError::storage(parent, e))?;
    }
    fs::write(&config.output, model.to_json_bytes()?)
        .map_err(|e| SudokuError::storage(&config.output, e))?;

    let outcome = TrainingOutcome {
        model_path: config.output.clone(),
        samples_used: set.samples.len(),
        samples_skipped: set.skipped,
        class_counts: set.class_counts(),
        training_accuracy: accuracy,
        empty_disagreements: set.empty_disagreements,
    };
    info!(
        "Trainer: wrote {} ({} samples, {} skipped, accuracy {:.3})",
        outcome.model_path.display(),
        outcome.samples_used,
        outcome.samples_skipped,
        outcome.training_accuracy
    );
    Ok(outcome)
}
