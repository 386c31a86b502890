//! Digit classifier: empty-cell test followed by a linear model query.
pub mod features;
pub mod ink;

pub use features::{extract_features, normalize_glyph, FEATURE_LEN};
pub use ink::{analyze_cell, EmptyReason, InkAnalysis, InkGlyph};

use crate::cells::Cell;
use crate::error::{Result, SudokuError};
use crate::model::Model;
use log::trace;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierParams {
    /// Quantile of the inner window taken as the paper level.
    pub background_percentile: f32,
    /// Minimum darkening below the paper level for a pixel to count as ink.
    pub ink_contrast: f32,
    /// Regions smaller than this are speckle.
    pub min_region_pixels: usize,
    /// A cell whose central region covers less of the window is empty.
    pub empty_ink_fraction: f32,
    /// A cell whose central region is shorter than this share of the window
    /// is empty.
    pub min_digit_height_fraction: f32,
    /// Predictions below this confidence are flagged.
    pub low_confidence_threshold: f32,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            background_percentile: 0.9,
            ink_contrast: 0.2,
            min_region_pixels: 2,
            empty_ink_fraction: 0.02,
            min_digit_height_fraction: 0.3,
            low_confidence_threshold: 0.4,
        }
    }
}

/// Classification result for one cell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Label {
    /// `None` for an empty cell, otherwise 1..=9.
    pub digit: Option<u8>,
    pub confidence: f32,
    pub low_confidence: bool,
}

impl Label {
    pub fn empty() -> Self {
        Self {
            digit: None,
            confidence: 1.0,
            low_confidence: false,
        }
    }

    pub fn digit(digit: u8, confidence: f32) -> Self {
        Self {
            digit: Some(digit),
            confidence,
            low_confidence: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.digit.is_none()
    }
}

pub struct DigitClassifier {
    params: ClassifierParams,
}

impl DigitClassifier {
    pub fn new(params: ClassifierParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ClassifierParams {
        &self.params
    }

    /// Run only the emptiness test.
    pub fn analyze(&self, cell: &Cell) -> InkAnalysis {
        analyze_cell(cell, &self.params)
    }

    pub fn classify(&self, cell: &Cell, model: &Model) -> Result<Label> {
        let glyph = match self.analyze(cell) {
            InkAnalysis::Glyph(glyph) => glyph,
            InkAnalysis::Empty(reason) => {
                trace!("cell ({}, {}) empty: {reason}", cell.row, cell.col);
                return Ok(Label::empty());
            }
        };
        let features = extract_features(&glyph);
        let prediction = model
            .predict(&features)
            .map_err(|reason| SudokuError::Classification {
                row: cell.row,
                col: cell.col,
                reason,
            })?;
        if !(1..=9).contains(&prediction.digit) {
            return Err(SudokuError::Classification {
                row: cell.row,
                col: cell.col,
                reason: format!("model predicted {} outside 1..=9", prediction.digit),
            });
        }
        let mut label = Label::digit(prediction.digit, prediction.confidence);
        label.low_confidence = prediction.confidence < self.params.low_confidence_threshold;
        trace!(
            "cell ({}, {}) -> {} (confidence {:.3})",
            cell.row,
            cell.col,
            prediction.digit,
            prediction.confidence
        );
        Ok(label)
    }
}

impl Default for DigitClassifier {
    fn default() -> Self {
        Self::new(ClassifierParams::default())
    }
}
