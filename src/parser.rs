//! End-to-end entry point: bytes → located grid → 81 labels → puzzle text.
use crate::cells::{Cell, CellSegmenter, SegmenterParams};
use crate::classifier::{ClassifierParams, DigitClassifier, Label};
use crate::diagnostics::TimingBreakdown;
use crate::error::{Result, SudokuError};
use crate::image::io::decode_grayscale;
use crate::image::{ImageF32, ImageU8};
use crate::locator::{CandidateReport, GridLocator, LocatorParams, Quadrilateral};
use crate::model::ModelStore;
use crate::puzzle::PuzzleGrid;
use log::debug;
use nalgebra::Matrix3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserParams {
    pub locator: LocatorParams,
    pub segmenter: SegmenterParams,
    pub classifier: ClassifierParams,
}

/// Puzzle plus the geometry and timings that produced it.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseReport {
    pub grid: PuzzleGrid,
    pub labels: Vec<Label>,
    pub low_confidence_cells: Vec<(usize, usize)>,
    pub image_width: usize,
    pub image_height: usize,
    pub quad: Quadrilateral,
    /// Rectified pixel → image pixel.
    pub homography: Matrix3<f32>,
    pub working_level: usize,
    pub candidates: Vec<CandidateReport>,
    pub timings: TimingBreakdown,
    #[serde(skip)]
    pub rectified: ImageF32,
}

pub struct SudokuParser {
    locator: GridLocator,
    segmenter: CellSegmenter,
    classifier: DigitClassifier,
    store: Arc<ModelStore>,
}

impl SudokuParser {
    pub fn new(store: Arc<ModelStore>) -> Self {
        Self::with_params(store, ParserParams::default())
    }

    pub fn with_params(store: Arc<ModelStore>, params: ParserParams) -> Self {
        Self {
            locator: GridLocator::new(params.locator),
            segmenter: CellSegmenter::new(params.segmenter),
            classifier: DigitClassifier::new(params.classifier),
            store,
        }
    }

    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<PuzzleGrid> {
        self.parse_report(bytes).map(|r| r.grid)
    }

    pub fn parse_file(&self, path: &Path) -> Result<PuzzleGrid> {
        let bytes = fs::read(path).map_err(|source| SudokuError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_bytes(&bytes)
    }

    pub fn parse_report(&self, bytes: &[u8]) -> Result<ParseReport> {
        let t0 = Instant::now();
        let gray = decode_grayscale(bytes)?;
        let decode_ms = elapsed_ms(t0);
        let mut report = self.parse_gray(gray.as_view())?;
        report.timings.push("decode", decode_ms);
        report.timings.total_ms = elapsed_ms(t0);
        Ok(report)
    }

    /// Run the pipeline on an already decoded grayscale image.
    pub fn parse_gray(&self, gray: ImageU8<'_>) -> Result<ParseReport> {
        let t0 = Instant::now();
        let (image_width, image_height) = (gray.w, gray.h);
        let located = self.locator.locate(gray)?;
        let mut timings = TimingBreakdown::default();
        timings.extend_prefixed("locate", &located.timings);

        let stage = Instant::now();
        let cells = self.segmenter.segment(&located.grid)?;
        timings.push("segment", elapsed_ms(stage));

        let stage = Instant::now();
        let labels = self.classify_cells(&cells)?;
        timings.push("classify", elapsed_ms(stage));

        let grid = PuzzleGrid::from_labels(labels.clone())?;
        timings.total_ms = elapsed_ms(t0);
        debug!(
            "SudokuParser: {} clues, {} low-confidence, {:.1} ms",
            grid.clue_count(),
            grid.low_confidence_cells().len(),
            timings.total_ms
        );
        Ok(ParseReport {
            low_confidence_cells: grid.low_confidence_cells(),
            grid,
            labels,
            image_width,
            image_height,
            quad: located.quad,
            homography: located.homography,
            working_level: located.working_level,
            candidates: located.candidates,
            timings,
            rectified: located.grid.image().clone(),
        })
    }

    /// Classify the cells of one grid in parallel. The model is resolved once
    /// up front so the workers only share the immutable `Arc<Model>`.
    pub fn classify_cells(&self, cells: &[Cell]) -> Result<Vec<Label>> {
        let model = self.store.model()?;
        cells
            .par_iter()
            .map(|cell| self.classifier.classify(cell, &model))
            .collect()
    }

    pub fn classify_cell(&self, cell: &Cell) -> Result<Label> {
        let model = self.store.model()?;
        self.classifier.classify(cell, &model)
    }
}

fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::model::test_support::constant_model;

    fn parser() -> SudokuParser {
        SudokuParser::new(Arc::new(ModelStore::preloaded(constant_model(5))))
    }

    #[test]
    fn empty_buffer_is_decode_error() {
        let err = parser().parse_bytes(&[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(!err.is_retryable_with_preprocessing());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = parser().parse_file(&dir.path().join("nope.png")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn cells_classify_in_row_major_order() {
        let cells: Vec<Cell> = (0..81)
            .map(|i| {
                let mut cell = Cell::from_image(ImageF32::filled(28, 28, 0.9), 0.14);
                cell.row = i / 9;
                cell.col = i % 9;
                cell
            })
            .collect();
        let labels = parser().classify_cells(&cells).expect("labels");
        assert_eq!(labels.len(), 81);
        assert!(labels.iter().all(Label::is_empty));
    }
}
