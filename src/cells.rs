//! Cell segmenter: split a rectified grid into its 81 cells.
use crate::error::{Result, SudokuError};
use crate::image::ImageF32;
use crate::locator::RectifiedGrid;
use serde::{Deserialize, Serialize};

pub const GRID_SIZE: usize = 9;
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterParams {
    /// Margin ignored on each side of a cell, as a fraction of the cell side.
    /// Keeps grid-line remnants out of the emptiness test and the features.
    pub inset_fraction: f32,
}

impl Default for SegmenterParams {
    fn default() -> Self {
        Self {
            inset_fraction: 0.14,
        }
    }
}

/// One of the 81 fixed-position sub-images of a rectified grid.
#[derive(Clone, Debug)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    /// Full cell image, `side × side`.
    pub image: ImageF32,
    /// Margin in pixels excluded on every side when looking for ink.
    pub inset: usize,
}

impl Cell {
    /// Wrap a standalone cell image (training samples, tests).
    pub fn from_image(image: ImageF32, inset_fraction: f32) -> Self {
        let inset = inset_pixels(image.w.min(image.h), inset_fraction);
        Self {
            row: 0,
            col: 0,
            image,
            inset,
        }
    }

    pub fn side(&self) -> usize {
        self.image.w
    }

    /// Inner window `(x0, y0, w, h)` left after removing the inset margin.
    pub fn inner_window(&self) -> (usize, usize, usize, usize) {
        let w = self.image.w.saturating_sub(2 * self.inset);
        let h = self.image.h.saturating_sub(2 * self.inset);
        (self.inset, self.inset, w, h)
    }
}

fn inset_pixels(side: usize, fraction: f32) -> usize {
    let inset = (side as f32 * fraction.clamp(0.0, 0.45)).round() as usize;
    // Always leave at least a 1×1 window.
    inset.min(side.saturating_sub(1) / 2)
}

pub struct CellSegmenter {
    params: SegmenterParams,
}

impl CellSegmenter {
    pub fn new(params: SegmenterParams) -> Self {
        Self { params }
    }

    /// Split the grid into 81 equal cells in row-major order.
    pub fn segment(&self, grid: &RectifiedGrid) -> Result<Vec<Cell>> {
        let image = grid.image();
        if image.w != image.h || image.w == 0 || image.w % GRID_SIZE != 0 {
            return Err(SudokuError::Segmentation(format!(
                "rectified grid {}x{} cannot be split into {GRID_SIZE}x{GRID_SIZE} equal cells",
                image.w, image.h
            )));
        }
        let side = grid.cell_side();
        let inset = inset_pixels(side, self.params.inset_fraction);
        let mut cells = Vec::with_capacity(CELL_COUNT);
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                cells.push(Cell {
                    row,
                    col,
                    image: image.crop(col * side, row * side, side, side),
                    inset,
                });
            }
        }
        Ok(cells)
    }
}

impl Default for CellSegmenter {
    fn default() -> Self {
        Self::new(SegmenterParams::default())
    }
}
