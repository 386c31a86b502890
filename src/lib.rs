#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod cells;
pub mod classifier;
pub mod error;
pub mod locator;
pub mod model;
pub mod parser;
pub mod puzzle;

// Building blocks – public for tools and tests, but considered internals.
pub mod config;
pub mod contour;
pub mod diagnostics;
pub mod edges;
pub mod homography;
pub mod image;
pub mod pyramid;
pub mod synthetic;
pub mod threshold;

// --- High-level re-exports -------------------------------------------------

pub use crate::error::{ErrorKind, Result, SudokuError};
pub use crate::model::{train_from_config, ModelSource, ModelStore, TrainingOutcome};
pub use crate::parser::{ParseReport, ParserParams, SudokuParser};
pub use crate::puzzle::{GridLayout, PuzzleGrid, RenderOptions};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use sudoku_parser::prelude::*;
/// use std::sync::Arc;
///
/// # fn main() -> Result<(), SudokuError> {
/// let store = Arc::new(ModelStore::new(ModelSource::default_cache()));
/// let parser = SudokuParser::new(store);
/// let grid = parser.parse_file(std::path::Path::new("puzzle.jpg"))?;
/// println!("{grid}");
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::ImageU8;
    pub use crate::{
        GridLayout, ModelSource, ModelStore, PuzzleGrid, RenderOptions, SudokuError,
        SudokuParser,
    };
}
