//! Parameters for the grid locator.
//!
//! Defaults target phone photographs of printed puzzles: the grid usually
//! covers a good share of the frame and lighting is uneven. For tuning, start
//! with the threshold radius/offset and `min_area_fraction`.
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorParams {
    /// Longer side of the pyramid level used for thresholding and contours.
    pub max_working_side: usize,
    /// Radius of the local-mean window of the adaptive threshold (working px).
    pub threshold_radius: usize,
    /// A pixel is ink when darker than its local mean by more than this.
    pub threshold_offset: f32,
    /// Minimum candidate area as a fraction of the working image area.
    pub min_area_fraction: f32,
    /// Maximum ratio between the longest and shortest quad side.
    pub max_aspect_ratio: f32,
    /// Minimum share of the region's convex hull covered by the quad.
    pub min_hull_coverage: f32,
    /// Maximum ink pixels per unit quad area; filled blobs are not grids.
    pub max_ink_density: f32,
    /// Minimum fraction of border samples with a strong gradient nearby.
    pub min_edge_support: f32,
    /// Sobel magnitude counted as an edge when measuring border support.
    pub edge_magnitude: f32,
    /// Side of the rectified grid image; must be a multiple of 9.
    pub rectified_side: usize,
    /// Half-width of the band searched for an interior line, as a fraction of
    /// the cell side.
    pub inner_line_tolerance: f32,
    /// Paper-to-stroke difference that counts as a line sample.
    pub inner_line_contrast: f32,
    /// Share of samples along an interior line that must show a stroke.
    pub min_inner_line_coverage: f32,
    /// How much more coverage a line needs than the cell centres beside it.
    pub min_inner_line_margin: f32,
    /// Interior lines (of 16) required to accept the candidate as a sudoku.
    pub min_inner_lines: usize,
}

impl Default for LocatorParams {
    fn default() -> Self {
        Self {
            max_working_side: 1024,
            threshold_radius: 7,
            threshold_offset: 0.02,
            min_area_fraction: 0.04,
            max_aspect_ratio: 1.6,
            min_hull_coverage: 0.85,
            max_ink_density: 0.6,
            min_edge_support: 0.5,
            edge_magnitude: 0.25,
            rectified_side: 252,
            inner_line_tolerance: 0.15,
            inner_line_contrast: 0.15,
            min_inner_line_coverage: 0.7,
            min_inner_line_margin: 0.25,
            min_inner_lines: 14,
        }
    }
}
