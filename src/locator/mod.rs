//! Grid locator: find the sudoku outline in a photograph and rectify it.
//!
//! Pipeline
//! 1. Pyramid down to the working resolution (`max_working_side`).
//! 2. Gaussian blur, then adaptive local-mean threshold → ink mask.
//! 3. 8-connected ink regions large enough to hold a grid.
//! 4. Per region: convex hull → quadrilateral → grid checks
//!    (area, squareness, hull fit, ink density, Sobel edge support).
//! 5. Accepted quadrilaterals, largest first, are lifted to full resolution
//!    and warped onto a `rectified_side²` square. The first one whose inside
//!    shows the interior 9×9 lines is the grid.
//!
//! Failure to accept any region yields [`SudokuError::GridNotFound`], which
//! callers can tell apart from decode failures and retry on.

pub mod candidates;
pub mod inner;
pub mod params;
pub mod quad;

pub use candidates::{CandidateReport, Rejection};
pub use inner::{inner_grid_evidence, InnerGridEvidence};
pub use params::LocatorParams;
pub use quad::{Quadrilateral, RectifiedGrid};

use crate::contour::label_components;
use crate::diagnostics::TimingBreakdown;
use crate::edges::sobel_gradients;
use crate::error::{Result, SudokuError};
use crate::homography::{homography_from_points, warp_perspective};
use crate::image::ImageU8;
use crate::pyramid::{blur, build_pyramid, levels_for_budget, LevelScaling, PyramidOptions, GAUSSIAN_5TAP};
use crate::threshold::adaptive_mean_threshold;
use log::debug;
use nalgebra::Matrix3;
use std::time::Instant;

/// Located and rectified grid.
#[derive(Clone, Debug)]
pub struct LocatedGrid {
    /// Grid outline in full-resolution image coordinates.
    pub quad: Quadrilateral,
    /// Maps rectified pixel coordinates to image coordinates.
    pub homography: Matrix3<f32>,
    pub grid: RectifiedGrid,
    pub working_level: usize,
    pub candidates: Vec<CandidateReport>,
    pub timings: TimingBreakdown,
}

pub struct GridLocator {
    params: LocatorParams,
}

impl GridLocator {
    pub fn new(params: LocatorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &LocatorParams {
        &self.params
    }

    pub fn locate(&self, gray: ImageU8<'_>) -> Result<LocatedGrid> {
        let side = self.params.rectified_side;
        if side == 0 || side % 9 != 0 {
            return Err(SudokuError::Segmentation(format!(
                "configured rectified side {side} is not a positive multiple of 9"
            )));
        }
        let t0 = Instant::now();
        let mut timings = TimingBreakdown::default();
        let (full_w, full_h) = (gray.w, gray.h);

        let levels = levels_for_budget(full_w, full_h, self.params.max_working_side);
        let pyr = build_pyramid(gray, PyramidOptions::new(levels));
        timings.push("pyramid", pyr.convert_ms + pyr.build_ms);
        let pyramid = pyr.pyramid;
        let level_idx = pyramid.finest_within(self.params.max_working_side);
        let working = &pyramid.levels[level_idx];
        let scaling = LevelScaling::from_dimensions(working.w, working.h, full_w, full_h);
        debug!(
            "GridLocator::locate input={}x{} working_level={} ({}x{})",
            full_w, full_h, level_idx, working.w, working.h
        );

        let stage = Instant::now();
        let smoothed = blur(working, &GAUSSIAN_5TAP);
        let mask = adaptive_mean_threshold(
            &smoothed,
            self.params.threshold_radius,
            self.params.threshold_offset,
        );
        timings.push("threshold", elapsed_ms(stage));

        let stage = Instant::now();
        let image_area = (working.w * working.h) as f32;
        let min_extent = (image_area * self.params.min_area_fraction).sqrt() * 0.5;
        let grad = sobel_gradients(&smoothed);
        let mut candidates: Vec<CandidateReport> = label_components(&mask, 16)
            .into_iter()
            .filter(|c| c.bbox_width() as f32 >= min_extent && c.bbox_height() as f32 >= min_extent)
            .map(|c| candidates::evaluate_component(&c, &grad, image_area, &self.params))
            .collect();
        candidates.sort_by(|a, b| b.area.partial_cmp(&a.area).unwrap_or(std::cmp::Ordering::Equal));
        timings.push("contours", elapsed_ms(stage));
        debug!(
            "GridLocator::locate candidates={} accepted={}",
            candidates.len(),
            candidates.iter().filter(|c| c.accepted()).count()
        );

        let stage = Instant::now();
        let last = (side - 1) as f32;
        let square = [[0.0, 0.0], [last, 0.0], [last, last], [0.0, last]];
        let mut found = None;
        for candidate in candidates.iter_mut().filter(|c| c.accepted()) {
            let Some(working_quad) = candidate.quad else {
                continue;
            };
            let quad = working_quad.map(|p| scaling.to_full(p));
            let Some(homography) = homography_from_points(&square, &quad.corners) else {
                candidate.rejection = Some(Rejection::Degenerate);
                continue;
            };
            let rectified = warp_perspective(pyramid.base(), &homography, side, side, 1.0);
            let evidence = inner_grid_evidence(&rectified, &self.params);
            if !evidence.is_grid(&self.params) {
                debug!(
                    "GridLocator::locate area={:.0} rejected: {evidence:?}",
                    candidate.area
                );
                candidate.rejection = Some(Rejection::NoInnerGrid {
                    lines_found: evidence.lines_found(),
                });
                continue;
            }
            found = Some((quad, homography, rectified));
            break;
        }
        timings.push("rectify", elapsed_ms(stage));

        let Some((quad, homography, rectified)) = found else {
            return Err(not_found(&candidates));
        };
        timings.total_ms = elapsed_ms(t0);

        Ok(LocatedGrid {
            quad,
            homography,
            grid: RectifiedGrid::new(rectified)?,
            working_level: level_idx,
            candidates,
            timings,
        })
    }
}

impl Default for GridLocator {
    fn default() -> Self {
        Self::new(LocatorParams::default())
    }
}

fn not_found(candidates: &[CandidateReport]) -> SudokuError {
    let reason = candidates
        .first()
        .and_then(|c| c.rejection.as_ref())
        .map(|r| format!("largest candidate rejected: {r}"))
        .unwrap_or_else(|| "no ink region large enough to hold a grid".to_string());
    debug!("GridLocator::locate failed: {reason}");
    SudokuError::GridNotFound {
        candidates: candidates.len(),
        reason,
    }
}

fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn framed_grid(size: usize, margin: usize) -> Vec<u8> {
        let mut img = vec![230u8; size * size];
        let span = size - 2 * margin;
        for k in 0..=9 {
            let pos = margin + k * (span - 1) / 9;
            let thick = if k % 3 == 0 { 3 } else { 1 };
            for t in 0..thick {
                let p = (pos + t).min(size - 1);
                for i in margin..margin + span {
                    img[p * size + i] = 20;
                    img[i * size + p] = 20;
                }
            }
        }
        img
    }

    #[test]
    fn finds_axis_aligned_grid() {
        let size = 300;
        let data = framed_grid(size, 40);
        let view = ImageU8 {
            w: size,
            h: size,
            stride: size,
            data: &data,
        };
        let located = GridLocator::default().locate(view).expect("grid");
        let tl = located.quad.corners[0];
        let br = located.quad.corners[2];
        assert!((tl[0] - 40.0).abs() < 3.0 && (tl[1] - 40.0).abs() < 3.0, "{tl:?}");
        assert!((br[0] - 261.0).abs() < 3.0 && (br[1] - 261.0).abs() < 3.0, "{br:?}");
        assert_eq!(located.grid.side(), 252);
    }

    fn outlined_table(size: usize, margin: usize, divisions: usize) -> Vec<u8> {
        let mut img = vec![230u8; size * size];
        let span = size - 2 * margin;
        for k in 0..=divisions {
            let pos = margin + k * (span - 3) / divisions;
            for t in 0..3 {
                for i in margin..margin + span {
                    img[(pos + t) * size + i] = 20;
                    img[i * size + pos + t] = 20;
                }
            }
        }
        img
    }

    fn locate_table(divisions: usize) -> SudokuError {
        let size = 300;
        let data = outlined_table(size, 40, divisions);
        let view = ImageU8 {
            w: size,
            h: size,
            stride: size,
            data: &data,
        };
        GridLocator::default().locate(view).unwrap_err()
    }

    #[test]
    fn empty_frame_is_grid_not_found() {
        let err = locate_table(1);
        assert_eq!(err.kind(), ErrorKind::GridNotFound);
        assert!(err.to_string().contains("interior grid lines"), "{err}");
    }

    #[test]
    fn four_by_four_table_is_grid_not_found() {
        let err = locate_table(4);
        assert_eq!(err.kind(), ErrorKind::GridNotFound);
        assert!(err.to_string().contains("interior grid lines"), "{err}");
    }

    #[test]
    fn outer_frame_around_a_grid_falls_through_to_the_grid() {
        let size = 400;
        let mut data = vec![230u8; size * size];
        // Picture frame near the border, sudoku inside it.
        for t in 0..4 {
            for i in 10..size - 10 {
                for p in [10 + t, size - 11 - t] {
                    data[p * size + i] = 20;
                    data[i * size + p] = 20;
                }
            }
        }
        let inner = framed_grid(300, 40);
        for y in 0..300 {
            for x in 0..300 {
                data[(y + 50) * size + x + 50] = inner[y * 300 + x];
            }
        }
        let view = ImageU8 {
            w: size,
            h: size,
            stride: size,
            data: &data,
        };
        let located = GridLocator::default().locate(view).expect("grid inside frame");
        let tl = located.quad.corners[0];
        assert!((tl[0] - 90.0).abs() < 3.0 && (tl[1] - 90.0).abs() < 3.0, "{tl:?}");
        assert!(located
            .candidates
            .iter()
            .any(|c| matches!(c.rejection, Some(Rejection::NoInnerGrid { .. }))));
    }

    #[test]
    fn blank_page_is_grid_not_found() {
        let data = vec![240u8; 200 * 150];
        let view = ImageU8 {
            w: 200,
            h: 150,
            stride: 200,
            data: &data,
        };
        let err = GridLocator::default().locate(view).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GridNotFound);
    }

    #[test]
    fn solid_block_is_rejected_as_too_dense() {
        let size = 200;
        let mut data = vec![240u8; size * size];
        for y in 40..160 {
            for x in 40..160 {
                data[y * size + x] = 10;
            }
        }
        let view = ImageU8 {
            w: size,
            h: size,
            stride: size,
            data: &data,
        };
        // A 120px block with a 7px threshold window only keeps its rim as ink,
        // so widen the window until the interior counts too.
        let params = LocatorParams {
            threshold_radius: 90,
            ..Default::default()
        };
        let err = GridLocator::new(params).locate(view).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GridNotFound);
    }
}
