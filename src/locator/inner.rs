//! Interior line evidence on a rectified candidate.
//!
//! A sudoku has eight evenly spaced interior lines in each direction. Along
//! each nominal position `k·(S−1)/9` every sample compares the darkest pixel
//! within a narrow band of the line with the brightest pixel within half a
//! cell. The line is present when most samples show a dark stroke and the
//! line is clearly darker than the cell centres on either side of it, which
//! keeps text blocks and tables with a different pitch out.
use super::params::LocatorParams;
use crate::image::ImageF32;
use serde::Serialize;

const INNER_LINES: usize = 8;

/// Interior lines found in each direction (at most 8 each).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InnerGridEvidence {
    pub vertical: usize,
    pub horizontal: usize,
}

impl InnerGridEvidence {
    pub fn lines_found(&self) -> usize {
        self.vertical + self.horizontal
    }

    pub fn is_grid(&self, params: &LocatorParams) -> bool {
        self.lines_found() >= params.min_inner_lines
    }
}

/// Count the interior 9×9 lines visible in a square rectified image.
pub fn inner_grid_evidence(img: &ImageF32, params: &LocatorParams) -> InnerGridEvidence {
    let side = img.w.min(img.h);
    if side < 9 {
        return InnerGridEvidence::default();
    }
    let pitch = (side - 1) as f32 / 9.0;
    let count = |px: &dyn Fn(usize, usize) -> f32| {
        (1..=INNER_LINES)
            .filter(|&k| line_present(side, k as f32 * pitch, pitch, params, px))
            .count()
    };
    InnerGridEvidence {
        vertical: count(&|along, across| img.get(across, along)),
        horizontal: count(&|along, across| img.get(along, across)),
    }
}

fn line_present(
    side: usize,
    pos: f32,
    pitch: f32,
    params: &LocatorParams,
    px: &dyn Fn(usize, usize) -> f32,
) -> bool {
    let tol = (pitch * params.inner_line_tolerance).round().max(1.0) as usize;
    let reach = (pitch * 0.5).round() as usize;
    let coverage = stroke_coverage(side, pos, tol, reach, params.inner_line_contrast, px);
    if coverage < params.min_inner_line_coverage {
        return false;
    }
    let control = 0.5
        * (stroke_coverage(side, pos - 0.5 * pitch, tol, reach, params.inner_line_contrast, px)
            + stroke_coverage(side, pos + 0.5 * pitch, tol, reach, params.inner_line_contrast, px));
    coverage - control >= params.min_inner_line_margin
}

/// Share of samples across the grid with a dark stroke within `tol` of `pos`.
/// `px(along, across)` reads the image with `across` perpendicular to the line.
fn stroke_coverage(
    side: usize,
    pos: f32,
    tol: usize,
    reach: usize,
    contrast: f32,
    px: &dyn Fn(usize, usize) -> f32,
) -> f32 {
    let last = side - 1;
    let centre = (pos.round().max(0.0) as usize).min(last);
    let band = centre.saturating_sub(tol)..=(centre + tol).min(last);
    let window = centre.saturating_sub(reach)..=(centre + reach).min(last);
    let hits = (0..side)
        .filter(|&along| {
            let dark = band.clone().map(|a| px(along, a)).fold(f32::INFINITY, f32::min);
            let paper = window
                .clone()
                .map(|a| px(along, a))
                .fold(f32::NEG_INFINITY, f32::max);
            paper - dark >= contrast
        })
        .count();
    hits as f32 / side as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIDE: usize = 252;

    fn lines_at(positions: &[usize], thick: usize) -> ImageF32 {
        let mut img = ImageF32::filled(SIDE, SIDE, 0.9);
        for &p in positions {
            for t in 0..thick {
                let q = (p + t).min(SIDE - 1);
                for i in 0..SIDE {
                    img.set(q, i, 0.1);
                    img.set(i, q, 0.1);
                }
            }
        }
        img
    }

    fn sudoku_lines() -> ImageF32 {
        let positions: Vec<usize> = (0..=9).map(|k| k * (SIDE - 1) / 9).collect();
        lines_at(&positions, 1)
    }

    #[test]
    fn nine_by_nine_grid_shows_every_interior_line() {
        let evidence = inner_grid_evidence(&sudoku_lines(), &LocatorParams::default());
        assert_eq!(evidence, InnerGridEvidence { vertical: 8, horizontal: 8 });
        assert!(evidence.is_grid(&LocatorParams::default()));
    }

    #[test]
    fn empty_frame_has_no_interior_lines() {
        let evidence = inner_grid_evidence(&lines_at(&[0, SIDE - 3], 3), &LocatorParams::default());
        assert_eq!(evidence.lines_found(), 0);
    }

    #[test]
    fn four_by_four_table_is_not_a_sudoku() {
        let positions: Vec<usize> = (0..=4).map(|k| k * (SIDE - 2) / 4).collect();
        let evidence = inner_grid_evidence(&lines_at(&positions, 2), &LocatorParams::default());
        assert!(!evidence.is_grid(&LocatorParams::default()), "{evidence:?}");
    }

    #[test]
    fn dense_hatching_is_not_a_sudoku() {
        // Vertical strokes every 4 px darken every band equally.
        let mut img = ImageF32::filled(SIDE, SIDE, 0.9);
        for x in (0..SIDE).step_by(4) {
            for y in 0..SIDE {
                img.set(x, y, 0.1);
            }
        }
        let evidence = inner_grid_evidence(&img, &LocatorParams::default());
        assert_eq!(evidence.vertical, 0);
        assert!(!evidence.is_grid(&LocatorParams::default()));
    }

    #[test]
    fn lighting_gradient_does_not_create_lines() {
        let mut img = ImageF32::new(SIDE, SIDE);
        for y in 0..SIDE {
            for x in 0..SIDE {
                img.set(x, y, 0.2 + 0.7 * x as f32 / SIDE as f32);
            }
        }
        assert_eq!(inner_grid_evidence(&img, &LocatorParams::default()).lines_found(), 0);
    }
}
