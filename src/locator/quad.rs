use crate::contour::{is_convex, polygon_area};
use crate::error::{Result, SudokuError};
use crate::image::ImageF32;
use serde::Serialize;

/// Four grid corners in image coordinates, ordered clockwise on screen
/// starting from the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Quadrilateral {
    pub corners: [[f32; 2]; 4],
}

impl Quadrilateral {
    /// Order four points clockwise (top-left first) and check that they form
    /// a convex, non-degenerate quadrilateral.
    pub fn from_points(points: [[f32; 2]; 4]) -> Option<Self> {
        let cx = points.iter().map(|p| p[0]).sum::<f32>() / 4.0;
        let cy = points.iter().map(|p| p[1]).sum::<f32>() / 4.0;
        let mut ordered = points;
        ordered.sort_by(|a, b| {
            let ta = (a[1] - cy).atan2(a[0] - cx);
            let tb = (b[1] - cy).atan2(b[0] - cx);
            ta.partial_cmp(&tb).unwrap_or(std::cmp::Ordering::Equal)
        });
        let start = (0..4)
            .min_by(|&i, &j| {
                let si = ordered[i][0] + ordered[i][1];
                let sj = ordered[j][0] + ordered[j][1];
                si.partial_cmp(&sj).unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(0);
        ordered.rotate_left(start);
        let quad = Self { corners: ordered };
        (is_convex(&quad.corners) && quad.area() > 0.0).then_some(quad)
    }

    pub fn area(&self) -> f32 {
        polygon_area(&self.corners)
    }

    pub fn side_lengths(&self) -> [f32; 4] {
        let c = &self.corners;
        let len = |a: [f32; 2], b: [f32; 2]| ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt();
        [
            len(c[0], c[1]),
            len(c[1], c[2]),
            len(c[2], c[3]),
            len(c[3], c[0]),
        ]
    }

    /// Longest side over shortest side (≥ 1, infinite for a zero-length side).
    pub fn aspect_ratio(&self) -> f32 {
        let sides = self.side_lengths();
        let max = sides.iter().cloned().fold(0.0f32, f32::max);
        let min = sides.iter().cloned().fold(f32::INFINITY, f32::min);
        if min <= 0.0 {
            f32::INFINITY
        } else {
            max / min
        }
    }

    pub fn map(&self, f: impl Fn([f32; 2]) -> [f32; 2]) -> Self {
        Self {
            corners: self.corners.map(f),
        }
    }
}

/// Perspective-corrected grid: always square with a side divisible by 9.
#[derive(Clone, Debug)]
pub struct RectifiedGrid {
    image: ImageF32,
}

impl RectifiedGrid {
    pub fn new(image: ImageF32) -> Result<Self> {
        if image.w != image.h {
            return Err(SudokuError::Segmentation(format!(
                "rectified grid must be square, got {}x{}",
                image.w, image.h
            )));
        }
        if image.w == 0 || image.w % 9 != 0 {
            return Err(SudokuError::Segmentation(format!(
                "rectified side {} is not a positive multiple of 9",
                image.w
            )));
        }
        Ok(Self { image })
    }

    pub fn side(&self) -> usize {
        self.image.w
    }

    pub fn cell_side(&self) -> usize {
        self.image.w / 9
    }

    pub fn image(&self) -> &ImageF32 {
        &self.image
    }
}
