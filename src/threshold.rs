//! Binarization: local-mean adaptive thresholding for uneven lighting.
//!
//! A pixel is marked as ink when it is darker than the mean of its
//! `(2r+1)×(2r+1)` neighbourhood by more than `offset`. Window sums come from
//! an f64 integral image so the cost is O(W·H) regardless of the radius.
use crate::image::{ImageF32, ImageView};

/// Binary mask with one byte per pixel (1 = ink, 0 = background).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryMask {
    pub w: usize,
    pub h: usize,
    pub data: Vec<u8>,
}

impl BinaryMask {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![0; w * h],
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.data[y * self.w + x] != 0
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, ink: bool) {
        self.data[y * self.w + x] = ink as u8;
    }

    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }
}

/// Summed-area table with a zero guard row and column.
struct Integral {
    w1: usize,
    sums: Vec<f64>,
}

impl Integral {
    fn new(img: &ImageF32) -> Self {
        let w1 = img.w + 1;
        let mut sums = vec![0.0f64; w1 * (img.h + 1)];
        for (y, row) in img.rows().enumerate() {
            let mut run = 0.0f64;
            for (x, &v) in row.iter().enumerate() {
                run += v as f64;
                sums[(y + 1) * w1 + x + 1] = sums[y * w1 + x + 1] + run;
            }
        }
        Self { w1, sums }
    }

    /// Sum over the half-open window [x0, x1) × [y0, y1).
    #[inline]
    fn window(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> f64 {
        self.sums[y1 * self.w1 + x1] - self.sums[y0 * self.w1 + x1] - self.sums[y1 * self.w1 + x0]
            + self.sums[y0 * self.w1 + x0]
    }
}

/// Mark pixels darker than their local mean minus `offset` as ink.
pub fn adaptive_mean_threshold(img: &ImageF32, radius: usize, offset: f32) -> BinaryMask {
    let mut mask = BinaryMask::new(img.w, img.h);
    if img.w == 0 || img.h == 0 {
        return mask;
    }
    let integral = Integral::new(img);
    for y in 0..img.h {
        let y0 = y.saturating_sub(radius);
        let y1 = (y + radius + 1).min(img.h);
        let row = img.row(y);
        for (x, &v) in row.iter().enumerate() {
            let x0 = x.saturating_sub(radius);
            let x1 = (x + radius + 1).min(img.w);
            let area = ((x1 - x0) * (y1 - y0)) as f64;
            let mean = (integral.window(x0, y0, x1, y1) / area) as f32;
            if v < mean - offset {
                mask.data[y * img.w + x] = 1;
            }
        }
    }
    mask
}
