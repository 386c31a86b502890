//! Owned single-channel float image, row-major and tightly packed.
//!
//! Intensities live in [0, 1] with 1 meaning white paper. Every numeric
//! stage (blur, thresholding, warping, cell features) works on this type.
use super::traits::{ImageView, ImageViewMut};
use serde::Serialize;

#[derive(Clone, Debug, Default, Serialize)]
pub struct ImageF32 {
    pub w: usize,
    pub h: usize,
    #[serde(skip)]
    pub data: Vec<f32>,
}

impl ImageF32 {
    pub fn new(w: usize, h: usize) -> Self {
        Self::filled(w, h, 0.0)
    }

    pub fn filled(w: usize, h: usize, value: f32) -> Self {
        Self {
            w,
            h,
            data: vec![value; w * h],
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.w + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        let w = self.w;
        self.data[y * w + x] = v;
    }

    /// Bilinear lookup; integer coordinates hit pixel centres and anything
    /// outside the image is clamped onto the border.
    pub fn sample_bilinear(&self, x: f32, y: f32) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        let x = x.clamp(0.0, (self.w - 1) as f32);
        let y = y.clamp(0.0, (self.h - 1) as f32);
        let (ix, iy) = (x as usize, y as usize);
        let (nx, ny) = ((ix + 1).min(self.w - 1), (iy + 1).min(self.h - 1));
        let (tx, ty) = (x - ix as f32, y - iy as f32);
        let lerp = |a: f32, b: f32, t: f32| a + (b - a) * t;
        lerp(
            lerp(self.get(ix, iy), self.get(nx, iy), tx),
            lerp(self.get(ix, ny), self.get(nx, ny), tx),
            ty,
        )
    }

    /// Copy of the `w × h` window starting at `(x0, y0)`. Panics when the
    /// window leaves the image.
    pub fn crop(&self, x0: usize, y0: usize, w: usize, h: usize) -> ImageF32 {
        assert!(
            x0 + w <= self.w && y0 + h <= self.h,
            "crop {w}x{h} at ({x0}, {y0}) outside {}x{}",
            self.w,
            self.h
        );
        let data = (y0..y0 + h)
            .flat_map(|y| self.row(y)[x0..x0 + w].iter().copied())
            .collect();
        ImageF32 { w, h, data }
    }
}

impl ImageView for ImageF32 {
    type Pixel = f32;

    fn width(&self) -> usize {
        self.w
    }

    fn height(&self) -> usize {
        self.h
    }

    #[inline]
    fn row(&self, y: usize) -> &[f32] {
        &self.data[y * self.w..(y + 1) * self.w]
    }
}

impl ImageViewMut for ImageF32 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let w = self.w;
        &mut self.data[y * w..(y + 1) * w]
    }
}
