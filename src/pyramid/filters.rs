use crate::image::{ImageF32, ImageView, ImageViewMut};

/// Symmetric 1D kernel applied along rows and then columns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeparableKernel {
    taps: &'static [f32],
}

impl SeparableKernel {
    pub const fn new(taps: &'static [f32]) -> Self {
        Self { taps }
    }

    #[inline]
    pub fn taps(&self) -> &[f32] {
        self.taps
    }

    #[inline]
    pub fn radius(&self) -> usize {
        self.taps.len() / 2
    }
}

impl Default for SeparableKernel {
    fn default() -> Self {
        GAUSSIAN_5TAP
    }
}

/// Binomial approximation of a Gaussian, `[1, 4, 6, 4, 1] / 16`.
pub const GAUSSIAN_5TAP: SeparableKernel =
    SeparableKernel::new(&[0.0625, 0.25, 0.375, 0.25, 0.0625]);

#[inline]
fn replicate(idx: isize, len: usize) -> usize {
    idx.clamp(0, len as isize - 1) as usize
}

/// Same-size convolution with replicated borders.
pub fn blur(src: &ImageF32, kernel: &SeparableKernel) -> ImageF32 {
    let taps = kernel.taps();
    let (w, h) = (src.w, src.h);
    if w == 0 || h == 0 || taps.is_empty() {
        return src.clone();
    }
    let r = kernel.radius() as isize;

    let mut rows_pass = ImageF32::new(w, h);
    for y in 0..h {
        let line = src.row(y);
        let out = rows_pass.row_mut(y);
        for x in 0..w {
            out[x] = taps
                .iter()
                .enumerate()
                .map(|(k, &t)| t * line[replicate(x as isize + k as isize - r, w)])
                .sum();
        }
    }

    let mut out = ImageF32::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let v: f32 = taps
                .iter()
                .enumerate()
                .map(|(k, &t)| t * rows_pass.get(x, replicate(y as isize + k as isize - r, h)))
                .sum();
            out.set(x, y, v);
        }
    }
    out
}
