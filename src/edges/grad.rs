use crate::image::{ImageF32, ImageView};
use std::f32::consts::PI;

/// Bins of [`Gradients::orientation_bin`]; each spans 45° of signed angle.
pub const ORIENTATION_BINS: usize = 8;

#[derive(Clone, Debug)]
pub struct Gradients {
    pub gx: ImageF32,
    pub gy: ImageF32,
    pub mag: ImageF32,
    bins: Vec<u8>,
}

impl Gradients {
    #[inline]
    pub fn orientation_bin(&self, x: usize, y: usize) -> usize {
        self.bins[y * self.mag.w + x] as usize
    }

    /// Strongest magnitude within one pixel of the rounded position; 0 when
    /// the position falls outside the image.
    pub fn peak_magnitude_near(&self, x: f32, y: f32) -> f32 {
        let (xr, yr) = (x.round(), y.round());
        if !(xr >= 0.0 && yr >= 0.0 && xr < self.mag.w as f32 && yr < self.mag.h as f32) {
            return 0.0;
        }
        let (cx, cy) = (xr as usize, yr as usize);
        let xs = cx.saturating_sub(1)..=(cx + 1).min(self.mag.w - 1);
        (cy.saturating_sub(1)..=(cy + 1).min(self.mag.h - 1))
            .flat_map(|yy| self.mag.row(yy)[xs.clone()].iter().copied())
            .fold(0.0, f32::max)
    }
}

/// Signed angle in `(-π, π]` to one of [`ORIENTATION_BINS`] sectors. Opposite
/// polarities land `ORIENTATION_BINS / 2` apart.
#[inline]
fn orientation_sector(gx: f32, gy: f32) -> u8 {
    let turn = (gy.atan2(gx) + PI) / (2.0 * PI);
    ((turn * ORIENTATION_BINS as f32) as usize % ORIENTATION_BINS) as u8
}

/// 3×3 Sobel derivatives with replicated borders.
pub fn sobel_gradients(img: &ImageF32) -> Gradients {
    let (w, h) = (img.w, img.h);
    let mut gx = ImageF32::new(w, h);
    let mut gy = ImageF32::new(w, h);
    let mut mag = ImageF32::new(w, h);
    let mut bins = vec![0u8; w * h];

    for y in 0..h {
        let up = img.row(y.saturating_sub(1));
        let mid = img.row(y);
        let down = img.row((y + 1).min(h - 1));
        for x in 0..w {
            let l = x.saturating_sub(1);
            let r = (x + 1).min(w - 1);
            let dx = (up[r] - up[l]) + 2.0 * (mid[r] - mid[l]) + (down[r] - down[l]);
            let dy = (down[l] - up[l]) + 2.0 * (down[x] - up[x]) + (down[r] - up[r]);
            gx.set(x, y, dx);
            gy.set(x, y, dy);
            mag.set(x, y, dx.hypot(dy));
            bins[y * w + x] = orientation_sector(dx, dy);
        }
    }

    Gradients { gx, gy, mag, bins }
}
