use super::filters::blur;
use super::options::PyramidOptions;
use crate::image::{ImageF32, ImageU8};
use std::time::Instant;

/// Halving pyramid; level 0 is the full-resolution image.
#[derive(Clone, Debug, Default)]
pub struct Pyramid {
    pub levels: Vec<ImageF32>,
}

impl Pyramid {
    pub fn from_image(base: ImageF32, options: PyramidOptions) -> Self {
        let count = options.levels.max(1);
        let mut levels = Vec::with_capacity(count);
        levels.push(base);
        while levels.len() < count {
            let step = levels.len();
            let prev = &levels[step - 1];
            let next = if step <= options.blur_levels {
                halve(&blur(prev, &options.kernel))
            } else {
                halve(prev)
            };
            levels.push(next);
        }
        Self { levels }
    }

    /// Finest level whose longer side is at most `max_side`; the coarsest
    /// level when none is small enough.
    pub fn finest_within(&self, max_side: usize) -> usize {
        self.levels
            .iter()
            .position(|l| l.w.max(l.h) <= max_side)
            .unwrap_or(self.levels.len().saturating_sub(1))
    }

    pub fn base(&self) -> &ImageF32 {
        &self.levels[0]
    }
}

/// Keep every other pixel in both directions.
fn halve(src: &ImageF32) -> ImageF32 {
    let mut out = ImageF32::new(src.w.div_ceil(2), src.h.div_ceil(2));
    for y in 0..out.h {
        for x in 0..out.w {
            out.set(x, y, src.get(2 * x, 2 * y));
        }
    }
    out
}

/// Levels needed before the longer side drops to `max_side` or below.
pub fn levels_for_budget(width: usize, height: usize, max_side: usize) -> usize {
    let budget = max_side.max(1);
    let mut side = width.max(height);
    let mut halvings = 0;
    while side > budget {
        side = side.div_ceil(2);
        halvings += 1;
    }
    halvings + 1
}

/// Pyramid plus how long conversion and construction took.
#[derive(Clone, Debug, Default)]
pub struct TimedPyramid {
    pub pyramid: Pyramid,
    pub convert_ms: f64,
    pub build_ms: f64,
}

pub fn build_pyramid(gray: ImageU8<'_>, options: PyramidOptions) -> TimedPyramid {
    let t0 = Instant::now();
    let base = gray.to_f32();
    let convert_ms = t0.elapsed().as_secs_f64() * 1000.0;
    let t1 = Instant::now();
    let pyramid = Pyramid::from_image(base, options);
    TimedPyramid {
        pyramid,
        convert_ms,
        build_ms: t1.elapsed().as_secs_f64() * 1000.0,
    }
}
