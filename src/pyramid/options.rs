use super::filters::{SeparableKernel, GAUSSIAN_5TAP};
use serde::Deserialize;

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct PyramidOptions {
    /// Total number of levels including the full-resolution one.
    pub levels: usize,
    /// Halvings that smooth before decimating; later ones only subsample.
    pub blur_levels: usize,
    #[serde(skip)]
    pub kernel: SeparableKernel,
}

impl PyramidOptions {
    /// `levels` levels, smoothing before every halving.
    pub fn new(levels: usize) -> Self {
        Self {
            levels,
            blur_levels: usize::MAX,
            kernel: GAUSSIAN_5TAP,
        }
    }

    pub fn with_blur_levels(self, blur_levels: usize) -> Self {
        Self {
            blur_levels,
            ..self
        }
    }
}

impl Default for PyramidOptions {
    fn default() -> Self {
        Self::new(1)
    }
}
