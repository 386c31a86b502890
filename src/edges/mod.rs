//! Sobel gradients for border edge support in the locator and orientation
//! histograms in cell features.
pub mod grad;

pub use grad::{sobel_gradients, Gradients, ORIENTATION_BINS};
