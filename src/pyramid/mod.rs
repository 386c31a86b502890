//! Halving image pyramid used to pick the locator's working resolution.
//!
//! Level 0 is the input converted to `[0, 1]` floats. Each further level
//! optionally smooths with a separable kernel and then keeps every other
//! pixel; borders replicate.
pub mod build;
pub mod filters;
pub mod options;
pub mod scaling;

pub use build::{build_pyramid, levels_for_budget, Pyramid, TimedPyramid};
pub use filters::{blur, SeparableKernel, GAUSSIAN_5TAP};
pub use options::PyramidOptions;
pub use scaling::LevelScaling;
