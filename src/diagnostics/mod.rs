//! Structured diagnostics returned alongside parse results.
//!
//! Stage timings are recorded by the locator and the parser; the parse report
//! itself lives in [`crate::parser::ParseReport`].

pub mod timing;

pub use timing::{StageTiming, TimingBreakdown};
