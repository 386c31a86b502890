//! Contour extraction on binary masks.
//!
//! - [`components`]: 8-connected component labelling with per-region
//!   statistics and boundary extremes.
//! - [`hull`]: convex hull (monotone chain).
//! - [`polygon`]: area, convexity and Douglas–Peucker simplification of
//!   closed polygons.

pub mod components;
pub mod hull;
pub mod polygon;

pub use components::{label_components, Component};
pub use hull::convex_hull;
pub use polygon::{approx_closed_polygon, is_convex, perimeter, polygon_area};
