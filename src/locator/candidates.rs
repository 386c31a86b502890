//! Candidate quadrilaterals from ink regions, and the checks that decide
//! whether a candidate looks like a sudoku grid.
use super::params::LocatorParams;
use super::quad::Quadrilateral;
use crate::contour::{approx_closed_polygon, convex_hull, perimeter, polygon_area, Component};
use crate::edges::Gradients;
use serde::Serialize;
use std::fmt;

/// Douglas–Peucker tolerances tried in order, as fractions of the hull
/// perimeter, until the hull collapses to four vertices.
const APPROX_TOLERANCES: [f32; 6] = [0.01, 0.02, 0.03, 0.05, 0.08, 0.12];
const EDGE_SAMPLES_PER_SIDE: usize = 48;

/// Why a candidate region was not accepted as the grid.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Rejection {
    NoQuadrilateral,
    TooSmall { area_fraction: f32 },
    NotSquare { aspect_ratio: f32 },
    PoorHullFit { coverage: f32 },
    TooDense { ink_density: f32 },
    WeakEdges { support: f32 },
    /// The outline is fine but the inside is not a 9×9 line grid.
    NoInnerGrid { lines_found: usize },
    /// The homography to full resolution could not be solved.
    Degenerate,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NoQuadrilateral => write!(f, "outline is not a convex quadrilateral"),
            Rejection::TooSmall { area_fraction } => {
                write!(f, "quadrilateral covers only {:.1}% of the image", area_fraction * 100.0)
            }
            Rejection::NotSquare { aspect_ratio } => {
                write!(f, "side ratio {aspect_ratio:.2} is too far from square")
            }
            Rejection::PoorHullFit { coverage } => {
                write!(f, "quadrilateral explains only {:.0}% of the outline", coverage * 100.0)
            }
            Rejection::TooDense { ink_density } => {
                write!(f, "region is {:.0}% ink, not a line grid", ink_density * 100.0)
            }
            Rejection::WeakEdges { support } => {
                write!(f, "only {:.0}% of the border has edge support", support * 100.0)
            }
            Rejection::NoInnerGrid { lines_found } => {
                write!(f, "only {lines_found} of 16 interior grid lines found")
            }
            Rejection::Degenerate => write!(f, "outline is degenerate at full resolution"),
        }
    }
}

/// Outcome of evaluating one region, in working-level coordinates.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateReport {
    pub pixels: usize,
    pub quad: Option<Quadrilateral>,
    pub area: f32,
    pub rejection: Option<Rejection>,
}

impl CandidateReport {
    pub fn accepted(&self) -> bool {
        self.rejection.is_none() && self.quad.is_some()
    }
}

/// Fit a quadrilateral to a region outline and run every grid check.
pub fn evaluate_component(
    component: &Component,
    grad: &Gradients,
    image_area: f32,
    params: &LocatorParams,
) -> CandidateReport {
    let mut report = CandidateReport {
        pixels: component.len(),
        quad: None,
        area: 0.0,
        rejection: None,
    };
    let hull = convex_hull(&component.row_extremes());
    let quad = match fit_quadrilateral(&hull) {
        Some(q) => q,
        None => {
            report.rejection = Some(Rejection::NoQuadrilateral);
            return report;
        }
    };
    let area = quad.area();
    report.quad = Some(quad);
    report.area = area;
    report.rejection = check_quadrilateral(&quad, &hull, component.len(), grad, image_area, params);
    report
}

fn check_quadrilateral(
    quad: &Quadrilateral,
    hull: &[[f32; 2]],
    ink_pixels: usize,
    grad: &Gradients,
    image_area: f32,
    params: &LocatorParams,
) -> Option<Rejection> {
    let area = quad.area();
    let area_fraction = area / image_area.max(1.0);
    if area_fraction < params.min_area_fraction {
        return Some(Rejection::TooSmall { area_fraction });
    }
    let aspect_ratio = quad.aspect_ratio();
    if aspect_ratio > params.max_aspect_ratio {
        return Some(Rejection::NotSquare { aspect_ratio });
    }
    let hull_area = polygon_area(hull).max(1.0);
    let coverage = (area / hull_area).min(1.0);
    if coverage < params.min_hull_coverage {
        return Some(Rejection::PoorHullFit { coverage });
    }
    let ink_density = ink_pixels as f32 / area.max(1.0);
    if ink_density > params.max_ink_density {
        return Some(Rejection::TooDense { ink_density });
    }
    let support = edge_support(quad, grad, params.edge_magnitude);
    if support < params.min_edge_support {
        return Some(Rejection::WeakEdges { support });
    }
    None
}

/// Reduce a convex hull to four corners: Douglas–Peucker with growing
/// tolerance first, then the diagonal extreme points as a fallback.
pub fn fit_quadrilateral(hull: &[[f32; 2]]) -> Option<Quadrilateral> {
    if hull.len() < 4 {
        return None;
    }
    let peri = perimeter(hull);
    for frac in APPROX_TOLERANCES {
        let approx = approx_closed_polygon(hull, frac * peri);
        if approx.len() == 4 {
            if let Some(q) = Quadrilateral::from_points([approx[0], approx[1], approx[2], approx[3]]) {
                return Some(q);
            }
        }
        if approx.len() < 4 {
            break;
        }
    }
    Quadrilateral::from_points(diagonal_extremes(hull))
}

fn diagonal_extremes(hull: &[[f32; 2]]) -> [[f32; 2]; 4] {
    let pick = |key: &dyn Fn(&[f32; 2]) -> f32| -> [f32; 2] {
        hull.iter()
            .copied()
            .max_by(|a, b| key(a).partial_cmp(&key(b)).unwrap_or(std::cmp::Ordering::Equal))
            .unwrap_or([0.0, 0.0])
    };
    [
        pick(&|p| -(p[0] + p[1])),
        pick(&|p| p[0] - p[1]),
        pick(&|p| p[0] + p[1]),
        pick(&|p| p[1] - p[0]),
    ]
}

/// Fraction of evenly spaced border samples that sit next to a strong
/// gradient.
pub fn edge_support(quad: &Quadrilateral, grad: &Gradients, magnitude: f32) -> f32 {
    let mut hits = 0usize;
    let mut total = 0usize;
    for i in 0..4 {
        let a = quad.corners[i];
        let b = quad.corners[(i + 1) % 4];
        for s in 0..EDGE_SAMPLES_PER_SIDE {
            let t = (s as f32 + 0.5) / EDGE_SAMPLES_PER_SIDE as f32;
            let x = a[0] + (b[0] - a[0]) * t;
            let y = a[1] + (b[1] - a[1]) * t;
            total += 1;
            if grad.peak_magnitude_near(x, y) >= magnitude {
                hits += 1;
            }
        }
    }
    hits as f32 / total.max(1) as f32
}
