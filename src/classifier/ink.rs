//! Emptiness test: find the digit stroke inside a cell, if there is one.
//!
//! The background level is a high percentile of the inner window so that a
//! large glyph does not drag it down. Pixels darker than that level by more
//! than `ink_contrast` are ink. Of the 8-connected ink regions, only the
//! largest one whose bounding box reaches the central half of the window can
//! be a digit; anything else is grid-line residue or noise.
use super::ClassifierParams;
use crate::cells::Cell;
use crate::contour::{label_components, Component};
use crate::threshold::BinaryMask;
use serde::Serialize;
use std::fmt;

/// Why a cell was judged empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    /// No pixel is dark enough relative to the background.
    NoInk,
    /// Ink exists but none of it reaches the centre of the cell.
    OffCentre,
    /// The central stroke covers too little of the window.
    TooLittleInk,
    /// The central stroke is too short to be a digit.
    TooShort,
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            EmptyReason::NoInk => "no ink",
            EmptyReason::OffCentre => "ink does not reach the centre",
            EmptyReason::TooLittleInk => "too little ink",
            EmptyReason::TooShort => "stroke too short",
        };
        f.write_str(text)
    }
}

/// Binary glyph cropped to the bounding box of the selected ink region.
#[derive(Clone, Debug)]
pub struct InkGlyph {
    pub width: usize,
    pub height: usize,
    /// Row-major, 1 where the region has a pixel.
    pub mask: Vec<u8>,
    /// Region pixels over inner-window pixels.
    pub ink_fraction: f32,
    /// Region height over inner-window height.
    pub height_fraction: f32,
}

impl InkGlyph {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.mask[y * self.width + x] != 0
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

#[derive(Clone, Debug)]
pub enum InkAnalysis {
    Empty(EmptyReason),
    Glyph(InkGlyph),
}

impl InkAnalysis {
    pub fn is_empty(&self) -> bool {
        matches!(self, InkAnalysis::Empty(_))
    }
}

/// Run the emptiness test on one cell.
pub fn analyze_cell(cell: &Cell, params: &ClassifierParams) -> InkAnalysis {
    let (x0, y0, w, h) = cell.inner_window();
    if w == 0 || h == 0 {
        return InkAnalysis::Empty(EmptyReason::NoInk);
    }
    let mut values = Vec::with_capacity(w * h);
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            values.push(cell.image.get(x, y));
        }
    }
    let background = percentile(&values, params.background_percentile);
    let cutoff = background - params.ink_contrast;

    let mut mask = BinaryMask::new(w, h);
    for (i, &v) in values.iter().enumerate() {
        if v < cutoff {
            mask.data[i] = 1;
        }
    }
    if mask.count() == 0 {
        return InkAnalysis::Empty(EmptyReason::NoInk);
    }

    let (cx0, cy0) = (w / 4, h / 4);
    let (cx1, cy1) = (w - w / 4, h - h / 4);
    let Some(region) = label_components(&mask, params.min_region_pixels)
        .into_iter()
        .filter(|c| c.bbox_intersects(cx0, cy0, cx1, cy1))
        .max_by_key(|c| c.len())
    else {
        return InkAnalysis::Empty(EmptyReason::OffCentre);
    };

    let ink_fraction = region.len() as f32 / (w * h) as f32;
    let height_fraction = region.bbox_height() as f32 / h as f32;
    if ink_fraction < params.empty_ink_fraction {
        return InkAnalysis::Empty(EmptyReason::TooLittleInk);
    }
    if height_fraction < params.min_digit_height_fraction {
        return InkAnalysis::Empty(EmptyReason::TooShort);
    }
    InkAnalysis::Glyph(crop_region(&region, ink_fraction, height_fraction))
}

fn crop_region(region: &Component, ink_fraction: f32, height_fraction: f32) -> InkGlyph {
    let (width, height) = (region.bbox_width(), region.bbox_height());
    let mut mask = vec![0u8; width * height];
    for &idx in &region.pixels {
        let x = idx % region.mask_width - region.bbox[0];
        let y = idx / region.mask_width - region.bbox[1];
        mask[y * width + x] = 1;
    }
    InkGlyph {
        width,
        height,
        mask,
        ink_fraction,
        height_fraction,
    }
}

/// Nearest-rank percentile, `q` in [0, 1].
fn percentile(values: &[f32], q: f32) -> f32 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f32::total_cmp);
    let rank = (q.clamp(0.0, 1.0) * (sorted.len() - 1) as f32).round() as usize;
    sorted[rank]
}
