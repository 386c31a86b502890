//! Fixed-length feature vector for a cropped glyph.
//!
//! Layout (529 values):
//! - `0..400`: the glyph scaled, aspect preserved, into a 16×16 box centred in
//!   a 20×20 frame; each pixel is the mean of a 3×3 supersample (ink = 1).
//! - `400..528`: Sobel orientation histograms, 8 bins for each of the 4×4
//!   blocks of 5×5 pixels, weighted by magnitude and L2-normalized.
//! - `528`: bounding-box aspect ratio (width / height).
use super::ink::InkGlyph;
use crate::edges::{sobel_gradients, ORIENTATION_BINS};
use crate::image::ImageF32;

pub const FRAME_SIDE: usize = 20;
pub const BOX_SIDE: usize = 16;
const SUPERSAMPLE: usize = 3;
const BLOCK_SIDE: usize = 5;
const BLOCKS: usize = FRAME_SIDE / BLOCK_SIDE;

pub const PIXEL_FEATURES: usize = FRAME_SIDE * FRAME_SIDE;
pub const GRADIENT_FEATURES: usize = BLOCKS * BLOCKS * ORIENTATION_BINS;
pub const FEATURE_LEN: usize = PIXEL_FEATURES + GRADIENT_FEATURES + 1;

/// Render the glyph into the normalized `FRAME_SIDE²` ink map.
pub fn normalize_glyph(glyph: &InkGlyph) -> ImageF32 {
    let mut frame = ImageF32::new(FRAME_SIDE, FRAME_SIDE);
    if glyph.width == 0 || glyph.height == 0 {
        return frame;
    }
    let scale = BOX_SIDE as f32 / glyph.width.max(glyph.height) as f32;
    let off_x = (FRAME_SIDE as f32 - glyph.width as f32 * scale) * 0.5;
    let off_y = (FRAME_SIDE as f32 - glyph.height as f32 * scale) * 0.5;
    let step = 1.0 / SUPERSAMPLE as f32;
    let norm = 1.0 / (SUPERSAMPLE * SUPERSAMPLE) as f32;

    for ty in 0..FRAME_SIDE {
        for tx in 0..FRAME_SIDE {
            let mut hits = 0usize;
            for j in 0..SUPERSAMPLE {
                let sy = (ty as f32 + (j as f32 + 0.5) * step - off_y) / scale;
                if sy < 0.0 || sy >= glyph.height as f32 {
                    continue;
                }
                for i in 0..SUPERSAMPLE {
                    let sx = (tx as f32 + (i as f32 + 0.5) * step - off_x) / scale;
                    if sx < 0.0 || sx >= glyph.width as f32 {
                        continue;
                    }
                    if glyph.get(sx as usize, sy as usize) {
                        hits += 1;
                    }
                }
            }
            frame.set(tx, ty, hits as f32 * norm);
        }
    }
    frame
}

/// Orientation histograms over the blocks of the normalized frame.
fn gradient_histograms(frame: &ImageF32) -> Vec<f32> {
    let grad = sobel_gradients(frame);
    let mut hist = vec![0.0f32; GRADIENT_FEATURES];
    for y in 0..FRAME_SIDE {
        for x in 0..FRAME_SIDE {
            let mag = grad.mag.get(x, y);
            if mag <= 0.0 {
                continue;
            }
            let block = (y / BLOCK_SIDE) * BLOCKS + x / BLOCK_SIDE;
            let bin = grad.orientation_bin(x, y);
            hist[block * ORIENTATION_BINS + bin] += mag;
        }
    }
    let norm = hist.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 1e-6 {
        hist.iter_mut().for_each(|v| *v /= norm);
    }
    hist
}

/// Build the feature vector used by both the classifier and the trainer.
pub fn extract_features(glyph: &InkGlyph) -> Vec<f32> {
    let frame = normalize_glyph(glyph);
    let mut out = Vec::with_capacity(FEATURE_LEN);
    out.extend_from_slice(&frame.data);
    out.extend(gradient_histograms(&frame));
    out.push(glyph.aspect_ratio());
    debug_assert_eq!(out.len(), FEATURE_LEN);
    out
}
