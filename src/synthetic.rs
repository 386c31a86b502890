//! Synthetic printed digits and puzzle pages.
//!
//! A 5×7 bitmap font rasterized at arbitrary sizes, single-cell renders with
//! small style variations, and full puzzle pages that can be perspective
//! warped. The bundled default model is trained on these renders, and the
//! integration tests parse them end to end.
use crate::cells::GRID_SIZE;
use crate::homography::{homography_from_points, warp_perspective};
use crate::image::ImageF32;
use crate::puzzle::PuzzleGrid;

pub const PAPER: f32 = 0.92;
pub const INK: f32 = 0.1;

const GLYPH_COLS: usize = 5;
const GLYPH_ROWS: usize = 7;
const BOLD_PAD: f32 = 0.25;

/// Rows of the 5×7 bitmap for digits 1..=9 (`#` = ink).
pub const GLYPHS: [[&str; GLYPH_ROWS]; 9] = [
    ["..#..", ".##..", "..#..", "..#..", "..#..", "..#..", ".###."],
    [".###.", "#...#", "....#", "...#.", "..#..", ".#...", "#####"],
    ["#####", "...#.", "..#..", "...#.", "....#", "#...#", ".###."],
    ["...#.", "..##.", ".#.#.", "#..#.", "#####", "...#.", "...#."],
    ["#####", "#....", "####.", "....#", "....#", "#...#", ".###."],
    ["..##.", ".#...", "#....", "####.", "#...#", "#...#", ".###."],
    ["#####", "....#", "...#.", "..#..", ".#...", ".#...", ".#..."],
    [".###.", "#...#", "#...#", ".###.", "#...#", "#...#", ".###."],
    [".###.", "#...#", "#...#", ".####", "....#", "...#.", ".##.."],
];

fn glyph_hit(digit: u8, gx: f32, gy: f32) -> bool {
    if gx < 0.0 || gy < 0.0 || gx >= GLYPH_COLS as f32 || gy >= GLYPH_ROWS as f32 {
        return false;
    }
    GLYPHS[(digit - 1) as usize][gy as usize].as_bytes()[gx as usize] == b'#'
}

/// Paint `digit` (1..=9) centred at `(cx, cy)` with the given glyph height.
pub fn draw_glyph(img: &mut ImageF32, digit: u8, cx: f32, cy: f32, height: f32, bold: bool, ink: f32) {
    if !(1..=9).contains(&digit) || height <= 0.0 {
        return;
    }
    let unit = height / GLYPH_ROWS as f32;
    let left = cx - 0.5 * GLYPH_COLS as f32 * unit;
    let top = cy - 0.5 * GLYPH_ROWS as f32 * unit;
    let pad = if bold { BOLD_PAD } else { 0.0 };
    let x0 = (left - unit).floor().max(0.0) as usize;
    let y0 = (top - unit).floor().max(0.0) as usize;
    let x1 = ((left + (GLYPH_COLS as f32 + 1.0) * unit).ceil().max(0.0) as usize).min(img.w);
    let y1 = ((top + (GLYPH_ROWS as f32 + 1.0) * unit).ceil().max(0.0) as usize).min(img.h);
    for y in y0..y1 {
        let gy = (y as f32 + 0.5 - top) / unit;
        for x in x0..x1 {
            let gx = (x as f32 + 0.5 - left) / unit;
            let hit = glyph_hit(digit, gx, gy)
                || (bold
                    && [(-pad, 0.0), (pad, 0.0), (0.0, -pad), (0.0, pad)]
                        .iter()
                        .any(|&(ox, oy)| glyph_hit(digit, gx + ox, gy + oy)));
            if hit {
                img.set(x, y, ink);
            }
        }
    }
}

/// Variation applied to a single-cell render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphStyle {
    pub height: f32,
    pub dx: f32,
    pub dy: f32,
    pub bold: bool,
}

impl Default for GlyphStyle {
    fn default() -> Self {
        Self {
            height: 16.0,
            dx: 0.0,
            dy: 0.0,
            bold: false,
        }
    }
}

/// Styles used to build the default training set for 28 px cells.
pub fn glyph_styles() -> Vec<GlyphStyle> {
    let mut styles = Vec::new();
    for height in [12.0, 14.0, 16.0, 18.0] {
        for dx in [-2.0, 0.0, 2.0] {
            for dy in [-1.0, 0.0, 1.0] {
                for bold in [false, true] {
                    styles.push(GlyphStyle {
                        height,
                        dx,
                        dy,
                        bold,
                    });
                }
            }
        }
    }
    styles
}

/// `side × side` cell holding one printed digit.
pub fn render_digit_cell(digit: u8, side: usize, style: GlyphStyle) -> ImageF32 {
    let mut img = ImageF32::filled(side, side, PAPER);
    let centre = side as f32 * 0.5;
    draw_glyph(
        &mut img,
        digit,
        centre + style.dx,
        centre + style.dy,
        style.height,
        style.bold,
        INK,
    );
    img
}

/// Layout of a rendered puzzle page.
#[derive(Clone, Debug)]
pub struct PageStyle {
    pub canvas_width: usize,
    pub canvas_height: usize,
    /// Top-left pixel of the grid box.
    pub origin: [usize; 2],
    pub grid_side: usize,
    pub thin_line: usize,
    pub thick_line: usize,
    pub line_value: f32,
    /// Glyph height as a share of the cell side.
    pub glyph_scale: f32,
}

impl Default for PageStyle {
    fn default() -> Self {
        Self {
            canvas_width: 640,
            canvas_height: 640,
            origin: [50, 50],
            grid_side: 540,
            thin_line: 2,
            thick_line: 5,
            line_value: 0.12,
            glyph_scale: 0.55,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RenderedPuzzle {
    pub image: ImageF32,
    /// Grid corners (pixel centres) in the rendered image, clockwise from
    /// top-left.
    pub corners: [[f32; 2]; 4],
}

/// Render `grid` on a page. With `warp_to`, the grid corners are moved to
/// those four points by a perspective warp of the whole page.
pub fn render_puzzle(grid: &PuzzleGrid, style: &PageStyle, warp_to: Option<[[f32; 2]; 4]>) -> RenderedPuzzle {
    let mut img = ImageF32::filled(style.canvas_width, style.canvas_height, PAPER);
    let [ox, oy] = style.origin;
    let side = style.grid_side;

    for k in 0..=GRID_SIZE {
        let t = if k % 3 == 0 {
            style.thick_line
        } else {
            style.thin_line
        };
        let centre = k * side / GRID_SIZE;
        let start = centre.saturating_sub(t / 2).min(side - t);
        for a in start..start + t {
            for b in 0..side {
                img.set(ox + b, oy + a, style.line_value);
                img.set(ox + a, oy + b, style.line_value);
            }
        }
    }

    let cell = side as f32 / GRID_SIZE as f32;
    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            if let Some(d) = grid.get(row, col).digit {
                draw_glyph(
                    &mut img,
                    d,
                    ox as f32 + (col as f32 + 0.5) * cell,
                    oy as f32 + (row as f32 + 0.5) * cell,
                    style.glyph_scale * cell,
                    false,
                    INK,
                );
            }
        }
    }

    let (x0, y0) = (ox as f32, oy as f32);
    let last = (side - 1) as f32;
    let flat = [[x0, y0], [x0 + last, y0], [x0 + last, y0 + last], [x0, y0 + last]];
    match warp_to.and_then(|target| Some((target, homography_from_points(&target, &flat)?))) {
        Some((target, page_to_flat)) => RenderedPuzzle {
            image: warp_perspective(&img, &page_to_flat, style.canvas_width, style.canvas_height, PAPER),
            corners: target,
        },
        None => RenderedPuzzle {
            image: img,
            corners: flat,
        },
    }
}
