use image::{imageops, GrayImage, ImageFormat, Luma};
use std::io::Cursor;
use sudoku_parser::image::io::{encode_png, GrayImageU8};
use sudoku_parser::image::ImageF32;
use sudoku_parser::synthetic::{draw_glyph, render_puzzle, PageStyle, INK, PAPER};
use sudoku_parser::PuzzleGrid;

/// Seventeen-clue puzzle used across the end-to-end tests.
pub const CLUES_17: &str =
    "000000010400000000020000000000050407008000300001090000300400200050100000000806000";

/// A complete grid, so every digit appears nine times.
pub const SOLVED: &str =
    "534678912672195348198342567859761423426853791713924856961537284287419635345286179";

/// Mild keystone plus rotation, inside the 640×640 canvas.
pub const TILTED: [[f32; 2]; 4] = [[80.0, 40.0], [600.0, 70.0], [585.0, 600.0], [45.0, 565.0]];

/// Rendered puzzle page as PNG bytes plus the true grid corners.
pub fn puzzle_png(grid: &str, warp_to: Option<[[f32; 2]; 4]>) -> (Vec<u8>, [[f32; 2]; 4]) {
    let grid: PuzzleGrid = grid.parse().expect("valid grid text");
    let page = render_puzzle(&grid, &PageStyle::default(), warp_to);
    let png = encode_png(&GrayImageU8::from_f32(&page.image)).expect("encode page");
    (png, page.corners)
}

/// Uniform page with no structure at all.
pub fn blank_page_png(width: usize, height: usize) -> Vec<u8> {
    encode_png(&GrayImageU8::new(width, height, vec![235; width * height])).expect("encode")
}

fn page_png(page: &ImageF32) -> Vec<u8> {
    encode_png(&GrayImageU8::from_f32(page)).expect("encode")
}

fn draw_frame(page: &mut ImageF32, lo: usize, hi: usize, thick: usize) {
    for t in 0..thick {
        for i in lo..=hi {
            for p in [lo + t, hi - t] {
                page.set(i, p, 0.12);
                page.set(p, i, 0.12);
            }
        }
    }
}

/// 640×640 page with a square `divisions × divisions` table; one division is
/// an empty picture frame. Every cell gets a digit when `digits` is set.
pub fn table_png(divisions: usize, digits: bool) -> Vec<u8> {
    let (lo, hi) = (60usize, 580usize);
    let mut page = ImageF32::filled(640, 640, PAPER);
    draw_frame(&mut page, lo, hi, 5);
    let pitch = (hi - lo) as f32 / divisions as f32;
    for k in 1..divisions {
        let p = lo + (k as f32 * pitch) as usize;
        for i in lo..=hi {
            for t in 0..3 {
                page.set(i, p + t, 0.12);
                page.set(p + t, i, 0.12);
            }
        }
    }
    if digits {
        for row in 0..divisions {
            for col in 0..divisions {
                let cx = lo as f32 + (col as f32 + 0.5) * pitch;
                let cy = lo as f32 + (row as f32 + 0.5) * pitch;
                let digit = ((row * divisions + col) % 9 + 1) as u8;
                draw_glyph(&mut page, digit, cx, cy, 0.4 * pitch, false, INK);
            }
        }
    }
    page_png(&page)
}

/// Frame around lines of small printed digits, like a boxed paragraph.
pub fn framed_text_png() -> Vec<u8> {
    let mut page = ImageF32::filled(640, 640, PAPER);
    draw_frame(&mut page, 50, 589, 4);
    let mut n = 0usize;
    for line in 0..22 {
        let cy = 82.0 + line as f32 * 22.0;
        for ch in 0..40 {
            let cx = 80.0 + ch as f32 * 12.0;
            n += 7;
            draw_glyph(&mut page, (n % 9 + 1) as u8, cx, cy, 14.0, false, INK);
        }
    }
    page_png(&page)
}

/// Puzzle page stored rotated a quarter turn counter-clockwise as JPEG, with
/// an EXIF Orientation=6 tag saying it must be turned clockwise for display.
pub fn sideways_exif_jpeg(grid: &str) -> Vec<u8> {
    let grid: PuzzleGrid = grid.parse().expect("valid grid text");
    let page = render_puzzle(&grid, &PageStyle::default(), None).image;
    let upright = GrayImage::from_fn(page.w as u32, page.h as u32, |x, y| {
        Luma([(page.get(x as usize, y as usize) * 255.0).round() as u8])
    });
    let stored = imageops::rotate270(&upright);
    let mut jpeg = Cursor::new(Vec::new());
    stored.write_to(&mut jpeg, ImageFormat::Jpeg).expect("jpeg");
    let jpeg = jpeg.into_inner();

    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&[0xFF, 0xE1, 0x00, 0x22]);
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(&[b'I', b'I', 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00, 0x01, 0x00]);
    out.extend_from_slice(&[0x12, 0x01, 0x03, 0x00, 0x01, 0x00, 0x00, 0x00, 0x06, 0x00, 0x00, 0x00]);
    out.extend_from_slice(&[0x00; 4]);
    out.extend_from_slice(&jpeg[2..]);
    out
}
