mod common;

use common::init_logging;
use common::synthetic_image::{
    blank_page_png, framed_text_png, puzzle_png, sideways_exif_jpeg, table_png, CLUES_17, SOLVED, TILTED,
};
use std::sync::Arc;
use sudoku_parser::{
    ErrorKind, GridLayout, ModelSource, ModelStore, RenderOptions, SudokuParser,
};

fn bundled_parser() -> SudokuParser {
    SudokuParser::new(Arc::new(ModelStore::new(ModelSource::Bundled)))
}

#[test]
fn axis_aligned_seventeen_clue_page_reads_exactly() {
    init_logging();
    let (png, _) = puzzle_png(CLUES_17, None);
    let grid = bundled_parser().parse_bytes(&png).expect("parse");
    assert_eq!(grid.to_line(), CLUES_17);
    assert_eq!(grid.clue_count(), 17);
}

#[test]
fn full_grid_reads_every_digit() {
    init_logging();
    let (png, _) = puzzle_png(SOLVED, None);
    let grid = bundled_parser().parse_bytes(&png).expect("parse");
    assert_eq!(grid.to_line(), SOLVED);
    assert!(grid.low_confidence_cells().is_empty());
}

#[test]
fn perspective_page_finds_corners_and_digits() {
    init_logging();
    let (png, corners) = puzzle_png(CLUES_17, Some(TILTED));
    let report = bundled_parser().parse_report(&png).expect("parse");
    for (found, truth) in report.quad.corners.iter().zip(corners.iter()) {
        let err = ((found[0] - truth[0]).powi(2) + (found[1] - truth[1]).powi(2)).sqrt();
        assert!(err < 3.0, "corner {found:?} vs {truth:?}");
    }
    assert_eq!(report.grid.to_line(), CLUES_17);
    assert_eq!((report.image_width, report.image_height), (640, 640));
    assert!(report.timings.total_ms >= 0.0);
    assert!(report.candidates.iter().any(|c| c.accepted()));
}

#[test]
fn sideways_phone_photo_is_read_upright() {
    init_logging();
    let grid = bundled_parser()
        .parse_bytes(&sideways_exif_jpeg(CLUES_17))
        .expect("parse");
    assert_eq!(grid.to_line(), CLUES_17);
}

#[test]
fn rows_layout_renders_nine_lines() {
    let (png, _) = puzzle_png(CLUES_17, None);
    let grid = bundled_parser().parse_bytes(&png).expect("parse");
    let text = grid.render(&RenderOptions {
        layout: GridLayout::Rows,
        ..Default::default()
    });
    let rows: Vec<&str> = text.lines().collect();
    assert_eq!(rows.len(), 9);
    assert_eq!(rows.concat(), CLUES_17);
}

#[test]
fn blank_page_is_grid_not_found() {
    let err = bundled_parser()
        .parse_bytes(&blank_page_png(480, 360))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GridNotFound);
    assert!(err.is_retryable_with_preprocessing());
}

#[test]
fn structures_without_a_nine_by_nine_grid_are_not_puzzles() {
    init_logging();
    let parser = bundled_parser();
    for (name, png) in [
        ("empty frame", table_png(1, false)),
        ("4x4 table", table_png(4, true)),
        ("framed text", framed_text_png()),
    ] {
        let err = parser.parse_bytes(&png).expect_err(name);
        assert_eq!(err.kind(), ErrorKind::GridNotFound, "{name}: {err}");
    }
}

#[test]
fn plain_nine_by_nine_table_is_accepted() {
    let grid = bundled_parser()
        .parse_bytes(&table_png(9, false))
        .expect("9x9 table");
    assert_eq!(grid.clue_count(), 0);
}

#[test]
fn empty_and_garbage_buffers_are_decode_errors() {
    let parser = bundled_parser();
    assert_eq!(parser.parse_bytes(&[]).unwrap_err().kind(), ErrorKind::Decode);
    assert_eq!(
        parser.parse_bytes(b"\x89PNG\r\n\x1a\n garbage").unwrap_err().kind(),
        ErrorKind::Decode
    );
}

#[test]
fn decode_failure_does_not_load_the_model() {
    let store = Arc::new(ModelStore::new(ModelSource::Bundled));
    let parser = SudokuParser::new(Arc::clone(&store));
    assert!(parser.parse_bytes(&[]).is_err());
    assert!(!store.is_loaded());
}

#[test]
fn repeated_parses_are_identical() {
    let (png, _) = puzzle_png(CLUES_17, Some(TILTED));
    let parser = bundled_parser();
    let a = parser.parse_report(&png).expect("parse");
    let b = parser.parse_report(&png).expect("parse");
    assert_eq!(a.labels, b.labels);
    assert_eq!(a.quad, b.quad);
}
