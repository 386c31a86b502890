use sudoku_parser::cells::{Cell, SegmenterParams};
use sudoku_parser::classifier::DigitClassifier;
use sudoku_parser::model::{training_accuracy, Trainer, TrainingSet};
use sudoku_parser::synthetic::{glyph_styles, render_digit_cell};
use std::env;
use std::fs;
use std::path::PathBuf;

const CELL_SIDE: usize = 28;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let out = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("assets/default_model.json"));
    let inset = SegmenterParams::default().inset_fraction;
    let classifier = DigitClassifier::default();
    let mut set = TrainingSet::default();
    for digit in 1..=9u8 {
        for style in glyph_styles() {
            let cell = Cell::from_image(render_digit_cell(digit, CELL_SIDE, style), inset);
            set.add_cell(&cell, digit, &classifier)
                .map_err(|e| e.to_string())?;
        }
    }
    let model = Trainer::default()
        .fit(&set.samples)
        .map_err(|e| e.to_string())?;
    let bytes = model.to_json_bytes().map_err(|e| e.to_string())?;
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| format!("{}: {e}", parent.display()))?;
    }
    fs::write(&out, bytes).map_err(|e| format!("{}: {e}", out.display()))?;
    println!(
        "wrote {} ({} samples, {} skipped, accuracy {:.3})",
        out.display(),
        set.samples.len(),
        set.skipped,
        training_accuracy(&model, &set.samples)
    );
    Ok(())
}
