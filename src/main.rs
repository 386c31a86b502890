use sudoku_parser::{ModelSource, ModelStore, SudokuParser};
use std::env;
use std::path::Path;
use std::sync::Arc;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let inputs: Vec<String> = env::args().skip(1).collect();
    if inputs.is_empty() {
        return Err(usage());
    }
    let store = Arc::new(ModelStore::new(ModelSource::default_cache()));
    let parser = SudokuParser::new(store);
    let mut failures = 0usize;
    for input in &inputs {
        match parser.parse_file(Path::new(input)) {
            Ok(grid) => {
                println!("{grid}");
                if let Some(note) = grid.low_confidence_note() {
                    eprintln!("{input}: {note}");
                }
            }
            Err(err) => {
                failures += 1;
                eprintln!("{input}: {err}");
            }
        }
    }
    if failures > 0 {
        return Err(format!("{failures} of {} images failed", inputs.len()));
    }
    Ok(())
}

fn usage() -> String {
    let program = env::args()
        .next()
        .unwrap_or_else(|| "sudoku-parser".to_string());
    format!("Usage: {program} <image>...")
}
