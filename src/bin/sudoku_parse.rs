use serde::Serialize;
use sudoku_parser::config::load_parse_config;
use sudoku_parser::image::io::{save_grayscale_f32, write_json_file};
use sudoku_parser::{ModelStore, ParseReport, SudokuParser};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageResult<'a> {
    input: &'a Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a ParseReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_parse_config(Path::new(&config_path)).map_err(|e| e.to_string())?;
    let store = Arc::new(ModelStore::new(config.model.clone()));
    let parser = SudokuParser::with_params(store, config.params.clone());

    let mut reports = Vec::with_capacity(config.inputs.len());
    for input in &config.inputs {
        let outcome = fs::read(input)
            .map_err(|e| format!("{}: {e}", input.display()))
            .and_then(|bytes| parser.parse_report(&bytes).map_err(|e| e.to_string()));
        match &outcome {
            Ok(report) => {
                println!("{}", report.grid.render(&config.output.render));
                if let Some(note) = report.grid.low_confidence_note() {
                    eprintln!("{}: {note}", input.display());
                }
                if let Some(path) = &config.output.rectified_png {
                    let path = numbered(path, reports.len(), config.inputs.len());
                    save_grayscale_f32(&report.rectified, &path).map_err(|e| e.to_string())?;
                }
            }
            Err(err) => eprintln!("{}: {err}", input.display()),
        }
        reports.push((input.clone(), outcome));
    }

    if let Some(path) = &config.output.json_out {
        let results: Vec<ImageResult<'_>> = reports
            .iter()
            .map(|(input, outcome)| match outcome {
                Ok(report) => ImageResult {
                    input,
                    text: Some(report.grid.to_line()),
                    report: Some(report),
                    error: None,
                },
                Err(err) => ImageResult {
                    input,
                    text: None,
                    report: None,
                    error: Some(err.clone()),
                },
            })
            .collect();
        write_json_file(path, &results).map_err(|e| e.to_string())?;
        println!("JSON report saved to {}", path.display());
    }

    let failures = reports.iter().filter(|(_, r)| r.is_err()).count();
    if failures > 0 {
        return Err(format!("{failures} of {} images failed", reports.len()));
    }
    Ok(())
}

/// `grid.png` → `grid_3.png` when several inputs share one output path.
fn numbered(path: &Path, index: usize, total: usize) -> PathBuf {
    if total <= 1 {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    path.with_file_name(format!("{stem}_{index}{ext}"))
}

fn usage() -> String {
    let program = env::args()
        .next()
        .unwrap_or_else(|| "sudoku_parse".to_string());
    format!("Usage: {program} <config.json>")
}
