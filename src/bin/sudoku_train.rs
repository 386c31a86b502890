use sudoku_parser::train_from_config;
use std::env;
use std::path::Path;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let outcome = train_from_config(Path::new(&config_path)).map_err(|e| e.to_string())?;
    println!("{}", outcome.model_path.display());
    let counts: Vec<String> = outcome
        .class_counts
        .iter()
        .map(|(digit, n)| format!("{digit}:{n}"))
        .collect();
    eprintln!(
        "samples={} skipped={} empty_disagreements={} accuracy={:.3} classes=[{}]",
        outcome.samples_used,
        outcome.samples_skipped,
        outcome.empty_disagreements,
        outcome.training_accuracy,
        counts.join(" ")
    );
    Ok(())
}

fn usage() -> String {
    let program = env::args()
        .next()
        .unwrap_or_else(|| "sudoku_train".to_string());
    format!("Usage: {program} <train.json>")
}
