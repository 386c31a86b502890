mod common;

use common::collaborators::{CountingAssets, MemoryFs};
use common::init_logging;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Barrier};
use std::thread;
use sudoku_parser::cells::Cell;
use sudoku_parser::model::{Model, ModelFileSystem, MODEL_FILE_NAME};
use sudoku_parser::synthetic::{render_digit_cell, GlyphStyle};
use sudoku_parser::{ErrorKind, ModelSource, ModelStore, SudokuParser};

fn cache_source() -> (ModelSource, PathBuf) {
    let dir = PathBuf::from("/virtual/sudokusolver");
    (ModelSource::Cache { dir: dir.clone() }, dir.join(MODEL_FILE_NAME))
}

#[test]
fn hundred_parallel_classifications_load_once() {
    init_logging();
    let assets = Arc::new(CountingAssets::default());
    let fs = Arc::new(MemoryFs::default());
    let (source, model_path) = cache_source();
    let store = Arc::new(ModelStore::with_collaborators(
        source,
        assets.clone(),
        fs.clone(),
    ));
    let parser = Arc::new(SudokuParser::new(store));
    let cell = Cell::from_image(render_digit_cell(7, 28, GlyphStyle::default()), 0.14);
    let barrier = Arc::new(Barrier::new(100));

    let handles: Vec<_> = (0..100)
        .map(|_| {
            let parser = Arc::clone(&parser);
            let barrier = Arc::clone(&barrier);
            let cell = cell.clone();
            thread::spawn(move || {
                barrier.wait();
                parser.classify_cell(&cell)
            })
        })
        .collect();
    let labels: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("thread").expect("label"))
        .collect();

    assert_eq!(assets.loads(), 1);
    assert_eq!(fs.writes(), 1);
    assert!(fs.read_file(&model_path).is_ok());
    assert!(labels.iter().all(|l| *l == labels[0]));
    assert_eq!(labels[0].digit, Some(7));
}

#[test]
fn existing_cache_file_skips_the_asset() {
    let assets = Arc::new(CountingAssets::default());
    let fs = Arc::new(MemoryFs::default());
    let (source, model_path) = cache_source();
    let bundled = sudoku_parser::model::BundledAssets;
    let bytes = sudoku_parser::model::AssetSource::load(
        &bundled,
        sudoku_parser::model::DEFAULT_MODEL_ASSET,
    )
    .expect("bundled bytes");
    fs.insert(&model_path, bytes);

    let store = ModelStore::with_collaborators(source, assets.clone(), fs.clone());
    store.model().expect("model");
    assert_eq!(assets.loads(), 0);
    assert_eq!(fs.writes(), 0);
    assert_eq!(fs.reads(), 1);
}

#[test]
fn unexpected_stat_failure_is_storage_and_nothing_is_written() {
    let assets = Arc::new(CountingAssets::default());
    let fs = Arc::new(MemoryFs::failing_stat(io::ErrorKind::PermissionDenied));
    let (source, _) = cache_source();
    let store = ModelStore::with_collaborators(source, assets.clone(), fs.clone());
    let err = store.model().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);
    assert_eq!(fs.writes(), 0);
    assert_eq!(assets.loads(), 0);
}

#[test]
fn directory_in_place_of_the_model_is_storage() {
    let assets = Arc::new(CountingAssets::default());
    let fs = Arc::new(MemoryFs::default());
    let (source, model_path) = cache_source();
    fs.create_dir_all(&model_path).expect("mkdir");
    let store = ModelStore::with_collaborators(source, assets, fs.clone());
    assert_eq!(store.model().unwrap_err().kind(), ErrorKind::Storage);
    assert_eq!(fs.writes(), 0);
}

#[test]
fn failed_load_is_retried_on_the_next_call() {
    let fs = Arc::new(MemoryFs::default());
    let missing = PathBuf::from("/virtual/trained.json");
    let store = ModelStore::with_collaborators(
        ModelSource::file(&missing),
        Arc::new(CountingAssets::default()),
        fs.clone(),
    );
    assert_eq!(store.model().unwrap_err().kind(), ErrorKind::ModelLoad);
    let bytes = sudoku_parser::model::AssetSource::load(
        &sudoku_parser::model::BundledAssets,
        sudoku_parser::model::DEFAULT_MODEL_ASSET,
    )
    .expect("bundled bytes");
    fs.insert(&missing, bytes);
    assert!(store.model().is_ok());
}

#[test]
fn stray_staging_file_from_a_killed_run_is_ignored() {
    init_logging();
    let dir = tempfile::tempdir().expect("tempdir");
    let cache = dir.path().join("sudokusolver");
    std::fs::create_dir_all(&cache).expect("mkdir");
    let stray = cache.join(format!(".{MODEL_FILE_NAME}.a1b2c3.tmp"));
    std::fs::write(&stray, b"{ \"version\": 1, \"feature_len\": 52").expect("stray");

    let store = ModelStore::new(ModelSource::Cache { dir: cache.clone() });
    let model = store.model().expect("model materialized next to the stray file");
    let written = std::fs::read(cache.join(MODEL_FILE_NAME)).expect("cache file");
    let reread = Model::from_json_bytes(&written, "cache").expect("complete JSON");
    assert_eq!(reread.weights, model.weights);
    assert!(stray.exists());
}
