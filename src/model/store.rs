//! Process-wide model holder with one-time lazy loading.
//!
//! `ModelStore::model` uses double-checked initialization: the fast path is a
//! lock-free `OnceLock` read, and the first callers serialize on a mutex so
//! exactly one of them touches the asset source and the filesystem.
use super::assets::{AssetSource, BundledAssets, DEFAULT_MODEL_ASSET};
use super::fs::{EntryKind, ModelFileSystem, OsFileSystem};
use super::svm::Model;
use crate::error::{Result, SudokuError};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

/// File name of the materialized model inside the cache directory.
pub const MODEL_FILE_NAME: &str = "sudokuSVMModel.json";
/// Cache sub-directory under the system temp dir.
pub const CACHE_DIR_NAME: &str = "sudokusolver";

/// Where the store obtains its model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSource {
    /// Parse the bundled asset straight from memory.
    Bundled,
    /// Load a model file written by the trainer.
    File { path: PathBuf },
    /// Use `<dir>/sudokuSVMModel.json`, writing the bundled asset there first
    /// if the file does not exist yet.
    Cache { dir: PathBuf },
}

impl ModelSource {
    pub fn default_cache() -> Self {
        ModelSource::Cache {
            dir: std::env::temp_dir().join(CACHE_DIR_NAME),
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        ModelSource::File { path: path.into() }
    }
}

impl Default for ModelSource {
    fn default() -> Self {
        ModelSource::default_cache()
    }
}

pub struct ModelStore {
    source: ModelSource,
    assets: Arc<dyn AssetSource>,
    fs: Arc<dyn ModelFileSystem>,
    model: OnceLock<Arc<Model>>,
    init: Mutex<()>,
}

impl ModelStore {
    pub fn new(source: ModelSource) -> Self {
        Self::with_collaborators(source, Arc::new(BundledAssets), Arc::new(OsFileSystem))
    }

    pub fn with_collaborators(
        source: ModelSource,
        assets: Arc<dyn AssetSource>,
        fs: Arc<dyn ModelFileSystem>,
    ) -> Self {
        Self {
            source,
            assets,
            fs,
            model: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    /// Store that already holds `model`; nothing is ever loaded.
    pub fn preloaded(model: Model) -> Self {
        let store = Self::new(ModelSource::Bundled);
        let _ = store.model.set(Arc::new(model));
        store
    }

    pub fn source(&self) -> &ModelSource {
        &self.source
    }

    pub fn is_loaded(&self) -> bool {
        self.model.get().is_some()
    }

    /// Shared model, loading it on first use. A failed load leaves the store
    /// empty so a later call tries again.
    pub fn model(&self) -> Result<Arc<Model>> {
        if let Some(model) = self.model.get() {
            return Ok(Arc::clone(model));
        }
        let _guard = self.init.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(model) = self.model.get() {
            return Ok(Arc::clone(model));
        }
        let model = Arc::new(self.load()?);
        let _ = self.model.set(Arc::clone(&model));
        Ok(model)
    }

    fn load(&self) -> Result<Model> {
        match &self.source {
            ModelSource::Bundled => {
                let bytes = self.load_asset()?;
                debug!("ModelStore: parsing bundled {DEFAULT_MODEL_ASSET}");
                Model::from_json_bytes(&bytes, DEFAULT_MODEL_ASSET)
            }
            ModelSource::File { path } => {
                let bytes = self
                    .fs
                    .read_file(path)
                    .map_err(|e| SudokuError::model_load(path.display().to_string(), e.to_string()))?;
                info!("ModelStore: loaded model from {}", path.display());
                Model::from_json_bytes(&bytes, &path.display().to_string())
            }
            ModelSource::Cache { dir } => self.load_cached(dir),
        }
    }

    fn load_cached(&self, dir: &Path) -> Result<Model> {
        let path = dir.join(MODEL_FILE_NAME);
        match self.fs.stat(&path) {
            Ok(EntryKind::File) => {
                let bytes = self
                    .fs
                    .read_file(&path)
                    .map_err(|e| SudokuError::storage(&path, e))?;
                debug!("ModelStore: using cached model {}", path.display());
                Model::from_json_bytes(&bytes, &path.display().to_string())
            }
            Ok(kind) => Err(SudokuError::storage(
                &path,
                io::Error::other(format!("expected a model file, found {kind:?}")),
            )),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.fs
                    .create_dir_all(dir)
                    .map_err(|e| SudokuError::storage(dir, e))?;
                let bytes = self.load_asset()?;
                self.fs
                    .write_file(&path, &bytes)
                    .map_err(|e| SudokuError::storage(&path, e))?;
                info!("ModelStore: materialized default model at {}", path.display());
                Model::from_json_bytes(&bytes, &path.display().to_string())
            }
            Err(e) => Err(SudokuError::storage(&path, e)),
        }
    }

    fn load_asset(&self) -> Result<Vec<u8>> {
        self.assets
            .load(DEFAULT_MODEL_ASSET)
            .map_err(|e| SudokuError::model_load(DEFAULT_MODEL_ASSET, e.to_string()))
    }
}

impl std::fmt::Debug for ModelStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelStore")
            .field("source", &self.source)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::model::test_support::constant_model;
    use std::fs;

    #[test]
    fn bundled_model_loads_and_is_structurally_valid() {
        let store = ModelStore::new(ModelSource::Bundled);
        let model = store.model().expect("bundled model");
        assert_eq!(model.feature_len, crate::classifier::FEATURE_LEN);
        assert_eq!(model.classes, (1..=9).collect::<Vec<u8>>());
        assert!(store.is_loaded());
    }

    #[test]
    fn cache_is_materialized_once_and_reused() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = dir.path().join("nested").join(CACHE_DIR_NAME);
        let store = ModelStore::new(ModelSource::Cache { dir: cache.clone() });
        let first = store.model().expect("model");
        let second = store.model().expect("model");
        assert!(Arc::ptr_eq(&first, &second));
        let written = fs::read(cache.join(MODEL_FILE_NAME)).expect("cache file");
        assert_eq!(
            Model::from_json_bytes(&written, "cache").expect("parse"),
            *first
        );
    }

    #[test]
    fn directory_at_model_path_is_a_storage_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join(MODEL_FILE_NAME)).expect("mkdir");
        let store = ModelStore::new(ModelSource::Cache {
            dir: dir.path().to_path_buf(),
        });
        let err = store.model().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert!(!store.is_loaded());
    }

    #[test]
    fn corrupt_cache_file_is_not_overwritten() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(MODEL_FILE_NAME);
        fs::write(&path, b"not json").expect("write");
        let store = ModelStore::new(ModelSource::Cache {
            dir: dir.path().to_path_buf(),
        });
        assert_eq!(store.model().unwrap_err().kind(), ErrorKind::ModelLoad);
        assert_eq!(fs::read(&path).expect("read"), b"not json");
    }

    #[test]
    fn missing_model_file_is_model_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ModelStore::new(ModelSource::file(dir.path().join("absent.json")));
        assert_eq!(store.model().unwrap_err().kind(), ErrorKind::ModelLoad);
    }

    #[test]
    fn trained_file_round_trips_through_the_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("model.json");
        let model = constant_model(8);
        fs::write(&path, model.to_json_bytes().expect("json")).expect("write");
        let store = ModelStore::new(ModelSource::file(&path));
        assert_eq!(*store.model().expect("model"), model);
    }

    #[test]
    fn preloaded_store_never_loads() {
        let store = ModelStore::preloaded(constant_model(3));
        assert!(store.is_loaded());
        assert_eq!(store.model().expect("model").classes.len(), 9);
    }
}
