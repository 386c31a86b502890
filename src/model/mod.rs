//! Model store and trainer.
//!
//! - [`svm`]: the persisted one-vs-rest linear model and its JSON format.
//! - [`store`]: lazy, load-once access shared by every classification call.
//! - [`assets`] / [`fs`]: collaborator seams for bundled bytes and the cache
//!   directory, replaceable in tests.
//! - [`trainer`]: dataset collection and SGD fitting.
pub mod assets;
pub mod fs;
pub mod store;
pub mod svm;
pub mod trainer;

pub use assets::{AssetSource, BundledAssets, DEFAULT_MODEL_ASSET};
pub use fs::{EntryKind, ModelFileSystem, OsFileSystem};
pub use store::{ModelSource, ModelStore, CACHE_DIR_NAME, MODEL_FILE_NAME};
pub use svm::{Model, Prediction, MODEL_VERSION};
pub use trainer::{
    train_from_config, train_with_config, training_accuracy, Trainer, TrainingOutcome,
    TrainingParams, TrainingSample, TrainingSet,
};
