//! Error taxonomy shared by every pipeline stage.
//!
//! Each stage fails fast with one variant; nothing in the crate recovers
//! locally except the lazy model load in [`crate::model::ModelStore`].
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SudokuError>;

#[derive(Debug, Error)]
pub enum SudokuError {
    /// The input buffer is empty, truncated, or not an image format we decode.
    #[error("failed to decode image: {reason}")]
    Decode { reason: String },

    /// An image could not be written out (PNG dumps, test fixtures).
    #[error("failed to encode image: {reason}")]
    Encode { reason: String },

    /// No quadrilateral cleared the locator's checks.
    #[error("no sudoku grid found ({candidates} candidates examined): {reason}")]
    GridNotFound { candidates: usize, reason: String },

    /// The rectified grid could not be split into 81 cells.
    #[error("cell segmentation failed: {0}")]
    Segmentation(String),

    #[error("classification failed for cell ({row}, {col}): {reason}")]
    Classification {
        row: usize,
        col: usize,
        reason: String,
    },

    #[error("failed to load model from {origin}: {reason}")]
    ModelLoad { origin: String, reason: String },

    #[error("invalid training data: {0}")]
    TrainingData(String),

    #[error("storage error at {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },
}

/// Fieldless mirror of [`SudokuError`] for matching on the failure class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Decode,
    Encode,
    GridNotFound,
    Segmentation,
    Classification,
    ModelLoad,
    TrainingData,
    Storage,
    Io,
    Config,
}

impl SudokuError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SudokuError::Decode { .. } => ErrorKind::Decode,
            SudokuError::Encode { .. } => ErrorKind::Encode,
            SudokuError::GridNotFound { .. } => ErrorKind::GridNotFound,
            SudokuError::Segmentation(_) => ErrorKind::Segmentation,
            SudokuError::Classification { .. } => ErrorKind::Classification,
            SudokuError::ModelLoad { .. } => ErrorKind::ModelLoad,
            SudokuError::TrainingData(_) => ErrorKind::TrainingData,
            SudokuError::Storage { .. } => ErrorKind::Storage,
            SudokuError::Io { .. } => ErrorKind::Io,
            SudokuError::Config { .. } => ErrorKind::Config,
        }
    }

    /// True when running the pipeline again on altered input (crop, exposure,
    /// a different photo) may succeed. Only a missing grid qualifies.
    pub fn is_retryable_with_preprocessing(&self) -> bool {
        self.kind() == ErrorKind::GridNotFound
    }

    pub(crate) fn decode(reason: impl Into<String>) -> Self {
        SudokuError::Decode {
            reason: reason.into(),
        }
    }

    pub(crate) fn model_load(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        SudokuError::ModelLoad {
            origin: origin.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SudokuError::Storage {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_grid_not_found_is_retryable() {
        let missing = SudokuError::GridNotFound {
            candidates: 3,
            reason: "too small".into(),
        };
        assert!(missing.is_retryable_with_preprocessing());
        assert_eq!(missing.kind(), ErrorKind::GridNotFound);

        let decode = SudokuError::decode("empty buffer");
        assert!(!decode.is_retryable_with_preprocessing());
        assert_eq!(decode.kind(), ErrorKind::Decode);
    }

    #[test]
    fn storage_message_names_the_path() {
        let err = SudokuError::storage(
            "/tmp/model.json",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/model.json"), "{msg}");
        assert!(msg.contains("denied"), "{msg}");
    }
}
