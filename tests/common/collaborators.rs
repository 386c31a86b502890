//! Counting and in-memory stand-ins for the model store's collaborators.
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use sudoku_parser::model::{AssetSource, BundledAssets, EntryKind, ModelFileSystem};

#[derive(Default)]
pub struct CountingAssets {
    pub loads: AtomicUsize,
}

impl CountingAssets {
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl AssetSource for CountingAssets {
    fn load(&self, name: &str) -> io::Result<Vec<u8>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        BundledAssets.load(name)
    }
}

/// Filesystem held in memory. `stat_error` forces every `stat` to fail.
#[derive(Default)]
pub struct MemoryFs {
    pub files: Mutex<HashMap<PathBuf, Vec<u8>>>,
    pub dirs: Mutex<Vec<PathBuf>>,
    pub writes: AtomicUsize,
    pub reads: AtomicUsize,
    pub stat_error: Option<io::ErrorKind>,
}

impl MemoryFs {
    pub fn failing_stat(kind: io::ErrorKind) -> Self {
        Self {
            stat_error: Some(kind),
            ..Default::default()
        }
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn insert(&self, path: &Path, bytes: Vec<u8>) {
        self.files
            .lock()
            .expect("files lock")
            .insert(path.to_path_buf(), bytes);
    }
}

impl ModelFileSystem for MemoryFs {
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.files
            .lock()
            .expect("files lock")
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }

    fn write_file(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.insert(path, bytes.to_vec());
        Ok(())
    }

    fn stat(&self, path: &Path) -> io::Result<EntryKind> {
        if let Some(kind) = self.stat_error {
            return Err(io::Error::new(kind, "stat failed"));
        }
        if self.files.lock().expect("files lock").contains_key(path) {
            return Ok(EntryKind::File);
        }
        if self.dirs.lock().expect("dirs lock").iter().any(|d| d == path) {
            return Ok(EntryKind::Directory);
        }
        Err(io::Error::new(io::ErrorKind::NotFound, "no such entry"))
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.dirs
            .lock()
            .expect("dirs lock")
            .push(path.to_path_buf());
        Ok(())
    }
}
