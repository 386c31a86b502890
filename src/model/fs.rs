//! Filesystem seam for the model cache.
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// What a path currently points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Other,
}

pub trait ModelFileSystem: Send + Sync {
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;
    /// Readers must only ever see no file or the complete contents.
    fn write_file(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;
    /// `Err` with [`io::ErrorKind::NotFound`] when nothing exists at `path`.
    fn stat(&self, path: &Path) -> io::Result<EntryKind>;
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// [`ModelFileSystem`] backed by `std::fs`.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsFileSystem;

impl ModelFileSystem for OsFileSystem {
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    /// Stage into a hidden sibling and rename it over `path`. A crash leaves
    /// at most a stray `.<name>.*.tmp`, never a truncated model.
    fn write_file(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let dir = match path.parent() {
            Some(d) if !d.as_os_str().is_empty() => d,
            _ => Path::new("."),
        };
        let mut prefix = OsString::from(".");
        prefix.push(path.file_name().unwrap_or_default());
        prefix.push(".");
        let mut staged = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".tmp")
            .tempfile_in(dir)?;
        staged.write_all(bytes)?;
        staged.as_file().sync_all()?;
        staged.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn stat(&self, path: &Path) -> io::Result<EntryKind> {
        let meta = fs::metadata(path)?;
        Ok(if meta.is_file() {
            EntryKind::File
        } else if meta.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::Other
        })
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_distinguishes_files_directories_and_absence() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("model.json");
        let fs = OsFileSystem;
        assert_eq!(
            fs.stat(&file).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
        fs.write_file(&file, b"{}").expect("write");
        assert_eq!(fs.stat(&file).expect("stat"), EntryKind::File);
        assert_eq!(fs.stat(dir.path()).expect("stat"), EntryKind::Directory);
        assert_eq!(fs.read_file(&file).expect("read"), b"{}");
    }

    #[test]
    fn write_replaces_the_file_and_leaves_no_staging_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("sudokuSVMModel.json");
        let fs = OsFileSystem;
        fs.write_file(&file, b"first version, longer").expect("write");
        fs.write_file(&file, b"second").expect("rewrite");
        assert_eq!(fs.read_file(&file).expect("read"), b"second");
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .expect("list")
            .map(|e| e.expect("entry").file_name())
            .collect();
        assert_eq!(names, vec![OsString::from("sudokuSVMModel.json")]);
    }

    #[test]
    fn failed_write_creates_nothing_at_the_target() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("missing").join("sudokuSVMModel.json");
        assert!(OsFileSystem.write_file(&file, b"{}").is_err());
        assert_eq!(
            OsFileSystem.stat(&file).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }
}
