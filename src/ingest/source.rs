use std::fs::File;
use std::io::{self, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::error::{StudyError, StudyResult};

/// Contract implemented by anything that can hand out the bytes of a declared
/// data file.
///
/// Readers are shared by every concurrent import task, so implementations must
/// be `Sync` and must not depend on call order.
pub trait SourceReader: Sync {
    fn open(&self, path: &Path) -> StudyResult<Box<dyn Read + Send + '_>>;
}

/// Reads data files from the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSourceReader;

impl SourceReader for FsSourceReader {
    fn open(&self, path: &Path) -> StudyResult<Box<dyn Read + Send + '_>> {
        let file = File::open(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => StudyError::MissingFile(path.to_path_buf()),
            _ => StudyError::Io {
                path: path.to_path_buf(),
                message: err.to_string(),
            },
        })?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// In-memory data files keyed by their declared path.
///
/// Used by tests, benchmarks and hosts that already hold file contents.
#[derive(Debug, Default, Clone)]
pub struct MemorySourceReader {
    files: IndexMap<PathBuf, String>,
}

impl MemorySourceReader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl SourceReader for MemorySourceReader {
    fn open(&self, path: &Path) -> StudyResult<Box<dyn Read + Send + '_>> {
        let contents = self
            .files
            .get(path)
            .ok_or_else(|| StudyError::MissingFile(path.to_path_buf()))?;
        Ok(Box::new(Cursor::new(contents.as_bytes())))
    }
}
