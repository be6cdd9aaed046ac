//! The real filesystem.

use super::Storage;
use std::borrow::Cow;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// Filesystem storage, relative to the working directory or to a fixed root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsStorage {
    root: Option<PathBuf>,
}

impl OsStorage {
    /// Storage that resolves paths against the process working directory.
    pub const fn cwd() -> Self {
        Self { root: None }
    }

    /// Storage that resolves every path under `root`.
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// Returns the root directory, if one was set.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    fn resolve<'p>(&self, path: &'p Path) -> Cow<'p, Path> {
        match &self.root {
            Some(root) => Cow::Owned(root.join(path)),
            None => Cow::Borrowed(path),
        }
    }
}

impl Storage for OsStorage {
    type Reader = File;
    type Writer = File;

    fn open(&self, path: &Path) -> io::Result<File> {
        File::open(self.resolve(path))
    }

    fn create(&self, path: &Path) -> io::Result<File> {
        File::create(self.resolve(path))
    }

    fn mkdir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(self.resolve(path))
    }
}
