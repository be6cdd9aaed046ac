//! Hierarchical byte stores the asserter reads fixtures from and writes them to.
//!
//! Handles are plain [`Read`]/[`Write`] values; dropping a handle closes it,
//! so a fixture file is released on every exit path of an assertion.

mod memory;
mod os;

pub use memory::{Faults, MemoryReader, MemoryStorage, MemoryWriter};
pub use os::OsStorage;

use std::io::{self, Read, Write};
use std::path::Path;

/// A byte-addressable store organised in directories.
pub trait Storage {
    /// Handle returned by [`Storage::open`].
    type Reader: Read;
    /// Handle returned by [`Storage::create`].
    type Writer: Write;

    /// Opens an existing file for reading.
    fn open(&self, path: &Path) -> io::Result<Self::Reader>;

    /// Creates a file for writing, truncating any existing content.
    fn create(&self, path: &Path) -> io::Result<Self::Writer>;

    /// Creates `path` and every missing ancestor. Succeeds if it already exists.
    fn mkdir_all(&self, path: &Path) -> io::Result<()>;
}

impl<S: Storage + ?Sized> Storage for &S {
    type Reader = S::Reader;
    type Writer = S::Writer;

    fn open(&self, path: &Path) -> io::Result<Self::Reader> {
        (**self).open(path)
    }

    fn create(&self, path: &Path) -> io::Result<Self::Writer> {
        (**self).create(path)
    }

    fn mkdir_all(&self, path: &Path) -> io::Result<()> {
        (**self).mkdir_all(path)
    }
}
