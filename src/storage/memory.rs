//! In-memory storage with fault injection, for exercising assertion paths
//! that are awkward to provoke on a real filesystem.

use super::Storage;
use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Failures to inject into a [`MemoryStorage`].
///
/// Faults apply to every call made after they are set, including calls on
/// handles opened later.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Faults {
    pub mkdir: bool,
    pub create: bool,
    pub open: bool,
    pub read: bool,
    pub write: bool,
    /// Most bytes a single file can hold; writes past it accept nothing,
    /// like a full disk.
    pub file_capacity: Option<usize>,
    /// Most bytes accepted by one `write` call.
    pub max_write: Option<usize>,
    /// Number of upcoming writes that fail with `ErrorKind::Interrupted`.
    pub interrupts: usize,
}

#[derive(Debug, Default)]
struct State {
    files: BTreeMap<PathBuf, Vec<u8>>,
    dirs: BTreeSet<PathBuf>,
    faults: Faults,
    open_handles: usize,
}

impl State {
    fn is_dir(&self, path: &Path) -> bool {
        path.as_os_str().is_empty() || self.dirs.contains(path)
    }
}

/// A shared in-memory directory tree. Clones refer to the same tree.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    state: Arc<Mutex<State>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_faults(faults: Faults) -> Self {
        let storage = Self::new();
        storage.set_faults(faults);
        storage
    }

    pub fn set_faults(&self, faults: Faults) {
        self.lock().faults = faults;
    }

    /// Stores `bytes` at `path`, creating parent directories as needed.
    pub fn insert(&self, path: impl AsRef<Path>, bytes: impl Into<Vec<u8>>) {
        let path = path.as_ref();
        let mut state = self.lock();
        if let Some(parent) = path.parent() {
            add_dirs(&mut state, parent);
        }
        state.files.insert(path.to_path_buf(), bytes.into());
    }

    /// Returns a copy of the file stored at `path`.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.lock().files.get(path.as_ref()).cloned()
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.lock().files.contains_key(path.as_ref())
    }

    pub fn is_dir(&self, path: impl AsRef<Path>) -> bool {
        self.lock().is_dir(path.as_ref())
    }

    /// Number of readers and writers that have not been dropped yet.
    pub fn open_handles(&self) -> usize {
        self.lock().open_handles
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn add_dirs(state: &mut State, path: &Path) {
    for ancestor in path.ancestors() {
        if !ancestor.as_os_str().is_empty() {
            state.dirs.insert(ancestor.to_path_buf());
        }
    }
}

fn injected(operation: &str) -> io::Error {
    io::Error::other(format!("injected {operation} failure"))
}

impl Storage for MemoryStorage {
    type Reader = MemoryReader;
    type Writer = MemoryWriter;

    fn open(&self, path: &Path) -> io::Result<MemoryReader> {
        let mut state = self.lock();
        if state.faults.open {
            return Err(injected("open"));
        }
        let data = state.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}: file does not exist", path.display()),
            )
        })?;
        state.open_handles += 1;
        Ok(MemoryReader {
            state: Arc::clone(&self.state),
            data: Cursor::new(data),
        })
    }

    fn create(&self, path: &Path) -> io::Result<MemoryWriter> {
        let mut state = self.lock();
        if state.faults.create {
            return Err(injected("create"));
        }
        let parent = path.parent().unwrap_or(Path::new(""));
        if !state.is_dir(parent) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}: parent directory does not exist", path.display()),
            ));
        }
        if state.is_dir(path) {
            return Err(io::Error::other(format!(
                "{}: is a directory",
                path.display()
            )));
        }
        state.files.insert(path.to_path_buf(), Vec::new());
        state.open_handles += 1;
        Ok(MemoryWriter {
            state: Arc::clone(&self.state),
            path: path.to_path_buf(),
        })
    }

    fn mkdir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = self.lock();
        if state.faults.mkdir {
            return Err(injected("mkdir"));
        }
        if let Some(file) = path.ancestors().find(|a| state.files.contains_key(*a)) {
            return Err(io::Error::other(format!(
                "{}: not a directory",
                file.display()
            )));
        }
        add_dirs(&mut state, path);
        Ok(())
    }
}

/// Read handle over a snapshot of a stored file.
#[derive(Debug)]
pub struct MemoryReader {
    state: Arc<Mutex<State>>,
    data: Cursor<Vec<u8>>,
}

impl Read for MemoryReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let faulty = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .faults
            .read;
        if faulty {
            return Err(injected("read"));
        }
        self.data.read(buf)
    }
}

impl Drop for MemoryReader {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.open_handles -= 1;
    }
}

/// Write handle appending to a stored file.
#[derive(Debug)]
pub struct MemoryWriter {
    state: Arc<Mutex<State>>,
    path: PathBuf,
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.faults.write {
            return Err(injected("write"));
        }
        if state.faults.interrupts > 0 {
            state.faults.interrupts -= 1;
            return Err(io::ErrorKind::Interrupted.into());
        }
        let faults = state.faults;
        let file = state.files.entry(self.path.clone()).or_default();
        let room = faults
            .file_capacity
            .map_or(usize::MAX, |capacity| capacity.saturating_sub(file.len()));
        let n = buf
            .len()
            .min(room)
            .min(faults.max_write.unwrap_or(usize::MAX));
        file.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for MemoryWriter {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.open_handles -= 1;
    }
}
