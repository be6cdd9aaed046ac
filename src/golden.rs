//! The golden-file asserter.

use crate::config::Settings;
use crate::content_hash::ContentHash;
use crate::encoding;
use crate::error::GoldenError;
use crate::report::{Mismatch, ReportSink};
use crate::storage::{OsStorage, Storage};
use serde::Serialize;
use std::fmt;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{Level, debug};

/// Default directory fixtures are stored in.
pub const DEFAULT_FIXTURE_DIR: &str = "testdata";
/// Default fixture file name suffix.
pub const DEFAULT_FIXTURE_SUFFIX: &str = ".golden";

static CWD_STORAGE: OsStorage = OsStorage::cwd();

/// Asserts payloads against golden fixture files.
///
/// In update mode each assertion (re)writes the fixture. Otherwise the stored
/// fixture is read and compared byte for byte with the payload. Failures are
/// reported to the sink and never abort the caller.
///
/// The fixture for `name` lives at
/// `<fixture_dir>/<fixture_prefix><name><fixture_suffix>`, by default
/// `testdata/<name>.golden`.
///
/// # Examples
///
/// ```no_run
/// use golden::{Golden, Reporter};
///
/// let reporter = Reporter::new();
/// let mut golden = Golden::new(&reporter);
/// golden.update = std::env::var_os("GOLDEN_UPDATE").is_some();
///
/// golden.assert_bytes("greeting", b"hello");
/// ```
pub struct Golden<'a, S: Storage + ?Sized = OsStorage> {
    storage: &'a S,
    sink: &'a dyn ReportSink,

    /// Write fixtures instead of comparing against them.
    pub update: bool,
    pub fixture_dir: PathBuf,
    pub fixture_prefix: String,
    pub fixture_suffix: String,
}

impl<'a> Golden<'a> {
    /// Creates an asserter over the filesystem, relative to the working directory.
    pub fn new(sink: &'a dyn ReportSink) -> Self {
        Self::with_storage(&CWD_STORAGE, sink)
    }
}

impl<'a, S: Storage + ?Sized> Golden<'a, S> {
    /// Creates an asserter over `storage` with default settings.
    pub fn with_storage(storage: &'a S, sink: &'a dyn ReportSink) -> Self {
        Self {
            storage,
            sink,
            update: false,
            fixture_dir: PathBuf::from(DEFAULT_FIXTURE_DIR),
            fixture_prefix: String::new(),
            fixture_suffix: DEFAULT_FIXTURE_SUFFIX.to_string(),
        }
    }

    /// Applies `settings`, leaving fields they do not set unchanged.
    pub fn configure(&mut self, settings: &Settings) -> &mut Self {
        if let Some(update) = settings.update {
            self.update = update;
        }
        if let Some(dir) = &settings.fixture_dir {
            self.fixture_dir = dir.clone();
        }
        if let Some(prefix) = &settings.fixture_prefix {
            self.fixture_prefix = prefix.clone();
        }
        if let Some(suffix) = &settings.fixture_suffix {
            self.fixture_suffix = suffix.clone();
        }
        self
    }

    /// Returns the fixture path for `name`.
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.fixture_dir.join(format!(
            "{}{}{}",
            self.fixture_prefix, name, self.fixture_suffix
        ))
    }

    /// Asserts that `got` equals the fixture stored under `name`, or stores
    /// `got` as that fixture in update mode.
    pub fn assert_bytes(&self, name: &str, got: impl AsRef<[u8]>) {
        let got = got.as_ref();
        let path = self.file_path(name);

        if self.update {
            match self.write_file(&path, got) {
                Ok(()) => {
                    if tracing::enabled!(Level::DEBUG) {
                        let hash = ContentHash::compute(got);
                        debug!(
                            path = %path.display(),
                            bytes = got.len(),
                            sha256 = hash.short(),
                            "updated golden fixture"
                        );
                    }
                }
                Err(error) => self.sink.report_error(error),
            }
            return;
        }

        match self.read_file(&path) {
            Ok(want) if want == got => {
                debug!(path = %path.display(), bytes = got.len(), "golden fixture matches");
            }
            Ok(want) => self.sink.report_unequal(Mismatch {
                path,
                want,
                got: got.to_vec(),
            }),
            Err(error) => self.sink.report_error(error),
        }
    }

    /// Encodes `got` deterministically and asserts the bytes like
    /// [`assert_bytes`](Self::assert_bytes).
    ///
    /// If `got` cannot be encoded the failure is reported and no fixture is
    /// read or written.
    pub fn assert_value<T: Serialize + ?Sized>(&self, name: &str, got: &T) {
        match encoding::encode(got) {
            Ok(bytes) => self.assert_bytes(name, bytes),
            Err(source) => self.sink.report_error(GoldenError::Encode {
                type_name: std::any::type_name::<T>(),
                source,
            }),
        }
    }

    fn write_file(&self, path: &Path, data: &[u8]) -> Result<(), GoldenError> {
        let dir = path.parent().unwrap_or(Path::new(""));
        self.storage
            .mkdir_all(dir)
            .map_err(|source| GoldenError::DirectoryCreate {
                path: dir.to_path_buf(),
                source,
            })?;

        let mut file = self
            .storage
            .create(path)
            .map_err(|source| GoldenError::Create {
                path: path.to_path_buf(),
                source,
            })?;

        let mut written = 0;
        while written < data.len() {
            match file.write(&data[written..]) {
                Ok(0) => {
                    return Err(GoldenError::ShortWrite {
                        path: path.to_path_buf(),
                        written,
                        expected: data.len(),
                    });
                }
                Ok(n) => written += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(source) => {
                    return Err(GoldenError::Write {
                        path: path.to_path_buf(),
                        source,
                    });
                }
            }
        }

        Ok(())
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>, GoldenError> {
        let mut file = self.storage.open(path).map_err(|source| GoldenError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut data = Vec::new();
        file.read_to_end(&mut data)
            .map_err(|source| GoldenError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(data)
    }
}

impl<S: Storage + ?Sized> Clone for Golden<'_, S> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage,
            sink: self.sink,
            update: self.update,
            fixture_dir: self.fixture_dir.clone(),
            fixture_prefix: self.fixture_prefix.clone(),
            fixture_suffix: self.fixture_suffix.clone(),
        }
    }
}

impl<S: Storage + ?Sized> fmt::Debug for Golden<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Golden")
            .field("update", &self.update)
            .field("fixture_dir", &self.fixture_dir)
            .field("fixture_prefix", &self.fixture_prefix)
            .field("fixture_suffix", &self.fixture_suffix)
            .finish_non_exhaustive()
    }
}
