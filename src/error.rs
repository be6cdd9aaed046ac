//! Failures raised while reading, writing or encoding a golden fixture.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by the asserter.
///
/// Each variant carries the derived fixture path so the report points at the
/// file that needs attention.
#[derive(Debug, Error)]
pub enum GoldenError {
    #[error("mkdir all {path}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("create {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("write {path}: could only write {written} of {expected} bytes")]
    ShortWrite {
        path: PathBuf,
        written: usize,
        expected: usize,
    },

    #[error("read file: open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("read file: read all {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to encode instance of {type_name}: {source}")]
    Encode {
        type_name: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Coarse classification of a [`GoldenError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DirectoryCreateFailure,
    WriteFailure,
    OpenFailure,
    ReadFailure,
    EncodingFailure,
}

impl GoldenError {
    /// Returns the failure category.
    ///
    /// Failing to create the file, a failed write and a short write all count
    /// as [`ErrorKind::WriteFailure`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            GoldenError::DirectoryCreate { .. } => ErrorKind::DirectoryCreateFailure,
            GoldenError::Create { .. }
            | GoldenError::Write { .. }
            | GoldenError::ShortWrite { .. } => ErrorKind::WriteFailure,
            GoldenError::Open { .. } => ErrorKind::OpenFailure,
            GoldenError::Read { .. } => ErrorKind::ReadFailure,
            GoldenError::Encode { .. } => ErrorKind::EncodingFailure,
        }
    }

    /// Returns the path the failure relates to: the fixture file, or its
    /// directory for [`GoldenError::DirectoryCreate`]. Encoding failures have none.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            GoldenError::DirectoryCreate { path, .. }
            | GoldenError::Create { path, .. }
            | GoldenError::Write { path, .. }
            | GoldenError::ShortWrite { path, .. }
            | GoldenError::Open { path, .. }
            | GoldenError::Read { path, .. } => Some(path),
            GoldenError::Encode { .. } => None,
        }
    }
}
