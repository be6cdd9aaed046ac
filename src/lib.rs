//! golden - golden-file assertions for tests
//!
//! A [`Golden`] asserter either records a payload as the reference fixture
//! for a name (update mode) or compares the payload with the stored fixture.
//! Structured values are encoded deterministically before being handled like
//! raw bytes. Failures go to a [`ReportSink`] and never abort the test early.

pub mod config;
pub mod content_hash;
pub mod encoding;
pub mod error;
pub mod golden;
pub mod report;
pub mod storage;

pub use config::Settings;
pub use error::{ErrorKind, GoldenError};
pub use golden::{DEFAULT_FIXTURE_DIR, DEFAULT_FIXTURE_SUFFIX, Golden};
pub use report::{Failure, Mismatch, ReportSink, Reporter};
pub use storage::{MemoryStorage, OsStorage, Storage};
