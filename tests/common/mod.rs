//! Shared helpers for golden integration tests.

use golden::{Golden, OsStorage, Reporter, Settings};
use std::path::PathBuf;

/// Returns the crate root, which holds the committed fixtures under `tests/testdata`.
pub fn manifest_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Filesystem storage rooted at the crate directory.
pub fn crate_storage() -> OsStorage {
    OsStorage::rooted(manifest_dir())
}

/// Asserter over the committed fixtures.
///
/// Update mode follows `GOLDEN_UPDATE`, so `GOLDEN_UPDATE=1 cargo test`
/// rewrites the fixtures.
///
/// # Panics
///
/// Panics if `GOLDEN_UPDATE` holds an unrecognised value.
pub fn committed<'a>(storage: &'a OsStorage, reporter: &'a Reporter) -> Golden<'a> {
    let settings = Settings::from_env().expect("invalid golden settings in environment");
    let mut golden = Golden::with_storage(storage, reporter);
    golden.update = settings.update.unwrap_or(false);
    golden.fixture_dir = PathBuf::from("tests/testdata");
    golden
}
