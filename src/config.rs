//! Caller-owned asserter settings, optionally read from the environment.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::PathBuf;

/// Turns update mode on when set to a truthy value.
pub const UPDATE_VAR: &str = "GOLDEN_UPDATE";
/// Overrides the fixture directory.
pub const DIR_VAR: &str = "GOLDEN_DIR";
/// Overrides the fixture file name prefix.
pub const PREFIX_VAR: &str = "GOLDEN_PREFIX";
/// Overrides the fixture file name suffix.
pub const SUFFIX_VAR: &str = "GOLDEN_SUFFIX";

/// Settings applied to a [`Golden`](crate::Golden) with
/// [`Golden::configure`](crate::Golden::configure).
///
/// Unset (`None`) fields leave the asserter's current value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub update: Option<bool>,
    pub fixture_dir: Option<PathBuf>,
    pub fixture_prefix: Option<String>,
    pub fixture_suffix: Option<String>,
}

impl Settings {
    /// Reads settings from `GOLDEN_UPDATE`, `GOLDEN_DIR`, `GOLDEN_PREFIX`
    /// and `GOLDEN_SUFFIX`.
    ///
    /// # Errors
    ///
    /// Returns an error if `GOLDEN_UPDATE` is not a recognised boolean.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    ///
    /// Returns an error if the update variable is not a recognised boolean.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let update = lookup(UPDATE_VAR)
            .map(|value| parse_flag(&value))
            .transpose()
            .with_context(|| format!("invalid value for {UPDATE_VAR}"))?;
        Ok(Self {
            update,
            fixture_dir: lookup(DIR_VAR).map(PathBuf::from),
            fixture_prefix: lookup(PREFIX_VAR),
            fixture_suffix: lookup(SUFFIX_VAR),
        })
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("{other:?} is not a boolean (expected true or false)"),
    }
}
