//! Content mismatch between a stored fixture and the payload under test.

use crate::content_hash::ContentHash;
use std::fmt;
use std::path::PathBuf;

/// Stored (`want`) and actual (`got`) content of a fixture that differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub path: PathBuf,
    pub want: Vec<u8>,
    pub got: Vec<u8>,
}

impl Mismatch {
    /// Offset of the first byte at which `want` and `got` differ.
    ///
    /// When one side is a prefix of the other this is the shorter length.
    /// Returns `None` when both sides are equal.
    pub fn first_difference(&self) -> Option<usize> {
        let common = self.want.len().min(self.got.len());
        self.want
            .iter()
            .zip(&self.got)
            .position(|(w, g)| w != g)
            .or_else(|| (self.want.len() != self.got.len()).then_some(common))
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let want_hash = ContentHash::compute(&self.want);
        let got_hash = ContentHash::compute(&self.got);
        write!(
            f,
            "content mismatch for {}: want {} bytes (sha256 {}), got {} bytes (sha256 {})",
            self.path.display(),
            self.want.len(),
            want_hash.short(),
            self.got.len(),
            got_hash.short(),
        )?;
        if let Some(offset) = self.first_difference() {
            write!(f, ", first difference at byte {offset}")?;
        }
        Ok(())
    }
}
