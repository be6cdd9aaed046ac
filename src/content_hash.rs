//! SHA-256 digests of fixture contents, used to summarize large payloads.

use sha2::{Digest, Sha256};
use std::fmt;

/// SHA-256 hash of a byte payload as a 64-character lowercase hex string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentHash {
    hex: String,
}

impl ContentHash {
    /// Computes a SHA-256 hash of the given bytes.
    pub fn compute(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let hex = format!("{:x}", hasher.finalize());
        Self { hex }
    }

    /// Returns the full hex digest.
    pub fn as_str(&self) -> &str {
        &self.hex
    }

    /// Returns the first 12 hex characters, enough to tell payloads apart in a report.
    pub fn short(&self) -> &str {
        &self.hex[..12]
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex)
    }
}
