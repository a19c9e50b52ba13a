//! Content fingerprinting for within-run image deduplication.

use sha2::{Digest, Sha256};
use std::fmt;

/// Equality key derived from an embedded image's raw byte payload.
///
/// Scoped to a single extraction run and used only for deduplication,
/// never for long-term identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentFingerprint(String);

impl fmt::Display for ContentFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the SHA-256 fingerprint of an image payload, as a hex string.
pub fn fingerprint(content: &[u8]) -> ContentFingerprint {
    let mut hasher = Sha256::new();
    hasher.update(content);
    ContentFingerprint(format!("{:x}", hasher.finalize()))
}
