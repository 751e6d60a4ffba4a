//! Content fingerprints for generated hardware artifacts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 128-bit XXH3 fingerprint of an artifact's bytes.
///
/// Generation is deterministic, so two compilations of the same program for
/// the same device must yield equal fingerprints for their hardware
/// description and implementation artifact.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(u128);

impl ContentHash {
    /// Fingerprints a byte slice.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(xxhash_rust::xxh3::xxh3_128(data))
    }

    /// Fingerprints UTF-8 text, such as generated HDL source.
    pub fn of_text(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    /// Returns the first eight hex digits, enough to tell builds apart in logs.
    pub fn short(&self) -> String {
        format!("{:08x}", (self.0 >> 96) as u32)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({}..)", self.short())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_text_same_hash() {
        assert_eq!(
            ContentHash::of_text("entity top is end;"),
            ContentHash::of_text("entity top is end;")
        );
        assert_ne!(ContentHash::of_text("a"), ContentHash::of_text("b"));
    }

    #[test]
    fn display_is_32_hex_digits() {
        let s = ContentHash::of_text("x").to_string();
        assert_eq!(s.len(), 32);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(s.starts_with(&ContentHash::of_text("x").short()));
    }
}
