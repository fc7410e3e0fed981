//! Extracted document text as of one run.

use sha2::{Digest, Sha256};

/// Immutable text block produced by the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot(String);

impl Snapshot {
    pub fn text(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Hex SHA-256 of the text.
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(self.0.as_bytes()))
    }

    /// First 12 hex characters of [`Self::digest`], for log lines.
    pub fn short_digest(&self) -> String {
        self.digest()[..12].to_string()
    }
}

impl From<String> for Snapshot {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for Snapshot {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable_sha256() {
        let snapshot = Snapshot::from("abc");
        assert_eq!(
            snapshot.digest(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(snapshot.short_digest(), "ba7816bf8f01");
    }

    #[test]
    fn empty_snapshot() {
        let snapshot = Snapshot::default();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.len(), 0);
    }
}
