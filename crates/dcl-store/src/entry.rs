use serde::{Deserialize, Serialize};

use dcl_types::ContentHash;

/// Observable state of a content hash in the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentStatus {
    /// The store has never seen this hash.
    Unknown,
    /// The hash is referenced by some drift but bytes have not been
    /// uploaded yet.
    Empty,
    /// Bytes are present.
    Loaded,
}

impl std::fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Empty => write!(f, "empty"),
            Self::Loaded => write!(f, "loaded"),
        }
    }
}

/// One stored content record: a hash plus, once uploaded, its payload.
///
/// A single tagged entity covers both the metadata-only and with-payload
/// cases; `data == None` is the `Empty` state. The transition to `Loaded`
/// happens exactly once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    hash: ContentHash,
    data: Option<Vec<u8>>,
}

impl ContentEntry {
    /// Create an entry for a referenced-but-not-yet-uploaded hash.
    pub fn empty(hash: ContentHash) -> Self {
        Self { hash, data: None }
    }

    /// Create a loaded entry. The caller has already verified that the
    /// bytes hash to `hash`.
    pub fn loaded(hash: ContentHash, data: Vec<u8>) -> Self {
        Self {
            hash,
            data: Some(data),
        }
    }

    /// The content-addressing key.
    pub fn hash(&self) -> ContentHash {
        self.hash
    }

    /// `Empty` or `Loaded` (never `Unknown` — an entry exists).
    pub fn status(&self) -> ContentStatus {
        if self.data.is_some() {
            ContentStatus::Loaded
        } else {
            ContentStatus::Empty
        }
    }

    /// Byte length, known once loaded.
    pub fn size(&self) -> Option<u64> {
        self.data.as_ref().map(|d| d.len() as u64)
    }

    /// The payload, if loaded.
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Fill in the payload. Returns `false` (and changes nothing) if the
    /// entry is already loaded.
    pub(crate) fn load(&mut self, data: Vec<u8>) -> bool {
        if self.data.is_some() {
            return false;
        }
        self.data = Some(data);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(b: u8) -> ContentHash {
        ContentHash::from_raw([b; 32])
    }

    #[test]
    fn empty_entry_has_no_size() {
        let entry = ContentEntry::empty(hash(1));
        assert_eq!(entry.status(), ContentStatus::Empty);
        assert_eq!(entry.size(), None);
        assert_eq!(entry.data(), None);
    }

    #[test]
    fn loaded_entry_reports_size() {
        let entry = ContentEntry::loaded(hash(1), b"12345".to_vec());
        assert_eq!(entry.status(), ContentStatus::Loaded);
        assert_eq!(entry.size(), Some(5));
        assert_eq!(entry.data(), Some(&b"12345"[..]));
    }

    #[test]
    fn load_transitions_exactly_once() {
        let mut entry = ContentEntry::empty(hash(1));
        assert!(entry.load(b"first".to_vec()));
        assert!(!entry.load(b"second".to_vec()));
        assert_eq!(entry.data(), Some(&b"first"[..]));
    }
}
