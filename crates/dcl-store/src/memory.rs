use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use dcl_types::ContentHash;

use crate::entry::{ContentEntry, ContentStatus};
use crate::error::{StoreError, StoreResult};
use crate::traits::ContentStore;

/// In-memory, HashMap-based content store.
///
/// Intended for tests and embedding. All entries are held in memory behind
/// a `RwLock`; payloads are cloned on read.
pub struct InMemoryContentStore {
    entries: RwLock<HashMap<ContentHash, ContentEntry>>,
}

impl InMemoryContentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of known hashes (empty and loaded).
    pub fn len(&self) -> usize {
        self.entries.read().expect("lock poisoned").len()
    }

    /// Returns `true` if no hash has ever been registered or stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().expect("lock poisoned").is_empty()
    }

    /// Number of entries with bytes present.
    pub fn loaded_len(&self) -> usize {
        self.entries
            .read()
            .expect("lock poisoned")
            .values()
            .filter(|e| e.status() == ContentStatus::Loaded)
            .count()
    }

    /// Total bytes across all loaded entries.
    pub fn total_bytes(&self) -> u64 {
        self.entries
            .read()
            .expect("lock poisoned")
            .values()
            .filter_map(|e| e.size())
            .sum()
    }

    /// Remove all entries.
    pub fn clear(&self) {
        self.entries.write().expect("lock poisoned").clear();
    }

    /// A sorted list of every known hash.
    pub fn all_hashes(&self) -> Vec<ContentHash> {
        let map = self.entries.read().expect("lock poisoned");
        let mut hashes: Vec<ContentHash> = map.keys().copied().collect();
        hashes.sort();
        hashes
    }
}

impl Default for InMemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentStore for InMemoryContentStore {
    fn put(&self, hash: ContentHash, bytes: &[u8]) -> StoreResult<()> {
        let computed = ContentHash::of_bytes(bytes);
        if computed != hash {
            return Err(StoreError::HashMismatch {
                expected: hash,
                computed,
            });
        }

        let mut map = self.entries.write().expect("lock poisoned");
        match map.get_mut(&hash) {
            Some(entry) => {
                // First writer wins; identical later writers are no-ops.
                // The digest check above already proved the bytes match.
                if entry.load(bytes.to_vec()) {
                    debug!(hash = %hash.short_hex(), size = bytes.len(), "content loaded");
                }
            }
            None => {
                map.insert(hash, ContentEntry::loaded(hash, bytes.to_vec()));
                debug!(hash = %hash.short_hex(), size = bytes.len(), "content stored");
            }
        }
        Ok(())
    }

    fn get(&self, hash: &ContentHash) -> StoreResult<Option<Vec<u8>>> {
        let map = self.entries.read().expect("lock poisoned");
        Ok(map.get(hash).and_then(|e| e.data().map(<[u8]>::to_vec)))
    }

    fn status(&self, hash: &ContentHash) -> StoreResult<ContentStatus> {
        let map = self.entries.read().expect("lock poisoned");
        Ok(map
            .get(hash)
            .map(ContentEntry::status)
            .unwrap_or(ContentStatus::Unknown))
    }

    fn size(&self, hash: &ContentHash) -> StoreResult<Option<u64>> {
        let map = self.entries.read().expect("lock poisoned");
        Ok(map.get(hash).and_then(ContentEntry::size))
    }

    fn register_reference(&self, hash: ContentHash) -> StoreResult<()> {
        let mut map = self.entries.write().expect("lock poisoned");
        map.entry(hash).or_insert_with(|| {
            debug!(hash = %hash.short_hex(), "content referenced before upload");
            ContentEntry::empty(hash)
        });
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryContentStore")
            .field("entry_count", &self.len())
            .field("loaded_count", &self.loaded_len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put_bytes(store: &InMemoryContentStore, bytes: &[u8]) -> ContentHash {
        let hash = ContentHash::of_bytes(bytes);
        store.put(hash, bytes).unwrap();
        hash
    }

    // -----------------------------------------------------------------------
    // put / get
    // -----------------------------------------------------------------------

    #[test]
    fn put_and_get() {
        let store = InMemoryContentStore::new();
        let hash = put_bytes(&store, b"hello world");
        assert_eq!(store.get(&hash).unwrap(), Some(b"hello world".to_vec()));
    }

    #[test]
    fn get_unknown_hash_returns_none() {
        let store = InMemoryContentStore::new();
        let hash = ContentHash::of_bytes(b"never stored");
        assert_eq!(store.get(&hash).unwrap(), None);
    }

    #[test]
    fn get_empty_entry_returns_none() {
        let store = InMemoryContentStore::new();
        let hash = ContentHash::of_bytes(b"referenced only");
        store.register_reference(hash).unwrap();
        assert_eq!(store.get(&hash).unwrap(), None);
    }

    #[test]
    fn put_rejects_mismatched_bytes() {
        let store = InMemoryContentStore::new();
        let hash = ContentHash::of_bytes(b"the real content");
        let err = store.put(hash, b"different content").unwrap_err();
        assert!(matches!(err, StoreError::HashMismatch { expected, .. } if expected == hash));
        // Nothing was stored.
        assert_eq!(store.status(&hash).unwrap(), ContentStatus::Unknown);
    }

    #[test]
    fn put_is_idempotent() {
        let store = InMemoryContentStore::new();
        let hash = put_bytes(&store, b"idempotent");
        store.put(hash, b"idempotent").unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&hash).unwrap(), Some(b"idempotent".to_vec()));
    }

    #[test]
    fn put_mismatch_on_loaded_entry_is_rejected() {
        let store = InMemoryContentStore::new();
        let hash = put_bytes(&store, b"original");
        let err = store.put(hash, b"tampered").unwrap_err();
        assert!(matches!(err, StoreError::HashMismatch { .. }));
        // The original payload survives.
        assert_eq!(store.get(&hash).unwrap(), Some(b"original".to_vec()));
    }

    // -----------------------------------------------------------------------
    // status / size
    // -----------------------------------------------------------------------

    #[test]
    fn status_transitions() {
        let store = InMemoryContentStore::new();
        let hash = ContentHash::of_bytes(b"lifecycle");

        assert_eq!(store.status(&hash).unwrap(), ContentStatus::Unknown);

        store.register_reference(hash).unwrap();
        assert_eq!(store.status(&hash).unwrap(), ContentStatus::Empty);

        store.put(hash, b"lifecycle").unwrap();
        assert_eq!(store.status(&hash).unwrap(), ContentStatus::Loaded);
    }

    #[test]
    fn size_known_once_loaded() {
        let store = InMemoryContentStore::new();
        let hash = ContentHash::of_bytes(b"12345");
        store.register_reference(hash).unwrap();
        assert_eq!(store.size(&hash).unwrap(), None);

        store.put(hash, b"12345").unwrap();
        assert_eq!(store.size(&hash).unwrap(), Some(5));
    }

    // -----------------------------------------------------------------------
    // register_reference
    // -----------------------------------------------------------------------

    #[test]
    fn register_reference_is_idempotent() {
        let store = InMemoryContentStore::new();
        let hash = ContentHash::of_bytes(b"ref");
        store.register_reference(hash).unwrap();
        store.register_reference(hash).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn register_reference_does_not_downgrade_loaded_entry() {
        let store = InMemoryContentStore::new();
        let hash = put_bytes(&store, b"loaded first");
        store.register_reference(hash).unwrap();
        assert_eq!(store.status(&hash).unwrap(), ContentStatus::Loaded);
        assert_eq!(store.get(&hash).unwrap(), Some(b"loaded first".to_vec()));
    }

    #[test]
    fn upload_after_reference_fills_entry() {
        let store = InMemoryContentStore::new();
        let hash = ContentHash::of_bytes(b"late blob");
        store.register_reference(hash).unwrap();
        store.put(hash, b"late blob").unwrap();
        assert_eq!(store.get(&hash).unwrap(), Some(b"late blob".to_vec()));
    }

    // -----------------------------------------------------------------------
    // Deduplication
    // -----------------------------------------------------------------------

    #[test]
    fn identical_content_is_stored_once() {
        let store = InMemoryContentStore::new();
        let h1 = put_bytes(&store, b"shared bytes");
        let h2 = put_bytes(&store, b"shared bytes");
        assert_eq!(h1, h2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.total_bytes(), 12);
    }

    #[test]
    fn different_content_produces_separate_entries() {
        let store = InMemoryContentStore::new();
        let h1 = put_bytes(&store, b"aaa");
        let h2 = put_bytes(&store, b"bbb");
        assert_ne!(h1, h2);
        assert_eq!(store.len(), 2);
    }

    // -----------------------------------------------------------------------
    // Utility methods
    // -----------------------------------------------------------------------

    #[test]
    fn len_counts_empty_and_loaded() {
        let store = InMemoryContentStore::new();
        put_bytes(&store, b"loaded");
        store
            .register_reference(ContentHash::of_bytes(b"pending"))
            .unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.loaded_len(), 1);
    }

    #[test]
    fn clear_removes_all() {
        let store = InMemoryContentStore::new();
        put_bytes(&store, b"a");
        put_bytes(&store, b"b");
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn all_hashes_is_sorted() {
        let store = InMemoryContentStore::new();
        put_bytes(&store, b"one");
        put_bytes(&store, b"two");
        put_bytes(&store, b"three");

        let hashes = store.all_hashes();
        assert_eq!(hashes.len(), 3);
        for w in hashes.windows(2) {
            assert!(w[0] <= w[1]);
        }
    }

    // -----------------------------------------------------------------------
    // Concurrency
    // -----------------------------------------------------------------------

    #[test]
    fn concurrent_puts_of_same_hash_are_safe() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(InMemoryContentStore::new());
        let bytes = b"contended content".to_vec();
        let hash = ContentHash::of_bytes(&bytes);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let bytes = bytes.clone();
                thread::spawn(move || {
                    store.put(hash, &bytes).unwrap();
                })
            })
            .collect();

        for h in handles {
            h.join().expect("thread should not panic");
        }

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&hash).unwrap(), Some(bytes));
    }

    // -----------------------------------------------------------------------
    // Debug / Default
    // -----------------------------------------------------------------------

    #[test]
    fn default_creates_empty_store() {
        assert!(InMemoryContentStore::default().is_empty());
    }

    #[test]
    fn debug_format() {
        let store = InMemoryContentStore::new();
        put_bytes(&store, b"x");
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryContentStore"));
        assert!(debug.contains("entry_count"));
    }
}
