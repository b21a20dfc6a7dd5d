use dcl_types::ContentHash;

use crate::entry::ContentStatus;
use crate::error::StoreResult;

/// Content-addressed, deduplicated byte store.
///
/// All implementations must satisfy these invariants:
/// - A given hash always denotes the same bytes; a `Loaded` payload is
///   never overwritten.
/// - `put` verifies the offered bytes against the key and rejects a
///   mismatch instead of storing corrupt data.
/// - Concurrent `put` calls for the same hash are first-writer-wins;
///   later identical writers are no-ops.
/// - `register_reference` is idempotent and never downgrades a `Loaded`
///   entry.
/// - All I/O errors are propagated, never silently ignored.
pub trait ContentStore: Send + Sync {
    /// Store bytes under their content hash.
    ///
    /// Verifies that `bytes` actually hash to `hash` and fails with
    /// `StoreError::HashMismatch` otherwise. If the entry is already
    /// `Loaded` the call is an idempotent no-op (the verification still
    /// runs, so re-uploading *different* bytes under a known hash is
    /// caught). Creates the entry if the hash was never seen.
    fn put(&self, hash: ContentHash, bytes: &[u8]) -> StoreResult<()>;

    /// Read the bytes for a hash.
    ///
    /// Returns `Ok(None)` if the hash is unknown or the entry is still
    /// `Empty`.
    fn get(&self, hash: &ContentHash) -> StoreResult<Option<Vec<u8>>>;

    /// Observable state of a hash: `Unknown`, `Empty`, or `Loaded`.
    fn status(&self, hash: &ContentHash) -> StoreResult<ContentStatus>;

    /// Byte length of a loaded payload, `None` otherwise.
    fn size(&self, hash: &ContentHash) -> StoreResult<Option<u64>>;

    /// Record that a change set references `hash`.
    ///
    /// Creates an `Empty` entry if none exists; does nothing (and does not
    /// fail) if the hash is already known. Called by the ledger append
    /// path before a change set becomes visible.
    fn register_reference(&self, hash: ContentHash) -> StoreResult<()>;
}
