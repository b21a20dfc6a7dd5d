use dcl_types::ContentHash;

/// Errors from content store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The offered bytes do not hash to the key they were stored under.
    /// Either the payload is corrupt or the caller mixed up hashes; in
    /// both cases the store refuses the write.
    #[error("content hash mismatch: expected {expected}, computed {computed}")]
    HashMismatch {
        expected: ContentHash,
        computed: ContentHash,
    },

    /// I/O failure in a backing store.
    #[error("I/O error: {0}")]
    Io(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
