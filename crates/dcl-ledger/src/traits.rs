use dcl_types::{ChangeSet, DefinitionId};

use crate::error::LedgerError;

/// Write boundary for ledger append operations.
///
/// Append is the only mutating operation. Implementations must serialize
/// appends **per definition** (version assignment is order-dependent) while
/// keeping appends for different definitions independent.
pub trait LedgerWriter: Send + Sync {
    /// Append a change set to its definition's stream.
    ///
    /// Compare-and-append: fails with [`LedgerError::VersionConflict`]
    /// unless `change_set.version()` is exactly the current head version
    /// plus one (or 0 for the first append), leaving the ledger untouched.
    /// Enforces the version-0/`Coverage` pairing in both directions. On
    /// success, every content hash the set references has been registered
    /// with the content store before the set becomes visible to readers.
    fn append(&self, change_set: ChangeSet) -> Result<(), LedgerError>;
}

/// Read boundary for ledger query operations.
///
/// The ledger below the head never changes, so every read is a consistent
/// prefix: re-requesting the same range always yields the same result,
/// regardless of concurrent appends past it.
pub trait LedgerReader: Send + Sync {
    /// The highest appended version, or `None` if the definition has no
    /// change sets yet.
    fn head_version(&self, definition: &DefinitionId) -> Result<Option<u32>, LedgerError>;

    /// The change set at an exact version, or `None` if out of range.
    fn get(
        &self,
        definition: &DefinitionId,
        version: u32,
    ) -> Result<Option<ChangeSet>, LedgerError>;

    /// Change sets in `[from, to]`, ascending by version.
    ///
    /// Versions beyond the head are simply absent from the result. Fails
    /// with [`LedgerError::InvalidRange`] if `from > to`.
    fn range(
        &self,
        definition: &DefinitionId,
        from: u32,
        to: u32,
    ) -> Result<Vec<ChangeSet>, LedgerError>;

    /// Every definition with at least one appended change set.
    fn definition_ids(&self) -> Result<Vec<DefinitionId>, LedgerError>;

    /// Number of change sets in a definition's stream.
    fn change_set_count(&self, definition: &DefinitionId) -> Result<u64, LedgerError>;
}
