use dcl_types::DefinitionId;

/// Errors produced by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The appended change set does not carry the next expected version.
    /// The caller must re-read the head version and retry; the ledger
    /// never renumbers on its behalf.
    #[error("version conflict for {definition}: expected {expected}, got {actual}")]
    VersionConflict {
        definition: DefinitionId,
        expected: u32,
        actual: u32,
    },

    /// Version 0 was submitted with category `Drift`; the first change set
    /// must be a coverage baseline.
    #[error("version 0 must be a coverage change set")]
    VersionZeroNotCoverage,

    /// A version ≥ 1 was submitted with category `Coverage`; only version 0
    /// carries the baseline.
    #[error("version {0} must be a drift change set, not coverage")]
    CoverageAfterVersionZero(u32),

    /// `range` was called with `from > to`.
    #[error("invalid version range: from={from}, to={to}")]
    InvalidRange { from: u32, to: u32 },

    /// Failure while registering content references.
    #[error("content store error: {0}")]
    Store(String),
}
