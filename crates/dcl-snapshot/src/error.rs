use dcl_ledger::LedgerError;

/// Errors produced by snapshot construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    /// The requested version is beyond the ledger head. Never clamped:
    /// a partial snapshot must not masquerade as the requested one.
    #[error("version {requested} not found (head is {head})")]
    VersionNotFound { requested: u32, head: u32 },

    /// Failure reading the underlying ledger.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
