use dcl_ledger::LedgerError;
use dcl_protocol::ProtocolError;
use dcl_snapshot::SnapshotError;
use dcl_store::StoreError;
use dcl_types::DefinitionId;

/// Errors from the tracker facade.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackerError {
    /// The definition id was never registered. Distinct from a registered
    /// definition that reported an empty directory.
    #[error("no such definition: {0}")]
    NoSuchDefinition(DefinitionId),

    /// The definition is registered but has no change sets yet, so there
    /// is no snapshot to serve.
    #[error("definition {0} has no snapshots yet")]
    NoSnapshot(DefinitionId),

    /// The pinned baseline reference does not resolve to a snapshot.
    #[error("pinned baseline unavailable: definition {definition} at version {version}")]
    BaselineUnavailable {
        definition: DefinitionId,
        version: u32,
    },

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
