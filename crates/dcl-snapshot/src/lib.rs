//! Snapshot reconstruction for the Drift Change Ledger.
//!
//! A [`Snapshot`] answers "what did the monitored directory look like at
//! version V" without re-scanning the endpoint: it is the fold of the
//! ledger prefix `0..=V`, mapping each still-present path to its current
//! drift record. Snapshots are derived state — reconstructible at any time
//! — and the [`SnapshotBuilder`] caches them per version, which is safe
//! forever because the ledger below the head never changes.
//!
//! Directory statistics are cumulative totals since coverage, not
//! point-in-time counts; see [`DirectoryStats`].

pub mod builder;
pub mod error;
pub mod snapshot;
pub mod stats;

pub use builder::SnapshotBuilder;
pub use error::SnapshotError;
pub use snapshot::Snapshot;
pub use stats::{directory_of, DirectorySnapshot, DirectoryStats, FoldDiagnostics};
