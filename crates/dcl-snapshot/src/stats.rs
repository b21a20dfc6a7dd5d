use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::snapshot::Snapshot;

/// Cumulative per-directory counters across a whole fold.
///
/// These are totals since coverage, not point-in-time counts: a file added
/// and later removed leaves `added == 1, removed == 1, file_count == 0`.
/// The point-in-time population is recoverable from the snapshot's entries;
/// the totals are what the fold would otherwise lose.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryStats {
    /// Files currently attributed to the directory. Never negative: a
    /// removal with no matching addition is floored at zero and counted in
    /// [`FoldDiagnostics`].
    pub file_count: u64,
    /// Total `Added` events folded for the directory.
    pub added: u64,
    /// Total `Changed` events folded for the directory.
    pub changed: u64,
    /// Total `Removed` events folded for the directory.
    pub removed: u64,
}

/// Tolerated anomalies observed during a fold.
///
/// A single malformed historical change set must not make the snapshot
/// unreconstructible, so these are counted (and logged) rather than fatal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FoldDiagnostics {
    /// `Removed` drifts for paths that were not present.
    pub redundant_removals: u64,
    /// `Removed` drifts that would have taken a directory's `file_count`
    /// negative.
    pub file_count_underflows: u64,
}

impl FoldDiagnostics {
    /// Returns `true` if the fold saw no anomalies.
    pub fn is_clean(&self) -> bool {
        self.redundant_removals == 0 && self.file_count_underflows == 0
    }
}

/// A snapshot bundled with its per-directory counters and fold diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectorySnapshot {
    pub snapshot: Snapshot,
    pub directories: BTreeMap<String, DirectoryStats>,
    pub diagnostics: FoldDiagnostics,
}

/// The directory component of a definition-relative path.
///
/// `"conf/app.xml"` → `"conf"`; root-level files map to `"."`.
pub fn directory_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => ".",
    }
}
