use serde::{Deserialize, Serialize};

use dcl_snapshot::Snapshot;
use dcl_types::ContentHash;

/// The result of comparing two snapshots.
///
/// The three lists are disjoint and sorted by path. A path present on both
/// sides with equal `new_hash` is not reported at all.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffReport {
    /// Paths present in the left snapshot only.
    pub only_in_left: Vec<String>,
    /// Paths present in the right snapshot only.
    pub only_in_right: Vec<String>,
    /// Paths present on both sides with differing content.
    pub conflicts: Vec<Conflict>,
}

impl DiffReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the two snapshots matched exactly.
    pub fn is_empty(&self) -> bool {
        self.only_in_left.is_empty() && self.only_in_right.is_empty() && self.conflicts.is_empty()
    }

    /// Total number of reported paths.
    pub fn len(&self) -> usize {
        self.only_in_left.len() + self.only_in_right.len() + self.conflicts.len()
    }
}

/// A path present in both snapshots with different content hashes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub path: String,
    /// The left entry's `new_hash`.
    pub left_hash: Option<ContentHash>,
    /// The right entry's `new_hash`.
    pub right_hash: Option<ContentHash>,
}

/// Compare two snapshots and produce a three-way partition.
///
/// Structurally symmetric: swapping the arguments swaps `only_in_left` with
/// `only_in_right` and flips each conflict's hash pair.
pub fn diff_snapshots(left: &Snapshot, right: &Snapshot) -> DiffReport {
    let mut report = DiffReport::new();

    // Left-only and conflicting paths.
    for (path, left_drift) in left.entries() {
        match right.get(path) {
            Some(right_drift) => {
                if left_drift.new_hash() != right_drift.new_hash() {
                    report.conflicts.push(Conflict {
                        path: path.clone(),
                        left_hash: left_drift.new_hash(),
                        right_hash: right_drift.new_hash(),
                    });
                }
            }
            None => report.only_in_left.push(path.clone()),
        }
    }

    // Right-only paths.
    for path in right.paths() {
        if !left.contains(path) {
            report.only_in_right.push(path.to_string());
        }
    }

    report
}
