//! Diff engine for the Drift Change Ledger.
//!
//! Compares two materialized [`Snapshot`](dcl_snapshot::Snapshot)s and
//! partitions their paths three ways: present only on the left, present
//! only on the right, and present on both sides with conflicting content.
//! Content identity is hash identity — two paths whose entries carry the
//! same `new_hash` are the same file, no matter how different their change
//! histories were.
//!
//! `left`/`right` are caller-defined labels, not a semantic ordering;
//! callers wanting "before/after" pass the earlier snapshot as `left`.

pub mod snapshot_diff;

pub use snapshot_diff::{diff_snapshots, Conflict, DiffReport};
