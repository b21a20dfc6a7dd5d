use dcl_diff::diff_snapshots;
use dcl_snapshot::Snapshot;

use crate::status::ComplianceStatus;

/// Derives compliance from a baseline, a current snapshot, and the
/// externally signaled base-directory fact.
///
/// Evaluation order is fixed: an unresolvable base directory short-circuits
/// before any content comparison, because a content diff against a
/// directory that does not exist is undefined, not "empty".
pub struct ComplianceEvaluator;

impl ComplianceEvaluator {
    /// Evaluate one definition's compliance.
    ///
    /// `baseline` is the pinned reference snapshot, or `None` for an
    /// unpinned definition (always compliant). `base_dir_resolved` is the
    /// endpoint-reported fact; it cannot be derived from the ledger.
    pub fn evaluate(
        baseline: Option<&Snapshot>,
        current: &Snapshot,
        base_dir_resolved: bool,
    ) -> ComplianceStatus {
        if !base_dir_resolved {
            return ComplianceStatus::OutOfComplianceNoBaseDir;
        }
        let Some(baseline) = baseline else {
            return ComplianceStatus::InCompliance;
        };
        if diff_snapshots(baseline, current).is_empty() {
            ComplianceStatus::InCompliance
        } else {
            ComplianceStatus::OutOfComplianceDrift
        }
    }
}
