use serde::{Deserialize, Serialize};

/// Tri-state compliance of a definition against its pinned baseline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplianceStatus {
    /// Unpinned, or the current snapshot exactly matches the pinned
    /// baseline (same paths, same content hashes).
    InCompliance,
    /// The monitored base directory could not be resolved on the endpoint.
    /// Signaled externally; makes any content comparison meaningless.
    OutOfComplianceNoBaseDir,
    /// Pinned, base directory resolvable, but the current snapshot differs
    /// from the baseline.
    OutOfComplianceDrift,
}

impl ComplianceStatus {
    /// Returns `true` for the compliant state.
    pub fn is_compliant(&self) -> bool {
        matches!(self, Self::InCompliance)
    }
}

impl std::fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InCompliance => write!(f, "in compliance"),
            Self::OutOfComplianceNoBaseDir => write!(f, "out of compliance (no base directory)"),
            Self::OutOfComplianceDrift => write!(f, "out of compliance (drift)"),
        }
    }
}
