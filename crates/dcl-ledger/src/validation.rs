use dcl_types::{ChangeSetCategory, DefinitionId};

use crate::error::LedgerError;
use crate::traits::LedgerReader;

/// Result of auditing one definition's stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationReport {
    pub definition: DefinitionId,
    pub change_set_count: u64,
    pub versions_contiguous: bool,
    pub baseline_is_coverage: bool,
    pub drifts_well_formed: bool,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// A specific integrity violation detected during validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub version: u32,
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    VersionGap,
    BaselineNotCoverage,
    CoverageAfterBaseline,
    MalformedDrift,
}

/// Stream integrity auditor.
///
/// `InMemoryLedger::append` rejects these states up front; the validator
/// exists for streams loaded from an external backend, where history may
/// predate the current checks. It reports everything it finds rather than
/// failing on the first violation, and never mutates the stream.
pub struct StreamValidator;

impl StreamValidator {
    /// Validate a single definition's stream against all invariants.
    pub fn validate<R: LedgerReader>(
        reader: &R,
        definition: &DefinitionId,
    ) -> Result<ValidationReport, LedgerError> {
        let head = reader.head_version(definition)?;
        let change_sets = match head {
            Some(head) => reader.range(definition, 0, head)?,
            None => Vec::new(),
        };

        let mut violations = Vec::new();
        let mut versions_contiguous = true;
        let mut baseline_is_coverage = true;
        let mut drifts_well_formed = true;

        for (index, change_set) in change_sets.iter().enumerate() {
            let expected = index as u32;
            let version = change_set.version();
            if version != expected {
                versions_contiguous = false;
                violations.push(Violation {
                    version,
                    kind: ViolationKind::VersionGap,
                    description: format!("expected version {expected}, found {version}"),
                });
            }

            match (index, change_set.category()) {
                (0, ChangeSetCategory::Drift) => {
                    baseline_is_coverage = false;
                    violations.push(Violation {
                        version,
                        kind: ViolationKind::BaselineNotCoverage,
                        description: "version 0 is not a coverage change set".into(),
                    });
                }
                (i, ChangeSetCategory::Coverage) if i > 0 => {
                    violations.push(Violation {
                        version,
                        kind: ViolationKind::CoverageAfterBaseline,
                        description: "coverage change set after the baseline".into(),
                    });
                }
                _ => {}
            }

            for drift in change_set.drifts() {
                if let Err(e) = drift.validate() {
                    drifts_well_formed = false;
                    violations.push(Violation {
                        version,
                        kind: ViolationKind::MalformedDrift,
                        description: format!("{}: {e}", drift.path()),
                    });
                }
            }
        }

        Ok(ValidationReport {
            definition: *definition,
            change_set_count: change_sets.len() as u64,
            versions_contiguous,
            baseline_is_coverage,
            drifts_well_formed,
            violations,
        })
    }
}
