use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::content::ContentHash;
use crate::definition::DefinitionId;
use crate::drift::Drift;
use crate::error::TypeError;
use crate::temporal::Timestamp;

/// Whether a change set is the baseline or a delta against it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeSetCategory {
    /// The version-0 baseline: every tracked path appears as `Added`.
    Coverage,
    /// A version ≥ 1 delta containing only paths that changed since the
    /// previous version.
    Drift,
}

impl fmt::Display for ChangeSetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coverage => write!(f, "coverage"),
            Self::Drift => write!(f, "drift"),
        }
    }
}

/// An immutable, versioned record of per-path deltas for one definition.
///
/// Drifts are keyed by path, so uniqueness within the set and deterministic
/// iteration order hold by construction. Content bytes are referenced by
/// [`ContentHash`], never embedded.
///
/// The version-0/`Coverage` pairing is the ledger's invariant, enforced at
/// append time; the constructor only checks set-local shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    definition_id: DefinitionId,
    version: u32,
    category: ChangeSetCategory,
    created_at: Timestamp,
    drifts: BTreeMap<String, Drift>,
}

impl ChangeSet {
    /// Build a change set from a list of drifts.
    ///
    /// Rejects malformed drifts and duplicate paths.
    pub fn new(
        definition_id: DefinitionId,
        version: u32,
        category: ChangeSetCategory,
        created_at: Timestamp,
        drifts: Vec<Drift>,
    ) -> Result<Self, TypeError> {
        let mut map = BTreeMap::new();
        for drift in drifts {
            drift.validate()?;
            let path = drift.path().to_string();
            if map.insert(path.clone(), drift).is_some() {
                return Err(TypeError::DuplicatePath { path });
            }
        }
        Ok(Self {
            definition_id,
            version,
            category,
            created_at,
            drifts: map,
        })
    }

    /// The owning definition.
    pub fn definition_id(&self) -> DefinitionId {
        self.definition_id
    }

    /// 0-based, per-definition monotonic version.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Coverage baseline or drift delta.
    pub fn category(&self) -> ChangeSetCategory {
        self.category
    }

    /// When the change set was created.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// The drifts, keyed by path, in path order.
    pub fn drifts(&self) -> impl Iterator<Item = &Drift> {
        self.drifts.values()
    }

    /// The drift for a specific path, if any.
    pub fn drift_for(&self, path: &str) -> Option<&Drift> {
        self.drifts.get(path)
    }

    /// Number of drifts in the set.
    pub fn len(&self) -> usize {
        self.drifts.len()
    }

    /// Returns `true` if the set contains no drifts.
    pub fn is_empty(&self) -> bool {
        self.drifts.is_empty()
    }

    /// Every content hash the set references (old and new), deduplicated.
    ///
    /// Used by the ledger append path to register references with the
    /// content store before the set becomes visible.
    pub fn referenced_hashes(&self) -> Vec<ContentHash> {
        let mut hashes: Vec<ContentHash> = self
            .drifts
            .values()
            .flat_map(|d| [d.old_hash(), d.new_hash()])
            .flatten()
            .collect();
        hashes.sort();
        hashes.dedup();
        hashes
    }
}
