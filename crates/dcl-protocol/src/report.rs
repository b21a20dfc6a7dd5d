use serde::{Deserialize, Serialize};

use dcl_types::{
    ChangeSet, ChangeSetCategory, ContentHash, DefinitionId, Drift, DriftCategory, Timestamp,
    TypeError,
};

use crate::error::ProtocolResult;

/// One per-path change as reported by the agent.
///
/// The wire shape is permissive (both hash slots optional regardless of
/// category); conversion into a domain [`Drift`] enforces the shape and
/// rejects mismatches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftRecord {
    pub path: String,
    pub category: DriftCategory,
    pub old_hash: Option<ContentHash>,
    pub new_hash: Option<ContentHash>,
}

impl DriftRecord {
    fn into_drift(self) -> ProtocolResult<Drift> {
        match (self.category, self.old_hash, self.new_hash) {
            (DriftCategory::Added, None, Some(new)) => Ok(Drift::added(self.path, new)),
            (DriftCategory::Changed, Some(old), Some(new)) => {
                Ok(Drift::changed(self.path, old, new))
            }
            (DriftCategory::Removed, Some(old), None) => Ok(Drift::removed(self.path, old)),
            (category, old, new) => Err(shape_error(category, old, new).into()),
        }
    }
}

fn shape_error(
    category: DriftCategory,
    old: Option<ContentHash>,
    new: Option<ContentHash>,
) -> TypeError {
    if category.requires_old_hash() && old.is_none() {
        TypeError::MissingHash {
            category,
            slot: "old",
        }
    } else if !category.requires_old_hash() && old.is_some() {
        TypeError::UnexpectedHash {
            category,
            slot: "old",
        }
    } else if category.requires_new_hash() && new.is_none() {
        TypeError::MissingHash {
            category,
            slot: "new",
        }
    } else {
        TypeError::UnexpectedHash {
            category,
            slot: "new",
        }
    }
}

/// Bytes for one content hash, delivered alongside the metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlob {
    pub hash: ContentHash,
    pub bytes: Vec<u8>,
}

/// The inbound change-set payload from a reporting agent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSetReport {
    pub definition_id: DefinitionId,
    pub version: u32,
    pub category: ChangeSetCategory,
    pub drifts: Vec<DriftRecord>,
    /// Blobs for hashes not already loaded server-side. May be empty
    /// (partial delivery); the referenced hashes stay `Empty` until a
    /// follow-up upload.
    pub content: Vec<ContentBlob>,
}

impl ChangeSetReport {
    /// Convert into a domain change set, stamping the server-side receipt
    /// time. Shape violations and duplicate paths are integrity errors.
    pub fn into_change_set(self, received_at: Timestamp) -> ProtocolResult<ChangeSet> {
        let drifts = self
            .drifts
            .into_iter()
            .map(DriftRecord::into_drift)
            .collect::<ProtocolResult<Vec<_>>>()?;
        Ok(ChangeSet::new(
            self.definition_id,
            self.version,
            self.category,
            received_at,
            drifts,
        )?)
    }
}
