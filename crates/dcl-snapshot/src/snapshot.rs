use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use dcl_types::{DefinitionId, Drift};

/// The materialized state of a monitored directory at one ledger version.
///
/// `entries` maps each still-present path to its *current* drift record; a
/// path whose latest event was `Removed` is absent. Two snapshots built for
/// the same `(definition, version)` are structurally equal regardless of
/// when or how they were folded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    definition_id: DefinitionId,
    version: u32,
    entries: BTreeMap<String, Drift>,
}

impl Snapshot {
    /// Assemble a snapshot from a finished fold.
    pub fn new(
        definition_id: DefinitionId,
        version: u32,
        entries: BTreeMap<String, Drift>,
    ) -> Self {
        Self {
            definition_id,
            version,
            entries,
        }
    }

    /// The definition this snapshot belongs to.
    pub fn definition_id(&self) -> DefinitionId {
        self.definition_id
    }

    /// The highest ledger version folded in.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// The path-keyed entries, in path order.
    pub fn entries(&self) -> &BTreeMap<String, Drift> {
        &self.entries
    }

    /// The current drift record for a path, if present.
    pub fn get(&self, path: &str) -> Option<&Drift> {
        self.entries.get(path)
    }

    /// Returns `true` if the path is present at this version.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// The tracked paths, in order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of present paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no path is present (a legal state: an empty
    /// monitored directory).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
