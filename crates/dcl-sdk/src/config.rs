use serde::{Deserialize, Serialize};

use dcl_types::DefinitionId;

/// Collaborator-owned facts about one monitored definition.
///
/// The core never interprets these beyond carrying them: scheduling,
/// filter evaluation, and base-directory resolution all happen on the
/// endpoint agent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionConfig {
    /// Human-readable name, unique per resource by convention.
    pub name: String,
    /// Whether detection runs for this definition.
    pub enabled: bool,
    /// Detection interval in seconds.
    pub interval_secs: u64,
    /// The monitored base directory on the endpoint.
    pub base_dir: String,
    /// Path filters evaluated agent-side.
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
}

impl DefinitionConfig {
    /// A definition with default scheduling and no filters.
    pub fn new(name: impl Into<String>, base_dir: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            interval_secs: 1800,
            base_dir: base_dir.into(),
            includes: Vec::new(),
            excludes: Vec::new(),
        }
    }
}

/// A reference to a shared baseline snapshot.
///
/// Pinning stores the *coordinates* of a snapshot rather than a copy of it,
/// so any number of definitions (e.g. all instances of one template) can
/// share a single physical baseline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinnedBaseline {
    /// The definition whose ledger holds the baseline.
    pub definition_id: DefinitionId,
    /// The version to fold that ledger to.
    pub version: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_definition_defaults() {
        let config = DefinitionConfig::new("jboss-conf", "/opt/jboss/conf");
        assert!(config.enabled);
        assert_eq!(config.interval_secs, 1800);
        assert!(config.includes.is_empty());
    }
}
