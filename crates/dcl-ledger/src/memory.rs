use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use dcl_store::ContentStore;
use dcl_types::{ChangeSet, ChangeSetCategory, DefinitionId};

use crate::error::LedgerError;
use crate::traits::{LedgerReader, LedgerWriter};

type Stream = Arc<RwLock<Vec<ChangeSet>>>;

/// In-memory ledger implementation for tests, local demos, and embedding.
///
/// Each definition owns an independently locked stream: the outer map lock
/// is held only long enough to resolve the stream handle, so appends for
/// different definitions never contend, while appends for the same
/// definition serialize on the stream's own lock (which is what makes the
/// version check + push atomic).
pub struct InMemoryLedger {
    store: Arc<dyn ContentStore>,
    streams: RwLock<HashMap<DefinitionId, Stream>>,
}

impl InMemoryLedger {
    /// Create a ledger backed by the given content store.
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self {
            store,
            streams: RwLock::new(HashMap::new()),
        }
    }

    fn stream(&self, definition: &DefinitionId) -> Option<Stream> {
        self.streams
            .read()
            .expect("lock poisoned")
            .get(definition)
            .cloned()
    }

    fn stream_or_create(&self, definition: DefinitionId) -> Stream {
        if let Some(stream) = self.stream(&definition) {
            return stream;
        }
        let mut map = self.streams.write().expect("lock poisoned");
        map.entry(definition).or_default().clone()
    }
}

impl LedgerWriter for InMemoryLedger {
    fn append(&self, change_set: ChangeSet) -> Result<(), LedgerError> {
        let definition = change_set.definition_id();
        let stream = self.stream_or_create(definition);
        let mut versions = stream.write().expect("lock poisoned");

        let expected = versions.len() as u32;
        let actual = change_set.version();
        if actual != expected {
            return Err(LedgerError::VersionConflict {
                definition,
                expected,
                actual,
            });
        }

        match (actual, change_set.category()) {
            (0, ChangeSetCategory::Drift) => return Err(LedgerError::VersionZeroNotCoverage),
            (v, ChangeSetCategory::Coverage) if v > 0 => {
                return Err(LedgerError::CoverageAfterVersionZero(v))
            }
            _ => {}
        }

        // Register every referenced hash before the set becomes visible,
        // so a reader never observes a drift whose hash the store has not
        // at least seen as Empty.
        for hash in change_set.referenced_hashes() {
            self.store
                .register_reference(hash)
                .map_err(|e| LedgerError::Store(e.to_string()))?;
        }

        debug!(
            definition = %definition.short_id(),
            version = actual,
            category = %change_set.category(),
            drifts = change_set.len(),
            "change set appended"
        );
        versions.push(change_set);
        Ok(())
    }
}

impl LedgerReader for InMemoryLedger {
    fn head_version(&self, definition: &DefinitionId) -> Result<Option<u32>, LedgerError> {
        Ok(self.stream(definition).and_then(|stream| {
            let versions = stream.read().expect("lock poisoned");
            versions.len().checked_sub(1).map(|head| head as u32)
        }))
    }

    fn get(
        &self,
        definition: &DefinitionId,
        version: u32,
    ) -> Result<Option<ChangeSet>, LedgerError> {
        Ok(self.stream(definition).and_then(|stream| {
            let versions = stream.read().expect("lock poisoned");
            versions.get(version as usize).cloned()
        }))
    }

    fn range(
        &self,
        definition: &DefinitionId,
        from: u32,
        to: u32,
    ) -> Result<Vec<ChangeSet>, LedgerError> {
        if from > to {
            return Err(LedgerError::InvalidRange { from, to });
        }
        let Some(stream) = self.stream(definition) else {
            return Ok(Vec::new());
        };
        let versions = stream.read().expect("lock poisoned");
        let start = (from as usize).min(versions.len());
        let end = ((to as usize).saturating_add(1)).min(versions.len());
        Ok(versions[start..end].to_vec())
    }

    fn definition_ids(&self) -> Result<Vec<DefinitionId>, LedgerError> {
        let map = self.streams.read().expect("lock poisoned");
        let mut ids: Vec<DefinitionId> = map
            .iter()
            .filter(|(_, stream)| !stream.read().expect("lock poisoned").is_empty())
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        Ok(ids)
    }

    fn change_set_count(&self, definition: &DefinitionId) -> Result<u64, LedgerError> {
        Ok(self
            .stream(definition)
            .map(|stream| stream.read().expect("lock poisoned").len() as u64)
            .unwrap_or(0))
    }
}

impl std::fmt::Debug for InMemoryLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let map = self.streams.read().expect("lock poisoned");
        f.debug_struct("InMemoryLedger")
            .field("definition_count", &map.len())
            .finish()
    }
}
