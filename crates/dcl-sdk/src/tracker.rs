use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use dcl_compliance::{ComplianceEvaluator, ComplianceStatus};
use dcl_diff::{diff_snapshots, DiffReport};
use dcl_ledger::{InMemoryLedger, LedgerReader, LedgerWriter};
use dcl_protocol::ChangeSetReport;
use dcl_snapshot::{DirectorySnapshot, Snapshot, SnapshotBuilder};
use dcl_store::{ContentStore, InMemoryContentStore};
use dcl_types::{ContentHash, DefinitionId, Timestamp};

use crate::config::{DefinitionConfig, PinnedBaseline};
use crate::error::TrackerError;

struct DefinitionState {
    config: DefinitionConfig,
    pinned: Option<PinnedBaseline>,
    base_dir_resolved: bool,
}

/// The drift tracking facade.
///
/// Owns the content store, the per-definition change-set ledger, the
/// snapshot builder with its version cache, and the definition registry.
/// Every operation on an unregistered id fails with
/// [`TrackerError::NoSuchDefinition`] so callers can tell "never reported"
/// apart from "reported an empty directory".
pub struct DriftTracker {
    store: Arc<InMemoryContentStore>,
    ledger: Arc<InMemoryLedger>,
    builder: SnapshotBuilder<InMemoryLedger>,
    definitions: RwLock<HashMap<DefinitionId, DefinitionState>>,
}

impl DriftTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        let store = Arc::new(InMemoryContentStore::new());
        let ledger = Arc::new(InMemoryLedger::new(store.clone()));
        let builder = SnapshotBuilder::new(Arc::clone(&ledger));
        Self {
            store,
            ledger,
            builder,
            definitions: RwLock::new(HashMap::new()),
        }
    }

    // ---- Definition registry ----

    /// Register a new monitored definition and return its id.
    pub fn register(&self, config: DefinitionConfig) -> DefinitionId {
        let id = DefinitionId::new();
        info!(definition = %id.short_id(), name = %config.name, "definition registered");
        let mut definitions = self.definitions.write().expect("lock poisoned");
        definitions.insert(
            id,
            DefinitionState {
                config,
                pinned: None,
                base_dir_resolved: true,
            },
        );
        id
    }

    /// The configuration of a registered definition.
    pub fn definition(&self, id: &DefinitionId) -> Result<DefinitionConfig, TrackerError> {
        let definitions = self.definitions.read().expect("lock poisoned");
        definitions
            .get(id)
            .map(|state| state.config.clone())
            .ok_or(TrackerError::NoSuchDefinition(*id))
    }

    /// Every registered definition id, sorted.
    pub fn definition_ids(&self) -> Vec<DefinitionId> {
        let definitions = self.definitions.read().expect("lock poisoned");
        let mut ids: Vec<DefinitionId> = definitions.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Pin a definition to a baseline snapshot reference.
    ///
    /// The reference may point at another definition's ledger (template
    /// pinning); it is resolved eagerly so a dangling pin fails here, not
    /// at evaluation time.
    pub fn pin(&self, id: &DefinitionId, baseline: PinnedBaseline) -> Result<(), TrackerError> {
        self.resolve_baseline(&baseline)?;
        let mut definitions = self.definitions.write().expect("lock poisoned");
        let state = definitions
            .get_mut(id)
            .ok_or(TrackerError::NoSuchDefinition(*id))?;
        state.pinned = Some(baseline);
        debug!(
            definition = %id.short_id(),
            baseline = %baseline.definition_id.short_id(),
            version = baseline.version,
            "definition pinned"
        );
        Ok(())
    }

    /// Remove a definition's pin.
    pub fn unpin(&self, id: &DefinitionId) -> Result<(), TrackerError> {
        let mut definitions = self.definitions.write().expect("lock poisoned");
        let state = definitions
            .get_mut(id)
            .ok_or(TrackerError::NoSuchDefinition(*id))?;
        state.pinned = None;
        Ok(())
    }

    /// Record whether the endpoint could resolve the monitored base
    /// directory. Signaled by the agent; not derivable from the ledger.
    pub fn set_base_dir_resolved(
        &self,
        id: &DefinitionId,
        resolved: bool,
    ) -> Result<(), TrackerError> {
        let mut definitions = self.definitions.write().expect("lock poisoned");
        let state = definitions
            .get_mut(id)
            .ok_or(TrackerError::NoSuchDefinition(*id))?;
        state.base_dir_resolved = resolved;
        Ok(())
    }

    // ---- Inbound reporting boundary ----

    /// Ingest one change-set report from the agent.
    ///
    /// Blobs land in the content store before the change set is appended,
    /// so hashes delivered together with their metadata resolve `Loaded`
    /// immediately; hashes without blobs stay `Empty` until
    /// [`upload_content`](Self::upload_content). Version conflicts surface
    /// as [`LedgerError::VersionConflict`](dcl_ledger::LedgerError) — the
    /// agent re-reads the head version and resubmits.
    pub fn apply_report(&self, report: ChangeSetReport) -> Result<(), TrackerError> {
        let id = report.definition_id;
        if !self
            .definitions
            .read()
            .expect("lock poisoned")
            .contains_key(&id)
        {
            return Err(TrackerError::NoSuchDefinition(id));
        }

        for blob in &report.content {
            self.store.put(blob.hash, &blob.bytes)?;
        }

        let change_set = report.into_change_set(Timestamp::now())?;
        self.ledger.append(change_set)?;
        Ok(())
    }

    /// Store content bytes delivered after their metadata.
    pub fn upload_content(&self, hash: ContentHash, bytes: &[u8]) -> Result<(), TrackerError> {
        self.store.put(hash, bytes)?;
        Ok(())
    }

    /// The bytes for a content hash, if loaded.
    pub fn content(&self, hash: &ContentHash) -> Result<Option<Vec<u8>>, TrackerError> {
        Ok(self.store.get(hash)?)
    }

    // ---- Query surface ----

    /// The definition's highest reported version, `None` before the first
    /// report.
    pub fn head_version(&self, id: &DefinitionId) -> Result<Option<u32>, TrackerError> {
        self.ensure_registered(id)?;
        Ok(self.ledger.head_version(id)?)
    }

    /// The materialized snapshot of a definition at a version.
    pub fn snapshot(
        &self,
        id: &DefinitionId,
        version: u32,
    ) -> Result<Arc<Snapshot>, TrackerError> {
        self.ensure_registered(id)?;
        self.builder
            .build(id, version)?
            .ok_or(TrackerError::NoSnapshot(*id))
    }

    /// Snapshot plus cumulative per-directory counters.
    pub fn snapshot_with_stats(
        &self,
        id: &DefinitionId,
        version: u32,
    ) -> Result<DirectorySnapshot, TrackerError> {
        self.ensure_registered(id)?;
        self.builder
            .build_with_stats(id, version)?
            .ok_or(TrackerError::NoSnapshot(*id))
    }

    /// What changed between two versions of a definition.
    ///
    /// `from` is the earlier ("left") side; removed-since-`from` paths show
    /// up as `only_in_left`, new paths as `only_in_right`.
    pub fn diff(
        &self,
        id: &DefinitionId,
        from_version: u32,
        to_version: u32,
    ) -> Result<DiffReport, TrackerError> {
        let left = self.snapshot(id, from_version)?;
        let right = self.snapshot(id, to_version)?;
        Ok(diff_snapshots(&left, &right))
    }

    /// Derive the definition's current compliance status.
    pub fn evaluate(&self, id: &DefinitionId) -> Result<ComplianceStatus, TrackerError> {
        let (pinned, base_dir_resolved) = {
            let definitions = self.definitions.read().expect("lock poisoned");
            let state = definitions
                .get(id)
                .ok_or(TrackerError::NoSuchDefinition(*id))?;
            (state.pinned, state.base_dir_resolved)
        };

        // A missing base directory is decisive on its own; do not require
        // (or build) a snapshot to report it.
        if !base_dir_resolved {
            return Ok(ComplianceStatus::OutOfComplianceNoBaseDir);
        }

        let head = self
            .ledger
            .head_version(id)?
            .ok_or(TrackerError::NoSnapshot(*id))?;
        let current = self
            .builder
            .build(id, head)?
            .ok_or(TrackerError::NoSnapshot(*id))?;

        let baseline = match pinned {
            Some(reference) => Some(self.resolve_baseline(&reference)?),
            None => None,
        };

        Ok(ComplianceEvaluator::evaluate(
            baseline.as_deref(),
            &current,
            base_dir_resolved,
        ))
    }

    fn ensure_registered(&self, id: &DefinitionId) -> Result<(), TrackerError> {
        if self
            .definitions
            .read()
            .expect("lock poisoned")
            .contains_key(id)
        {
            Ok(())
        } else {
            Err(TrackerError::NoSuchDefinition(*id))
        }
    }

    fn resolve_baseline(
        &self,
        reference: &PinnedBaseline,
    ) -> Result<Arc<Snapshot>, TrackerError> {
        match self.builder.build(&reference.definition_id, reference.version) {
            Ok(Some(snapshot)) => Ok(snapshot),
            Ok(None) | Err(_) => Err(TrackerError::BaselineUnavailable {
                definition: reference.definition_id,
                version: reference.version,
            }),
        }
    }
}

impl Default for DriftTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DriftTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let definitions = self.definitions.read().expect("lock poisoned");
        f.debug_struct("DriftTracker")
            .field("definition_count", &definitions.len())
            .finish()
    }
}
