use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use dcl_ledger::LedgerReader;
use dcl_types::{ChangeSet, DefinitionId, Drift, DriftCategory};

use crate::error::SnapshotError;
use crate::snapshot::Snapshot;
use crate::stats::{directory_of, DirectorySnapshot, DirectoryStats, FoldDiagnostics};

type VersionCache = HashMap<DefinitionId, BTreeMap<u32, Arc<Snapshot>>>;

/// Folds ledger prefixes into materialized [`Snapshot`]s, on demand.
///
/// The builder keeps an append-only cache keyed by `(definition, version)`:
/// once a snapshot for version V is computed it is valid forever (the
/// ledger below the head is immutable), so the cache never invalidates —
/// newer versions only ever add entries. A build request folds forward from
/// the nearest cached version at or below the target instead of replaying
/// from scratch.
///
/// Builds are pure reads and may run concurrently with appends: the fold
/// consumes the fixed range `0..=V`, so appends past V cannot change the
/// result.
pub struct SnapshotBuilder<R: LedgerReader> {
    reader: Arc<R>,
    cache: RwLock<VersionCache>,
}

impl<R: LedgerReader> SnapshotBuilder<R> {
    /// Create a builder over a ledger reader.
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            reader,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Materialize the snapshot of `definition` at `version`.
    ///
    /// Returns `Ok(None)` if the definition has no change sets at all (no
    /// initial snapshot — distinct from a version-0 snapshot with zero
    /// entries, which is a legal empty directory). Requesting a version
    /// beyond the head is [`SnapshotError::VersionNotFound`], never
    /// silently clamped.
    pub fn build(
        &self,
        definition: &DefinitionId,
        version: u32,
    ) -> Result<Option<Arc<Snapshot>>, SnapshotError> {
        let Some(head) = self.reader.head_version(definition)? else {
            return Ok(None);
        };
        if version > head {
            return Err(SnapshotError::VersionNotFound {
                requested: version,
                head,
            });
        }

        let cached = self.nearest_cached(definition, version);
        if let Some(snapshot) = &cached {
            if snapshot.version() == version {
                return Ok(Some(Arc::clone(snapshot)));
            }
        }

        let (mut entries, from) = match cached {
            Some(snapshot) => (snapshot.entries().clone(), snapshot.version() + 1),
            None => (BTreeMap::new(), 0),
        };

        let mut diagnostics = FoldDiagnostics::default();
        for change_set in self.reader.range(definition, from, version)? {
            apply_change_set(&mut entries, &change_set, &mut diagnostics);
        }

        let snapshot = Arc::new(Snapshot::new(*definition, version, entries));
        debug!(
            definition = %definition.short_id(),
            version,
            entries = snapshot.len(),
            folded_from = from,
            "snapshot materialized"
        );

        let mut cache = self.cache.write().expect("lock poisoned");
        let slot = cache
            .entry(*definition)
            .or_default()
            .entry(version)
            .or_insert_with(|| Arc::clone(&snapshot));
        Ok(Some(Arc::clone(slot)))
    }

    /// Same fold as [`build`](Self::build), bypassing the cache entirely.
    ///
    /// Exists so callers (and tests) can pin down fold determinism against
    /// the cached path; also returns the fold diagnostics.
    pub fn build_uncached(
        &self,
        definition: &DefinitionId,
        version: u32,
    ) -> Result<Option<(Snapshot, FoldDiagnostics)>, SnapshotError> {
        let Some(head) = self.reader.head_version(definition)? else {
            return Ok(None);
        };
        if version > head {
            return Err(SnapshotError::VersionNotFound {
                requested: version,
                head,
            });
        }

        let mut entries = BTreeMap::new();
        let mut diagnostics = FoldDiagnostics::default();
        for change_set in self.reader.range(definition, 0, version)? {
            apply_change_set(&mut entries, &change_set, &mut diagnostics);
        }
        Ok(Some((
            Snapshot::new(*definition, version, entries),
            diagnostics,
        )))
    }

    /// Materialize a snapshot together with cumulative per-directory
    /// counters.
    ///
    /// The counters are totals across the whole fold, so this always
    /// replays from version 0 — an entries-only cached snapshot cannot
    /// seed them.
    pub fn build_with_stats(
        &self,
        definition: &DefinitionId,
        version: u32,
    ) -> Result<Option<DirectorySnapshot>, SnapshotError> {
        let Some(head) = self.reader.head_version(definition)? else {
            return Ok(None);
        };
        if version > head {
            return Err(SnapshotError::VersionNotFound {
                requested: version,
                head,
            });
        }

        let mut entries = BTreeMap::new();
        let mut directories: BTreeMap<String, DirectoryStats> = BTreeMap::new();
        let mut diagnostics = FoldDiagnostics::default();

        for change_set in self.reader.range(definition, 0, version)? {
            for drift in change_set.drifts() {
                let stats = directories
                    .entry(directory_of(drift.path()).to_string())
                    .or_default();
                match drift.category() {
                    DriftCategory::Added => {
                        stats.added += 1;
                        stats.file_count += 1;
                    }
                    DriftCategory::Changed => {
                        stats.changed += 1;
                    }
                    DriftCategory::Removed => {
                        stats.removed += 1;
                        if stats.file_count == 0 {
                            diagnostics.file_count_underflows += 1;
                            warn!(
                                definition = %definition.short_id(),
                                version = change_set.version(),
                                path = drift.path(),
                                "file count underflow floored at zero"
                            );
                        } else {
                            stats.file_count -= 1;
                        }
                    }
                }
            }
            apply_change_set(&mut entries, &change_set, &mut diagnostics);
        }

        Ok(Some(DirectorySnapshot {
            snapshot: Snapshot::new(*definition, version, entries),
            directories,
            diagnostics,
        }))
    }

    /// Number of cached snapshots across all definitions.
    pub fn cached_len(&self) -> usize {
        self.cache
            .read()
            .expect("lock poisoned")
            .values()
            .map(BTreeMap::len)
            .sum()
    }

    fn nearest_cached(&self, definition: &DefinitionId, version: u32) -> Option<Arc<Snapshot>> {
        let cache = self.cache.read().expect("lock poisoned");
        cache.get(definition).and_then(|versions| {
            versions
                .range(..=version)
                .next_back()
                .map(|(_, snapshot)| Arc::clone(snapshot))
        })
    }
}

/// Fold one change set into a path-keyed entry map.
///
/// `Added`/`Changed` replace any prior entry (last-writer-wins, the only
/// order that can occur given strict version ordering and per-set path
/// uniqueness). `Removed` deletes the path if present; a removal for an
/// absent path is tolerated and counted.
fn apply_change_set(
    entries: &mut BTreeMap<String, Drift>,
    change_set: &ChangeSet,
    diagnostics: &mut FoldDiagnostics,
) {
    for drift in change_set.drifts() {
        match drift.category() {
            DriftCategory::Added | DriftCategory::Changed => {
                entries.insert(drift.path().to_string(), drift.clone());
            }
            DriftCategory::Removed => {
                if entries.remove(drift.path()).is_none() {
                    diagnostics.redundant_removals += 1;
                    warn!(
                        definition = %change_set.definition_id().short_id(),
                        version = change_set.version(),
                        path = drift.path(),
                        "removal of absent path ignored"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcl_ledger::{InMemoryLedger, LedgerWriter};
    use dcl_store::InMemoryContentStore;
    use dcl_types::{ChangeSetCategory, ContentHash, Timestamp};

    fn hash(b: u8) -> ContentHash {
        ContentHash::from_raw([b; 32])
    }

    fn builder() -> (Arc<InMemoryLedger>, SnapshotBuilder<InMemoryLedger>) {
        let store = Arc::new(InMemoryContentStore::new());
        let ledger = Arc::new(InMemoryLedger::new(store));
        let builder = SnapshotBuilder::new(Arc::clone(&ledger));
        (ledger, builder)
    }

    fn append(
        ledger: &InMemoryLedger,
        definition: DefinitionId,
        version: u32,
        category: ChangeSetCategory,
        drifts: Vec<Drift>,
    ) {
        ledger
            .append(
                ChangeSet::new(definition, version, category, Timestamp::zero(), drifts).unwrap(),
            )
            .unwrap();
    }

    /// Seeds the three-version history used by the walkthrough tests:
    /// v0 adds a.txt (H1), v1 changes a.txt to H2 and adds b.txt (H3),
    /// v2 removes a.txt.
    fn seed_history(ledger: &InMemoryLedger) -> DefinitionId {
        let d = DefinitionId::new();
        append(
            ledger,
            d,
            0,
            ChangeSetCategory::Coverage,
            vec![Drift::added("a.txt", hash(1))],
        );
        append(
            ledger,
            d,
            1,
            ChangeSetCategory::Drift,
            vec![
                Drift::changed("a.txt", hash(1), hash(2)),
                Drift::added("b.txt", hash(3)),
            ],
        );
        append(
            ledger,
            d,
            2,
            ChangeSetCategory::Drift,
            vec![Drift::removed("a.txt", hash(2))],
        );
        d
    }

    // -----------------------------------------------------------------------
    // Fold walkthrough
    // -----------------------------------------------------------------------

    #[test]
    fn baseline_snapshot() {
        let (ledger, builder) = builder();
        let d = seed_history(&ledger);

        let snap = builder.build(&d, 0).unwrap().unwrap();
        assert_eq!(snap.version(), 0);
        assert_eq!(snap.len(), 1);
        let a = snap.get("a.txt").unwrap();
        assert_eq!(a.category(), DriftCategory::Added);
        assert_eq!(a.new_hash(), Some(hash(1)));
    }

    #[test]
    fn change_and_add_fold_forward() {
        let (ledger, builder) = builder();
        let d = seed_history(&ledger);

        let snap = builder.build(&d, 1).unwrap().unwrap();
        assert_eq!(snap.len(), 2);
        let a = snap.get("a.txt").unwrap();
        assert_eq!(a.category(), DriftCategory::Changed);
        assert_eq!(a.new_hash(), Some(hash(2)));
        let b = snap.get("b.txt").unwrap();
        assert_eq!(b.category(), DriftCategory::Added);
        assert_eq!(b.new_hash(), Some(hash(3)));
    }

    #[test]
    fn removed_path_is_absent() {
        let (ledger, builder) = builder();
        let d = seed_history(&ledger);

        let snap = builder.build(&d, 2).unwrap().unwrap();
        assert_eq!(snap.len(), 1);
        assert!(!snap.contains("a.txt"));
        assert!(snap.contains("b.txt"));
    }

    // -----------------------------------------------------------------------
    // Edge cases
    // -----------------------------------------------------------------------

    #[test]
    fn no_change_sets_yields_none() {
        let (_, builder) = builder();
        assert!(builder.build(&DefinitionId::new(), 0).unwrap().is_none());
    }

    #[test]
    fn version_beyond_head_is_an_error() {
        let (ledger, builder) = builder();
        let d = seed_history(&ledger);

        let err = builder.build(&d, 9).unwrap_err();
        assert_eq!(
            err,
            SnapshotError::VersionNotFound {
                requested: 9,
                head: 2
            }
        );
    }

    #[test]
    fn empty_coverage_yields_empty_but_valid_snapshot() {
        let (ledger, builder) = builder();
        let d = DefinitionId::new();
        append(&ledger, d, 0, ChangeSetCategory::Coverage, vec![]);

        let snap = builder.build(&d, 0).unwrap().unwrap();
        assert!(snap.is_empty());
        assert_eq!(snap.version(), 0);
    }

    #[test]
    fn redundant_removal_is_tolerated_and_counted() {
        let (ledger, builder) = builder();
        let d = DefinitionId::new();
        append(
            &ledger,
            d,
            0,
            ChangeSetCategory::Coverage,
            vec![Drift::added("a.txt", hash(1))],
        );
        // Malformed history: removes a path that never existed.
        append(
            &ledger,
            d,
            1,
            ChangeSetCategory::Drift,
            vec![Drift::removed("ghost.txt", hash(9))],
        );

        let (snap, diagnostics) = builder.build_uncached(&d, 1).unwrap().unwrap();
        assert_eq!(snap.len(), 1);
        assert!(snap.contains("a.txt"));
        assert_eq!(diagnostics.redundant_removals, 1);
    }

    // -----------------------------------------------------------------------
    // Determinism and caching
    // -----------------------------------------------------------------------

    #[test]
    fn fold_is_deterministic() {
        let (ledger, builder) = builder();
        let d = seed_history(&ledger);

        let first = builder.build(&d, 2).unwrap().unwrap();
        let second = builder.build(&d, 2).unwrap().unwrap();
        assert_eq!(*first, *second);
    }

    #[test]
    fn unrelated_appends_do_not_change_result() {
        let (ledger, builder) = builder();
        let d = seed_history(&ledger);

        let before = builder.build(&d, 1).unwrap().unwrap();

        let other = DefinitionId::new();
        append(
            &ledger,
            other,
            0,
            ChangeSetCategory::Coverage,
            vec![Drift::added("z.txt", hash(7))],
        );

        let after = builder.build(&d, 1).unwrap().unwrap();
        assert_eq!(*before, *after);
    }

    #[test]
    fn cached_fold_matches_fold_from_scratch() {
        let (ledger, builder) = builder();
        let d = seed_history(&ledger);

        // Prime the cache at version 1, then fold forward to 2.
        builder.build(&d, 1).unwrap().unwrap();
        let incremental = builder.build(&d, 2).unwrap().unwrap();

        let (from_scratch, _) = builder.build_uncached(&d, 2).unwrap().unwrap();
        assert_eq!(*incremental, from_scratch);
    }

    #[test]
    fn cache_grows_but_never_invalidates() {
        let (ledger, builder) = builder();
        let d = seed_history(&ledger);

        let v0_first = builder.build(&d, 0).unwrap().unwrap();
        builder.build(&d, 1).unwrap().unwrap();
        builder.build(&d, 2).unwrap().unwrap();
        assert_eq!(builder.cached_len(), 3);

        // The old entry is still served, not recomputed into something new.
        let v0_second = builder.build(&d, 0).unwrap().unwrap();
        assert!(Arc::ptr_eq(&v0_first, &v0_second));
        assert_eq!(builder.cached_len(), 3);
    }

    #[test]
    fn build_after_new_appends_extends_cache() {
        let (ledger, builder) = builder();
        let d = seed_history(&ledger);
        builder.build(&d, 2).unwrap().unwrap();

        append(
            &ledger,
            d,
            3,
            ChangeSetCategory::Drift,
            vec![Drift::added("c.txt", hash(4))],
        );

        let snap = builder.build(&d, 3).unwrap().unwrap();
        assert_eq!(snap.len(), 2);
        assert!(snap.contains("b.txt"));
        assert!(snap.contains("c.txt"));
    }

    // -----------------------------------------------------------------------
    // Directory statistics
    // -----------------------------------------------------------------------

    #[test]
    fn stats_are_cumulative_since_coverage() {
        let (ledger, builder) = builder();
        let d = DefinitionId::new();
        append(
            &ledger,
            d,
            0,
            ChangeSetCategory::Coverage,
            vec![
                Drift::added("conf/app.xml", hash(1)),
                Drift::added("conf/db.xml", hash(2)),
            ],
        );
        append(
            &ledger,
            d,
            1,
            ChangeSetCategory::Drift,
            vec![Drift::changed("conf/app.xml", hash(1), hash(3))],
        );
        append(
            &ledger,
            d,
            2,
            ChangeSetCategory::Drift,
            vec![Drift::removed("conf/db.xml", hash(2))],
        );

        let result = builder.build_with_stats(&d, 2).unwrap().unwrap();
        let conf = result.directories.get("conf").unwrap();
        assert_eq!(conf.added, 2);
        assert_eq!(conf.changed, 1);
        assert_eq!(conf.removed, 1);
        assert_eq!(conf.file_count, 1);
        assert!(result.diagnostics.is_clean());
    }

    #[test]
    fn stats_group_by_directory() {
        let (ledger, builder) = builder();
        let d = DefinitionId::new();
        append(
            &ledger,
            d,
            0,
            ChangeSetCategory::Coverage,
            vec![
                Drift::added("app.xml", hash(1)),
                Drift::added("conf/db.xml", hash(2)),
            ],
        );

        let result = builder.build_with_stats(&d, 0).unwrap().unwrap();
        assert_eq!(result.directories.get(".").unwrap().file_count, 1);
        assert_eq!(result.directories.get("conf").unwrap().file_count, 1);
    }

    #[test]
    fn file_count_floors_at_zero() {
        let (ledger, builder) = builder();
        let d = DefinitionId::new();
        append(&ledger, d, 0, ChangeSetCategory::Coverage, vec![]);
        append(
            &ledger,
            d,
            1,
            ChangeSetCategory::Drift,
            vec![Drift::removed("phantom.txt", hash(9))],
        );

        let result = builder.build_with_stats(&d, 1).unwrap().unwrap();
        let root = result.directories.get(".").unwrap();
        assert_eq!(root.file_count, 0);
        assert_eq!(root.removed, 1);
        assert_eq!(result.diagnostics.file_count_underflows, 1);
        assert_eq!(result.diagnostics.redundant_removals, 1);
    }

    #[test]
    fn stats_snapshot_matches_plain_build() {
        let (ledger, builder) = builder();
        let d = seed_history(&ledger);

        let plain = builder.build(&d, 2).unwrap().unwrap();
        let with_stats = builder.build_with_stats(&d, 2).unwrap().unwrap();
        assert_eq!(*plain, with_stats.snapshot);
    }
}
