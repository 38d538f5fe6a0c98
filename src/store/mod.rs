//! Store façade
//!
//! The single choke point external collaborators talk to. It coordinates
//! the version store and the change log so that every committed write
//! produces exactly one version and one change record, both-or-neither.
//!
//! ## Concurrency
//! - All writes serialize through one mutation barrier (a mutex owning the
//!   txn authority), so txn order equals true commit order.
//! - The durable append happens inside the barrier but outside the state
//!   lock; readers are blocked only for the instant a commit is published.
//! - A read issued after `put`/`delete` returns observes the write: the
//!   append and publish complete before the call returns.
//! - GC snapshots latest-per-key first and prunes under short write-lock
//!   windows, so writers racing the sweep are never touched by it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use serde_json::Value;

use crate::changelog::{ChangeLog, ChangeRecord};
use crate::durability::{ControlEvent, DurableSink, JournalEntry, MemorySink, SinkError};
use crate::error::{StoreError, StoreResult};
use crate::mvcc::{GcReport, RetentionPolicy, TxnAuthority, Version, VersionStore};
use crate::observability::{Logger, Severity};
use crate::predicate::Predicate;

#[derive(Default)]
struct SharedState {
    versions: VersionStore,
    log: ChangeLog,
}

/// The versioned key-value store.
pub struct Store {
    /// Mutation barrier. All writes serialize here; it owns the only
    /// transaction counter in the process.
    barrier: Mutex<TxnAuthority>,
    /// State shared with readers; writers touch it only to publish a
    /// completed commit.
    state: RwLock<SharedState>,
    /// Serializes sweeps so GC cannot race itself.
    sweep: Mutex<()>,
    sink: Arc<dyn DurableSink>,
}

impl Store {
    /// Opens a store over a durable sink, replaying its journal to
    /// rebuild chains, log, retention floor and the txn counter.
    ///
    /// Replay is validated as it is applied: txn ids must be strictly
    /// increasing and version numbers contiguous per key. Any violation
    /// is fatal; a corrupt journal is never repaired silently.
    pub fn open(sink: Arc<dyn DurableSink>) -> Result<Self, SinkError> {
        let entries = sink.replay()?;

        let mut versions = VersionStore::new();
        let mut log = ChangeLog::new();
        let mut authority = TxnAuthority::new();
        let mut commits = 0usize;

        for entry in entries {
            match entry {
                JournalEntry::Commit { version, record } => {
                    if record.txn_id != version.txn_id() || record.key != version.key() {
                        return Err(SinkError::Invalid(format!(
                            "commit entry mismatch for key '{}'",
                            record.key
                        )));
                    }
                    let expected = versions.next_number(version.key());
                    if version.number() != expected {
                        return Err(SinkError::Invalid(format!(
                            "version gap for key '{}': found {}, expected {}",
                            version.key(),
                            version.number(),
                            expected
                        )));
                    }
                    authority
                        .observe_replayed(record.txn_id)
                        .map_err(|e| SinkError::Invalid(e.to_string()))?;
                    versions.apply(version);
                    log.append(record);
                    commits += 1;
                }
                JournalEntry::Control(ControlEvent::Purge { key, below }) => {
                    match versions.chain_mut(&key) {
                        Some(chain) => {
                            chain.purge_below(below);
                        }
                        None => {
                            return Err(SinkError::Invalid(format!(
                                "purge event for unknown key '{}'",
                                key
                            )))
                        }
                    }
                }
                JournalEntry::Control(ControlEvent::Evict { key }) => {
                    match versions.evict(&key) {
                        Some(chain) => {
                            if let Some(last) = chain.latest() {
                                log.truncate(last.txn_id().value());
                            }
                        }
                        None => {
                            return Err(SinkError::Invalid(format!(
                                "evict event for unknown key '{}'",
                                key
                            )))
                        }
                    }
                }
                JournalEntry::Control(ControlEvent::TruncateLog { up_to }) => {
                    log.truncate(up_to);
                }
            }
        }

        let commits_text = commits.to_string();
        let keys_text = versions.key_count().to_string();
        let next_txn_text = authority.next_txn_id().to_string();
        Logger::log(
            Severity::Info,
            "recovery_complete",
            &[
                ("commits", &commits_text),
                ("keys", &keys_text),
                ("next_txn", &next_txn_text),
            ],
        );

        Ok(Self {
            barrier: Mutex::new(authority),
            state: RwLock::new(SharedState { versions, log }),
            sweep: Mutex::new(()),
            sink,
        })
    }

    /// An ephemeral store backed by an in-memory sink.
    pub fn in_memory() -> Self {
        Self {
            barrier: Mutex::new(TxnAuthority::new()),
            state: RwLock::new(SharedState::default()),
            sweep: Mutex::new(()),
            sink: Arc::new(MemorySink::new()),
        }
    }

    /// Inserts or updates a key, committing a new version.
    pub fn put(&self, key: &str, value: Value) -> StoreResult<Version> {
        let mut authority = self.lock_barrier();
        let number = self.read_state().versions.next_number(key);
        let version =
            Version::with_document(key, number, value, authority.next_txn_id(), Utc::now());
        self.commit(&mut authority, version)
    }

    /// Deletes a key by committing a tombstone version.
    ///
    /// Requires a live latest version: deleting an unknown or already
    /// deleted key is `NotFound`.
    pub fn delete(&self, key: &str) -> StoreResult<Version> {
        let mut authority = self.lock_barrier();
        let number = {
            let state = self.read_state();
            match state.versions.chain(key).and_then(|chain| chain.latest()) {
                Some(latest) if !latest.is_tombstone() => latest.number() + 1,
                _ => return Err(StoreError::not_found(key)),
            }
        };
        let version = Version::with_tombstone(key, number, authority.next_txn_id(), Utc::now());
        self.commit(&mut authority, version)
    }

    /// Commit tail shared by `put` and `delete`: durable append first,
    /// then publish, then advance the counter. A failed append leaves no
    /// trace and consumes no txn id.
    fn commit(
        &self,
        authority: &mut MutexGuard<'_, TxnAuthority>,
        version: Version,
    ) -> StoreResult<Version> {
        let record = ChangeRecord::for_version(&version);
        if let Err(err) = self.sink.append_commit(&version, &record) {
            let reason = err.to_string();
            Logger::error("commit_failed", &[("key", version.key()), ("reason", &reason)]);
            return Err(StoreError::Commit(err));
        }

        {
            let mut state = self.write_state();
            state.versions.apply(version.clone());
            state.log.append(record);
        }
        authority.mark_committed(version.txn_id());

        let txn_text = version.txn_id().to_string();
        let number_text = version.number().to_string();
        Logger::log(
            Severity::Trace,
            "commit",
            &[
                ("key", version.key()),
                ("txn", &txn_text),
                ("version", &number_text),
            ],
        );
        Ok(version)
    }

    /// Reads a key.
    ///
    /// With `version`: exactly that version (tombstones included),
    /// `VersionPurged` if reclaimed. Without: the latest version, unless
    /// the key is unknown or deleted (`NotFound`).
    pub fn get(&self, key: &str, version: Option<u64>) -> StoreResult<Version> {
        let state = self.read_state();
        state.versions.get(key, version).map(Version::clone)
    }

    /// Lists `(key, version)` pairs, key-ascending, as a lazy sequence
    /// over a consistent snapshot.
    ///
    /// `latest_only` yields one live version per key and skips deleted
    /// keys; otherwise every retained version is yielded in version
    /// order. The filter applies to each version's value.
    pub fn list(
        &self,
        latest_only: bool,
        filter: Option<&str>,
    ) -> StoreResult<impl Iterator<Item = (String, Version)>> {
        let predicate = filter.map(Predicate::parse).transpose()?;

        let snapshot: Vec<(String, Version)> = {
            let state = self.read_state();
            let mut rows = Vec::new();
            for (key, chain) in state.versions.iter() {
                if latest_only {
                    if let Some(latest) = chain.latest() {
                        if !latest.is_tombstone() {
                            rows.push((key.clone(), latest.clone()));
                        }
                    }
                } else {
                    for version in chain.versions() {
                        rows.push((key.clone(), version.clone()));
                    }
                }
            }
            rows
        };

        Ok(snapshot.into_iter().filter(move |(_, version)| {
            predicate
                .as_ref()
                .map_or(true, |p| p.matches(version.query_value()))
        }))
    }

    /// Streams change records with `txn_id > start` in commit order, as a
    /// lazy sequence over a consistent snapshot.
    ///
    /// A `start` below the retained floor fails with `CursorExpired` so
    /// the consumer can detect the gap and resynchronize.
    pub fn changes(
        &self,
        start: Option<u64>,
        filter: Option<&str>,
    ) -> StoreResult<impl Iterator<Item = ChangeRecord>> {
        let predicate = filter.map(Predicate::parse).transpose()?;
        let start = start.unwrap_or(0);

        let snapshot: Vec<ChangeRecord> = {
            let state = self.read_state();
            state.log.check_cursor(start)?;
            state.log.records_after(start).to_vec()
        };

        Ok(snapshot.into_iter().filter(move |record| {
            predicate.as_ref().map_or(true, |p| p.matches(&record.value))
        }))
    }

    /// Runs one garbage-collection sweep under the given policy.
    ///
    /// The sweep snapshots latest-per-key at start and only ever judges
    /// versions at or below that snapshot; the snapshot latest of every
    /// key survives. Purged versions read as `VersionPurged` forever.
    /// When a purged version is a tombstone, the change log is truncated
    /// up to the highest such txn id, expiring cursors that predate the
    /// vanished deletion.
    pub fn garbage_collect(&self, policy: &RetentionPolicy) -> StoreResult<GcReport> {
        let _sweep = self.lock_sweep();
        let sweep_start = Utc::now();
        let snapshot = self.read_state().versions.latest_numbers();

        let mut report = GcReport::default();
        let mut tombstone_floor = 0u64;

        for (key, snapshot_latest) in snapshot {
            let floor = {
                let state = self.read_state();
                match state.versions.chain(&key) {
                    Some(chain) => {
                        let floor = policy.retain_floor(chain, snapshot_latest, sweep_start);
                        if floor <= chain.first_retained() {
                            continue;
                        }
                        floor
                    }
                    // evicted since the snapshot
                    None => continue,
                }
            };

            // journal the purge before mutating memory, so replay
            // reproduces the watermark
            self.sink.append_control(&ControlEvent::Purge {
                key: key.clone(),
                below: floor,
            })?;

            let removed = {
                let mut state = self.write_state();
                match state.versions.chain_mut(&key) {
                    Some(chain) => chain.purge_below(floor),
                    None => Vec::new(),
                }
            };

            if !removed.is_empty() {
                report.versions_removed += removed.len();
                report.keys_affected += 1;
                for version in &removed {
                    if version.is_tombstone() {
                        tombstone_floor = tombstone_floor.max(version.txn_id().value());
                    }
                }
            }
        }

        if tombstone_floor > 0 {
            self.truncate_log_inner(tombstone_floor)?;
        }

        let removed_text = report.versions_removed.to_string();
        let keys_text = report.keys_affected.to_string();
        Logger::log(
            Severity::Info,
            "gc_sweep",
            &[
                ("versions_removed", &removed_text),
                ("keys_affected", &keys_text),
            ],
        );
        Ok(report)
    }

    /// Removes a key's entire history without a tombstone.
    ///
    /// Unlike `delete`, nothing remains: subsequent reads are `NotFound`
    /// and the key's numbering restarts at 1. The change-log floor rises
    /// to the key's last txn id, so cursors that predate the eviction
    /// expire instead of replaying vanished history.
    pub fn evict(&self, key: &str) -> StoreResult<()> {
        let _authority = self.lock_barrier();
        {
            let state = self.read_state();
            if state.versions.chain(key).is_none() {
                return Err(StoreError::not_found(key));
            }
        }

        self.sink.append_control(&ControlEvent::Evict {
            key: key.to_string(),
        })?;

        let last_txn = {
            let mut state = self.write_state();
            let chain = state.versions.evict(key);
            let last = chain
                .as_ref()
                .and_then(|c| c.latest())
                .map(|v| v.txn_id().value())
                .unwrap_or(0);
            if last > 0 {
                state.log.truncate(last);
            }
            last
        };

        let txn_text = last_txn.to_string();
        Logger::log(Severity::Info, "evict", &[("key", key), ("floor", &txn_text)]);
        Ok(())
    }

    /// Compacts the change log, dropping records with `txn_id <= up_to`.
    ///
    /// Returns the number of records dropped. Cursors below the new floor
    /// fail with `CursorExpired` afterwards.
    pub fn truncate_changes(&self, up_to: u64) -> StoreResult<usize> {
        let _authority = self.lock_barrier();
        self.truncate_log_inner(up_to)
    }

    fn truncate_log_inner(&self, up_to: u64) -> StoreResult<usize> {
        // never raise the floor past what has actually committed
        let up_to = up_to.min(self.read_state().log.head());
        if up_to == 0 {
            return Ok(0);
        }
        self.sink
            .append_control(&ControlEvent::TruncateLog { up_to })?;
        Ok(self.write_state().log.truncate(up_to))
    }

    /// Highest committed txn id; 0 before the first commit. Change-stream
    /// consumers use this as their resync point.
    pub fn head_txn_id(&self) -> u64 {
        self.read_state().log.head()
    }

    fn lock_barrier(&self) -> MutexGuard<'_, TxnAuthority> {
        self.barrier.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_sweep(&self) -> MutexGuard<'_, ()> {
        self.sweep.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_state(&self) -> RwLockReadGuard<'_, SharedState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, SharedState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
