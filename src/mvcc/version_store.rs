//! VersionStore - per-key version chains
//!
//! An ordered map of key to `VersionChain`. Listing walks keys in
//! ascending order, which makes `list` output stable across calls.
//! All commit-point coordination (txn allocation, durability, locking)
//! lives in the store façade; this structure only owns chain state.

use std::collections::BTreeMap;

use crate::error::StoreError;

use super::{Version, VersionChain, VersionLookup};

/// All version chains, keyed by document key.
#[derive(Debug, Default)]
pub struct VersionStore {
    chains: BTreeMap<String, VersionChain>,
}

impl VersionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys that have ever been written (and not evicted).
    pub fn key_count(&self) -> usize {
        self.chains.len()
    }

    /// The chain for a key, if the key was ever written.
    pub fn chain(&self, key: &str) -> Option<&VersionChain> {
        self.chains.get(key)
    }

    /// Mutable access to a key's chain, if present.
    pub fn chain_mut(&mut self, key: &str) -> Option<&mut VersionChain> {
        self.chains.get_mut(key)
    }

    /// The version number the next write to `key` must carry.
    pub fn next_number(&self, key: &str) -> u64 {
        self.chains
            .get(key)
            .map(|chain| chain.next_number())
            .unwrap_or(1)
    }

    /// Appends a committed version to its key's chain, creating the chain
    /// on first write.
    pub fn apply(&mut self, version: Version) {
        self.chains
            .entry(version.key().to_string())
            .or_insert_with(|| VersionChain::new(version.key()))
            .push(version);
    }

    /// Resolves a read.
    ///
    /// With an explicit version: exactly that version, `VersionPurged` if
    /// it was reclaimed, `NotFound` if it never existed. A tombstone is
    /// returned like any other version here.
    ///
    /// Without a version: the latest version, unless the key is unknown or
    /// its latest is a tombstone, which both read as `NotFound`.
    pub fn get(&self, key: &str, version: Option<u64>) -> Result<&Version, StoreError> {
        let chain = self.chains.get(key).ok_or_else(|| StoreError::not_found(key))?;
        match version {
            Some(number) => match chain.lookup(number) {
                VersionLookup::Found(found) => Ok(found),
                VersionLookup::Purged => Err(StoreError::VersionPurged { version: number }),
                VersionLookup::Absent => Err(StoreError::not_found(key)),
            },
            None => match chain.latest() {
                Some(latest) if !latest.is_tombstone() => Ok(latest),
                _ => Err(StoreError::not_found(key)),
            },
        }
    }

    /// Removes a key's entire history. Returns the chain if it existed.
    pub fn evict(&mut self, key: &str) -> Option<VersionChain> {
        self.chains.remove(key)
    }

    /// Iterates chains in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &VersionChain)> {
        self.chains.iter()
    }

    /// Snapshot of the latest version number per key, ascending by key.
    ///
    /// Used by the garbage collector as its sweep boundary: versions
    /// committed after this snapshot postdate it and are never touched.
    pub fn latest_numbers(&self) -> Vec<(String, u64)> {
        self.chains
            .iter()
            .filter_map(|(key, chain)| chain.latest().map(|v| (key.clone(), v.number())))
            .collect()
    }
}
