//! Garbage collection policy
//!
//! Retention policies decide which non-latest versions of a chain may be
//! reclaimed. The sweep itself lives in the store façade (it owns the
//! locks and the journal); this module owns the pure arithmetic.
//!
//! ## Invariant
//! The latest version at sweep start is never reclaimable, and reclamation
//! only ever removes a prefix of a chain: timestamps are non-decreasing
//! along a chain, so an age cutoff is a prefix cut too.

use chrono::{DateTime, Duration, Utc};

use super::VersionChain;

/// Rule for how much version history the garbage collector retains.
///
/// Used only by GC; reads and writes never consult it.
#[derive(Debug, Clone, PartialEq)]
pub enum RetentionPolicy {
    /// Cap a chain at `n` retained versions.
    MaxVersions(usize),
    /// Reclaim versions older than the given age at sweep start.
    MaxAge(Duration),
    /// Keep exactly the newest `n` versions.
    KeepLatest(usize),
}

impl RetentionPolicy {
    /// Keep at most the newest `n` versions of each chain.
    pub fn keep_latest(n: usize) -> Self {
        RetentionPolicy::KeepLatest(n)
    }

    /// Reclaim versions older than `age` at sweep start.
    pub fn max_age(age: Duration) -> Self {
        RetentionPolicy::MaxAge(age)
    }

    /// Lowest version number of `chain` this policy retains, given the
    /// sweep snapshot's latest number and the sweep start time.
    ///
    /// Never exceeds `snapshot_latest`: the snapshot's latest version is
    /// always retained, and versions newer than the snapshot are not this
    /// sweep's to judge.
    pub fn retain_floor(
        &self,
        chain: &VersionChain,
        snapshot_latest: u64,
        sweep_start: DateTime<Utc>,
    ) -> u64 {
        match self {
            RetentionPolicy::MaxVersions(n) | RetentionPolicy::KeepLatest(n) => {
                let keep = (*n).max(1) as u64;
                snapshot_latest.saturating_sub(keep - 1).max(1)
            }
            RetentionPolicy::MaxAge(age) => {
                let cutoff = sweep_start - *age;
                chain
                    .versions()
                    .iter()
                    .take_while(|v| v.number() <= snapshot_latest)
                    .find(|v| v.timestamp() >= cutoff)
                    .map(|v| v.number())
                    .unwrap_or(snapshot_latest)
            }
        }
    }
}

/// What a sweep removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GcReport {
    /// Total versions reclaimed across all chains.
    pub versions_removed: usize,
    /// Number of keys that lost at least one version.
    pub keys_affected: usize,
}
