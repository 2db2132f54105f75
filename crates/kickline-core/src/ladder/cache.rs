// Ladder cache seam.
//
// The cache belongs to the caller. The engine only reads through it, writes
// back fresh results, and falls back to recomputing from source whenever an
// entry is missing, stale, or the cache itself fails.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::table::LadderEntry;
use crate::error::SourceError;

/// A computed ladder and when it was computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedLadder {
    pub round: u32,
    pub entries: Vec<LadderEntry>,
    pub computed_at: DateTime<Utc>,
}

impl CachedLadder {
    /// Fresh while younger than `freshness`. Entries stamped in the future are
    /// treated as stale.
    pub fn is_fresh(&self, now: DateTime<Utc>, freshness: Duration) -> bool {
        let age = now - self.computed_at;
        age >= Duration::zero() && age < freshness
    }
}

/// Keyed storage for computed ladders.
///
/// Implementations must make each call atomic on its own; the engine never
/// assumes serialized access across calls.
pub trait LadderCache {
    fn get(&self, round: u32) -> Result<Option<CachedLadder>, SourceError>;

    /// Insert or replace the entry for `entry.round`.
    fn put(&self, entry: &CachedLadder) -> Result<(), SourceError>;

    /// Drop every cached ladder for rounds `>= round`. Called whenever a
    /// roster, tip, or result for `round` changes.
    fn invalidate_from(&self, round: u32) -> Result<(), SourceError>;
}

/// In-process cache keyed by round.
#[derive(Debug, Default)]
pub struct MemoryLadderCache {
    entries: Mutex<HashMap<u32, CachedLadder>>,
}

impl MemoryLadderCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Panics if the mutex is poisoned.
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<u32, CachedLadder>> {
        self.entries.lock().expect("ladder cache mutex poisoned")
    }
}

impl LadderCache for MemoryLadderCache {
    fn get(&self, round: u32) -> Result<Option<CachedLadder>, SourceError> {
        Ok(self.lock().get(&round).cloned())
    }

    fn put(&self, entry: &CachedLadder) -> Result<(), SourceError> {
        self.lock().insert(entry.round, entry.clone());
        Ok(())
    }

    fn invalidate_from(&self, round: u32) -> Result<(), SourceError> {
        self.lock().retain(|&cached, _| cached < round);
        Ok(())
    }
}

/// A ladder plus where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LadderLookup {
    pub entries: Vec<LadderEntry>,
    pub computed_at: DateTime<Utc>,
    pub from_cache: bool,
}

/// Return the cached ladder for `round` if fresh, otherwise run `compute`
/// and store its result.
///
/// Cache failures are logged and never fail the lookup; only `compute` can.
pub fn cached_ladder<C, F, E>(
    cache: &C,
    round: u32,
    now: DateTime<Utc>,
    freshness: Duration,
    compute: F,
) -> Result<LadderLookup, E>
where
    C: LadderCache + ?Sized,
    F: FnOnce() -> Result<Vec<LadderEntry>, E>,
{
    match cache.get(round) {
        Ok(Some(hit)) if hit.is_fresh(now, freshness) => {
            debug!(round, computed_at = %hit.computed_at, "ladder cache hit");
            return Ok(LadderLookup {
                entries: hit.entries,
                computed_at: hit.computed_at,
                from_cache: true,
            });
        }
        Ok(Some(stale)) => {
            debug!(round, computed_at = %stale.computed_at, "ladder cache entry stale");
        }
        Ok(None) => debug!(round, "ladder cache miss"),
        Err(e) => warn!(round, error = %e, "ladder cache read failed; recomputing"),
    }

    let entries = compute()?;
    let fresh = CachedLadder {
        round,
        entries,
        computed_at: now,
    };
    if let Err(e) = cache.put(&fresh) {
        warn!(round, error = %e, "ladder cache write failed");
    }
    Ok(LadderLookup {
        entries: fresh.entries,
        computed_at: now,
        from_cache: false,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
