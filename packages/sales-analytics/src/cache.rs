//! Single-slot, time-bounded cache of the last fetched row set.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::types::record::RawSalesRow;

/// How long a fetched row set is reused when `ROW_CACHE_TTL_SECS` is unset.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
struct CachedRows {
    rows: Arc<Vec<RawSalesRow>>,
    fetched_at: DateTime<Utc>,
}

/// Process-wide row cache shared by all endpoints.
///
/// Callers pass `now` explicitly so expiry is testable without sleeping. A
/// zero TTL disables caching.
#[derive(Debug)]
pub struct RowCache {
    ttl: Duration,
    slot: RwLock<Option<CachedRows>>,
}

impl Default for RowCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl RowCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }

    /// Cache that never serves a hit.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached rows if they are still fresh at `now`.
    pub fn get(&self, now: DateTime<Utc>) -> Option<Arc<Vec<RawSalesRow>>> {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref()
            .filter(|cached| !is_expired(cached.fetched_at, now, self.ttl))
            .map(|cached| cached.rows.clone())
    }

    pub fn put(&self, rows: Arc<Vec<RawSalesRow>>, now: DateTime<Utc>) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(CachedRows {
            rows,
            fetched_at: now,
        });
    }

    pub fn clear(&self) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
    }

    /// When the cached rows were fetched, if any are held.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref().map(|cached| cached.fetched_at)
    }
}

/// An entry is stale once it is `ttl` old. A clock that went backwards keeps
/// the entry fresh.
pub fn is_expired(fetched_at: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    match (now - fetched_at).to_std() {
        Ok(age) => age >= ttl,
        Err(_) => false,
    }
}
