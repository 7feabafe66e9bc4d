//! Single-slot cache for a cannon's last observed remote status.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use tokio::time::Instant;

use super::CannonStatus;

/// How long a fetched status is trusted before the endpoint is asked again.
pub const STATUS_CACHE_TTL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy)]
struct Entry {
    status: CannonStatus,
    fetched_at: Instant,
}

/// Holds at most one status per cannon, shared by every caller.
///
/// Readers never block each other; a refresh takes the write lock only long
/// enough to swap the entry.
#[derive(Debug)]
pub struct StatusCache {
    ttl: Duration,
    slot: RwLock<Option<Entry>>,
}

impl StatusCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached status if it was fetched no more than `ttl` ago.
    pub fn get(&self) -> Option<CannonStatus> {
        let entry = *self.slot.read().unwrap_or_else(PoisonError::into_inner);
        entry
            .filter(|entry| entry.fetched_at.elapsed() <= self.ttl)
            .map(|entry| entry.status)
    }

    /// Replaces the cached status and restarts its lifetime.
    pub fn store(&self, status: CannonStatus) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Entry {
            status,
            fetched_at: Instant::now(),
        });
    }
}

impl Default for StatusCache {
    fn default() -> Self {
        Self::new(STATUS_CACHE_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const READY: CannonStatus = CannonStatus {
        generation: 2,
        available: true,
    };

    #[tokio::test(start_paused = true)]
    async fn entry_expires_after_ttl() {
        let cache = StatusCache::default();
        assert_eq!(cache.get(), None);

        cache.store(READY);
        assert_eq!(cache.get(), Some(READY));

        tokio::time::advance(Duration::from_millis(100)).await;
        assert_eq!(cache.get(), Some(READY));

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(cache.get(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn store_overwrites_the_only_slot() {
        let cache = StatusCache::default();
        cache.store(READY);

        let busy = CannonStatus {
            generation: 2,
            available: false,
        };
        tokio::time::advance(Duration::from_millis(80)).await;
        cache.store(busy);

        tokio::time::advance(Duration::from_millis(80)).await;
        assert_eq!(cache.get(), Some(busy));
    }
}
