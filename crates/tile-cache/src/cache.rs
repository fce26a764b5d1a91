//! TTL-based in-memory tile cache.
//!
//! Entries older than the TTL are treated as misses on read but are not
//! removed; a miss makes the caller re-fetch, and the insert that follows
//! overwrites the stale entry in place. The cache is unbounded by size:
//! a viewport at practical zoom levels wants at most a few hundred tiles,
//! and stale entries are recycled by overwrite rather than eviction.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use raster_common::{Tile, TileKey};
use tokio::sync::RwLock;
use tracing::debug;

/// Default entry lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

struct CacheEntry {
    tile: Arc<Tile>,
    cached_at: Instant,
}

#[derive(Default)]
struct Stats {
    hits: AtomicU64,
    misses: AtomicU64,
    stale_misses: AtomicU64,
    insertions: AtomicU64,
}

/// A snapshot of cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub stale_misses: u64,
    pub insertions: u64,
}

impl CacheStats {
    /// Fraction of reads served from cache, in `[0, 1]`.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Async tile cache keyed by [`TileKey`].
///
/// Also tracks the set of keys with a fetch in flight, so concurrent
/// requests for the same tile collapse into one network call.
pub struct TileCache {
    entries: RwLock<HashMap<TileKey, CacheEntry>>,
    pending: RwLock<HashSet<TileKey>>,
    ttl: Duration,
    stats: Stats,
}

impl TileCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            pending: RwLock::new(HashSet::new()),
            ttl,
            stats: Stats::default(),
        }
    }

    /// Look up a tile, treating entries older than the TTL as absent.
    pub async fn get(&self, key: &TileKey) -> Option<Arc<Tile>> {
        self.get_at(key, Instant::now()).await
    }

    async fn get_at(&self, key: &TileKey, now: Instant) -> Option<Arc<Tile>> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) if now.duration_since(entry.cached_at) <= self.ttl => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                Some(Arc::clone(&entry.tile))
            }
            Some(_) => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                self.stats.stale_misses.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "cache entry stale");
                None
            }
            None => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insert a tile, resetting its age. Overwrites any existing entry.
    pub async fn put(&self, tile: Tile) {
        let key = tile.key.clone();
        let entry = CacheEntry {
            tile: Arc::new(tile),
            cached_at: Instant::now(),
        };
        self.entries.write().await.insert(key, entry);
        self.stats.insertions.fetch_add(1, Ordering::Relaxed);
    }

    /// Claim a key for fetching. Returns `true` if the caller won the claim
    /// and should perform the fetch; `false` if a fetch is already in flight.
    pub async fn mark_pending(&self, key: &TileKey) -> bool {
        self.pending.write().await.insert(key.clone())
    }

    /// Release a key claimed with [`mark_pending`](Self::mark_pending).
    /// Must be called on both the success and failure paths.
    pub async fn clear_pending(&self, key: &TileKey) {
        self.pending.write().await.remove(key);
    }

    pub async fn is_pending(&self, key: &TileKey) -> bool {
        self.pending.read().await.contains(key)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drop all entries and pending claims.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
        self.pending.write().await.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.stats.hits.load(Ordering::Relaxed),
            misses: self.stats.misses.load(Ordering::Relaxed),
            stale_misses: self.stats.stale_misses.load(Ordering::Relaxed),
            insertions: self.stats.insertions.load(Ordering::Relaxed),
        }
    }
}

impl Default for TileCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
