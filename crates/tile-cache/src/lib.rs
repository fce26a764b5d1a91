//! In-memory tile cache with TTL staleness and single-flight bookkeeping.

mod cache;

pub use cache::{CacheStats, TileCache, DEFAULT_TTL};
