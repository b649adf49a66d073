//! Cache sizing and expiry.

use std::time::Duration;

/// Bounds for one cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub max_capacity: u64,
    /// Evict this long after insertion.
    pub ttl: Option<Duration>,
    /// Evict after this long without a read.
    pub tti: Option<Duration>,
}

impl CacheConfig {
    /// Upstream Quran content. The text never changes, so entries only
    /// expire to bound memory.
    pub fn content() -> Self {
        Self {
            max_capacity: 2_000,
            ttl: Some(Duration::from_secs(60 * 60)),
            tti: Some(Duration::from_secs(15 * 60)),
        }
    }
}
