//! In-memory cache of decoded images.
//!
//! Keyed by identifier and target size. LRU policy, bounded both by entry
//! count and by the total size of the decoded pixels it holds.

use super::DecodedImage;
use crate::identifier::ResourceIdentifier;
use lru::LruCache;
use std::num::NonZeroUsize;

/// Cache key: identifier plus requested target size (`None` for native size).
pub type CacheKey = (ResourceIdentifier, Option<(u32, u32)>);

/// LRU cache for storing decoded images.
pub struct ImageCache {
    cache: LruCache<CacheKey, DecodedImage>,
    max_bytes: usize,
    bytes: usize,
}

impl ImageCache {
    /// Creates a cache holding at most `capacity` images and `max_bytes` of
    /// pixel data. A capacity of zero is treated as one.
    pub fn new(capacity: usize, max_bytes: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
            max_bytes,
            bytes: 0,
        }
    }

    /// Retrieves an image from the cache if it exists.
    pub fn get(&mut self, key: &CacheKey) -> Option<DecodedImage> {
        let result = self.cache.get(key).cloned();
        if result.is_some() {
            log::debug!("Cache HIT: {}", key.0);
        } else {
            log::debug!("Cache MISS: {}", key.0);
        }
        result
    }

    /// Stores an image, evicting least recently used entries until both
    /// limits hold. An image larger than the whole byte budget is not kept.
    pub fn put(&mut self, key: CacheKey, image: DecodedImage) {
        let size = image.data.len();
        if size > self.max_bytes {
            log::debug!(
                "Cache SKIP: {} ({} bytes exceeds budget of {})",
                key.0,
                size,
                self.max_bytes
            );
            return;
        }

        log::debug!("Cache PUT: {} ({}x{})", key.0, image.width, image.height);
        if let Some((_, displaced)) = self.cache.push(key, image) {
            self.bytes -= displaced.data.len();
        }
        self.bytes += size;

        while self.bytes > self.max_bytes {
            let Some((evicted, image)) = self.cache.pop_lru() else {
                break;
            };
            log::debug!("Cache EVICT: {}", evicted.0);
            self.bytes -= image.data.len();
        }
        log::debug!(
            "Cache holds {} images, {} bytes",
            self.cache.len(),
            self.bytes
        );
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.cache.contains(key)
    }
}
