//! Average color cache for fast theme switches.
//!
//! Keeps the sampled average color of recently shown photos using an LRU
//! policy, so a theme change or a revisit does not need the decoded image.

use crate::services::ambient_service::Rgb;
use lru::LruCache;
use std::num::NonZeroUsize;

/// LRU cache from photo path to its sampled average color.
pub struct ImageCache {
    cache: LruCache<String, Rgb>,
}

impl ImageCache {
    /// Creates a new cache with the specified capacity (at least one entry).
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
        }
    }

    /// Retrieves the average color of a photo if it is cached.
    pub fn get(&mut self, path: &str) -> Option<Rgb> {
        let result = self.cache.get(path).copied();
        if result.is_some() {
            log::debug!("Cache HIT: {}", path);
        } else {
            log::debug!("Cache MISS: {}", path);
        }
        result
    }

    /// Stores the average color of a photo.
    pub fn put(&mut self, path: impl Into<String>, average: Rgb) {
        let path = path.into();
        log::debug!(
            "Cache PUT: {} (rgb {} {} {})",
            path,
            average.r,
            average.g,
            average.b
        );
        self.cache.put(path, average);
    }

    /// Checks if a photo is in the cache without touching its recency.
    pub fn contains(&self, path: &str) -> bool {
        self.cache.contains(path)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
