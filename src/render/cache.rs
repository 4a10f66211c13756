//! LRU cache of rendered pages, owned by one render service

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;

use super::request::{RenderKey, RenderedPage};

/// LRU cache for rendered page data
pub struct PageCache {
    cache: LruCache<RenderKey, Arc<RenderedPage>>,
}

impl PageCache {
    /// Create a new cache with the given capacity
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
        }
    }

    /// Get a cached page, promoting it in the LRU order
    #[must_use]
    pub fn get(&mut self, key: &RenderKey) -> Option<Arc<RenderedPage>> {
        self.cache.get(key).cloned()
    }

    /// Insert a page into the cache, returning an Arc to the data
    pub fn insert(&mut self, data: RenderedPage) -> Arc<RenderedPage> {
        let arc = Arc::new(data);
        self.cache.put(arc.key, arc.clone());
        arc
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewer::{Rotation, ZoomLevel};

    fn key(page: u32, zoom: ZoomLevel) -> RenderKey {
        RenderKey {
            page,
            zoom,
            rotation: Rotation::NONE,
            width_px: 10,
        }
    }

    fn page(key: RenderKey) -> RenderedPage {
        RenderedPage {
            key,
            width_px: 10,
            height_px: 10,
            pixels: vec![0; 300],
        }
    }

    #[test]
    fn cache_insert_and_get() {
        let mut cache = PageCache::new(10);
        let k = key(1, ZoomLevel::Actual);

        let stored = cache.insert(page(k));

        let hit = cache.get(&k).unwrap();
        assert!(Arc::ptr_eq(&stored, &hit));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn least_recently_viewed_page_is_evicted() {
        let mut cache = PageCache::new(2);
        cache.insert(page(key(1, ZoomLevel::Actual)));
        cache.insert(page(key(2, ZoomLevel::Actual)));

        // Revisit page 1 so page 2 becomes the oldest
        assert!(cache.get(&key(1, ZoomLevel::Actual)).is_some());
        cache.insert(page(key(3, ZoomLevel::Actual)));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&key(2, ZoomLevel::Actual)).is_none());
        assert!(cache.get(&key(1, ZoomLevel::Actual)).is_some());
        assert!(cache.get(&key(3, ZoomLevel::Actual)).is_some());
    }

    #[test]
    fn zoom_levels_are_cached_separately() {
        let mut cache = PageCache::new(10);
        cache.insert(page(key(1, ZoomLevel::Actual)));
        cache.insert(page(key(1, ZoomLevel::Double)));

        assert_eq!(cache.len(), 2);
        let double = cache.get(&key(1, ZoomLevel::Double)).unwrap();
        assert_eq!(double.key.zoom, ZoomLevel::Double);
        assert!(cache.get(&key(1, ZoomLevel::OneAndHalf)).is_none());
    }

    #[test]
    fn zero_capacity_still_holds_one_page() {
        let mut cache = PageCache::new(0);
        cache.insert(page(key(1, ZoomLevel::Actual)));
        cache.insert(page(key(2, ZoomLevel::Actual)));
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&key(2, ZoomLevel::Actual)).is_some());
    }
}
