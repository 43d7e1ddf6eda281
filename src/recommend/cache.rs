use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::color::Color;
use crate::recommend::search::RecommendationSet;

/// Identity of a recommendation set: the hue plus the canonical hex strings of
/// the background and text colors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub hue: u16,
    pub background: String,
    pub text: String,
}

impl CacheKey {
    pub fn new(hue: u16, background: &Color, text: &Color) -> Self {
        Self {
            hue,
            background: background.to_hex(),
            text: text.to_hex(),
        }
    }
}

/// Memoized recommendation sets, owned by a single engine.
///
/// Entries never expire on their own; the owner invalidates them when a
/// dependency changes.
#[derive(Debug, Default)]
pub struct RecommendationCache {
    entries: HashMap<CacheKey, Arc<RecommendationSet>>,
}

impl RecommendationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached set for `key`, or build it with `compute` when it is
    /// missing or `force_recalculate` is set.
    pub fn get_or_compute<F>(
        &mut self,
        key: CacheKey,
        force_recalculate: bool,
        compute: F,
    ) -> Arc<RecommendationSet>
    where
        F: FnOnce() -> RecommendationSet,
    {
        if !force_recalculate {
            if let Some(set) = self.entries.get(&key) {
                debug!(?key, "recommendation cache hit");
                return Arc::clone(set);
            }
        }

        debug!(?key, force_recalculate, "recommendation cache miss");
        let set = Arc::new(compute());
        self.entries.insert(key, Arc::clone(&set));
        set
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<RecommendationSet>> {
        self.entries.get(key).cloned()
    }

    pub fn invalidate(&mut self, key: &CacheKey) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            debug!(?key, "invalidated recommendation set");
        }
        removed
    }

    /// Drop every set computed for `hue`, whatever colors it was built with.
    pub fn invalidate_hue(&mut self, hue: u16) {
        self.entries.retain(|key, _| key.hue != hue);
    }

    pub fn invalidate_all(&mut self) {
        if !self.entries.is_empty() {
            debug!(count = self.entries.len(), "cleared recommendation cache");
        }
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;
    use crate::recommend::search::search;

    fn key(hue: u16) -> CacheKey {
        CacheKey::new(hue, &Color::WHITE, &Color::BLACK)
    }

    fn compute(hue: u16) -> RecommendationSet {
        search(hue, &Color::WHITE, &Color::BLACK, &Options::default())
    }

    #[test]
    fn key_uses_canonical_hex() {
        let upper = Color::parse("#FFFFFF").unwrap();
        let short = Color::parse("#fff").unwrap();
        assert_eq!(
            CacheKey::new(10, &upper, &Color::BLACK),
            CacheKey::new(10, &short, &Color::BLACK)
        );
    }

    #[test]
    fn hit_returns_same_instance() {
        let mut cache = RecommendationCache::new();
        let first = cache.get_or_compute(key(210), false, || compute(210));
        let second = cache.get_or_compute(key(210), false, || panic!("should be cached"));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn force_recalculates_equal_value() {
        let mut cache = RecommendationCache::new();
        let first = cache.get_or_compute(key(210), false, || compute(210));
        let forced = cache.get_or_compute(key(210), true, || compute(210));
        assert!(!Arc::ptr_eq(&first, &forced));
        assert_eq!(*first, *forced);

        let cached = cache.get(&key(210)).unwrap();
        assert!(Arc::ptr_eq(&cached, &forced));
    }

    #[test]
    fn invalidation() {
        let mut cache = RecommendationCache::new();
        cache.get_or_compute(key(10), false, || compute(10));
        cache.get_or_compute(key(20), false, || compute(20));
        cache.get_or_compute(
            CacheKey::new(20, &Color::BLACK, &Color::WHITE),
            false,
            || compute(20),
        );

        assert!(cache.invalidate(&key(10)));
        assert!(!cache.invalidate(&key(10)));
        assert_eq!(cache.len(), 2);

        cache.invalidate_hue(20);
        assert!(cache.is_empty());

        cache.get_or_compute(key(30), false, || compute(30));
        cache.invalidate_all();
        assert!(cache.is_empty());
    }
}
