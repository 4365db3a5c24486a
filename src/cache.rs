//! Compiled pattern caching
//!
//! Compiling a template means building and compiling a regex. Code that
//! sees the same templates over and over (for example a resource registry
//! that rebuilds its tables) can share compiled patterns through a
//! [`PatternCache`] with LRU eviction.

use crate::error::Result;
use crate::pattern::UriPattern;
use crate::trace_log;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Cache performance statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub invalidations: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Template to compiled pattern cache with LRU eviction
///
/// Default capacity: 1000 entries.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use uri_dispatch::PatternCache;
///
/// let mut cache = PatternCache::new();
/// let first = cache.get_or_compile("/users/{id}").unwrap();
/// let second = cache.get_or_compile("/users/{id}").unwrap();
///
/// assert!(Arc::ptr_eq(&first, &second));
/// assert_eq!(cache.stats().hits, 1);
/// ```
#[derive(Debug)]
pub struct PatternCache {
    patterns: LruCache<String, Arc<UriPattern>>,
    stats: CacheStats,
}

impl PatternCache {
    const DEFAULT_CAPACITY: usize = 1000;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a cache holding at most `capacity` patterns
    ///
    /// A capacity of zero falls back to the default.
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity)
            .or(NonZeroUsize::new(Self::DEFAULT_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            patterns: LruCache::new(cap),
            stats: CacheStats::default(),
        }
    }

    /// Return the cached pattern for `template`, compiling it on a miss
    ///
    /// Templates that fail to compile are not cached.
    pub fn get_or_compile(&mut self, template: &str) -> Result<Arc<UriPattern>> {
        if let Some(pattern) = self.patterns.get(template) {
            self.stats.hits += 1;
            trace_log!("Pattern cache hit for template: '{}'", template);
            return Ok(Arc::clone(pattern));
        }

        self.stats.misses += 1;
        trace_log!("Pattern cache miss for template: '{}'", template);

        let pattern = Arc::new(UriPattern::new(template)?);
        self.patterns
            .push(template.to_string(), Arc::clone(&pattern));
        Ok(pattern)
    }

    pub fn clear(&mut self) {
        trace_log!("Clearing pattern cache");
        self.patterns.clear();
        self.stats.invalidations += 1;
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::default();
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.patterns.cap().get()
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for PatternCache {
    fn clone(&self) -> Self {
        let mut patterns = LruCache::new(self.patterns.cap());
        // Oldest first so the clone keeps the same eviction order
        for (template, pattern) in self.patterns.iter().rev() {
            patterns.push(template.clone(), Arc::clone(pattern));
        }
        Self {
            patterns,
            stats: self.stats.clone(),
        }
    }
}
