//! Result caching for repeated diffs.
//!
//! A report depends only on the bytes of both input files, the schema
//! generation and the options. [`DiffCacheKey`] hashes exactly those, so a
//! fleet where many nodes compile to identical catalogs computes each
//! distinct pair once.

use crate::diff::DiffReport;
use crate::diff::DiffOptions;
use crate::error::{CatalogDiffError, Result};
use crate::model::SchemaGeneration;
use crate::utils::content_hash;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

// ============================================================================
// Cache Key
// ============================================================================

/// Key for diff cache lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiffCacheKey {
    /// Hash of the old catalog file
    pub old_hash: u64,
    /// Hash of the new catalog file
    pub new_hash: u64,
    /// Hash of schema generation and options
    pub options_hash: u64,
}

impl DiffCacheKey {
    /// Build a key from file contents already in memory.
    #[must_use]
    pub fn from_bytes(
        old: &[u8],
        new: &[u8],
        schema: SchemaGeneration,
        options: &DiffOptions,
    ) -> Self {
        let mut hasher = DefaultHasher::new();
        schema.hash(&mut hasher);
        options.hash(&mut hasher);
        Self {
            old_hash: content_hash(old),
            new_hash: content_hash(new),
            options_hash: hasher.finish(),
        }
    }

    /// Build a key by reading both files.
    pub fn from_files(
        old: &Path,
        new: &Path,
        schema: SchemaGeneration,
        options: &DiffOptions,
    ) -> Result<Self> {
        let old_bytes = std::fs::read(old).map_err(|e| CatalogDiffError::io(old, e))?;
        let new_bytes = std::fs::read(new).map_err(|e| CatalogDiffError::io(new, e))?;
        Ok(Self::from_bytes(&old_bytes, &new_bytes, schema, options))
    }
}

// ============================================================================
// Cached Entry
// ============================================================================

/// A cached report with metadata.
#[derive(Debug, Clone)]
struct CachedReport {
    report: Arc<DiffReport>,
    computed_at: Instant,
}

impl CachedReport {
    fn is_valid(&self, ttl: Duration) -> bool {
        self.computed_at.elapsed() < ttl
    }

    fn age(&self) -> Duration {
        self.computed_at.elapsed()
    }
}

// ============================================================================
// Diff Cache
// ============================================================================

/// Configuration for the diff cache.
#[derive(Debug, Clone)]
pub struct DiffCacheConfig {
    /// Maximum number of entries to cache
    pub max_entries: usize,
    /// Time-to-live for cache entries
    pub ttl: Duration,
}

impl Default for DiffCacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            ttl: Duration::from_secs(3600),
        }
    }
}

/// Statistics for cache performance.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Total cache lookups
    pub lookups: u64,
    /// Cache hits
    pub hits: u64,
    /// Cache misses
    pub misses: u64,
    /// Entries evicted
    pub evictions: u64,
}

impl CacheStats {
    /// Get the cache hit rate.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        if self.lookups == 0 {
            0.0
        } else {
            self.hits as f64 / self.lookups as f64
        }
    }
}

/// Thread-safe cache of diff reports.
pub struct DiffCache {
    cache: RwLock<HashMap<DiffCacheKey, CachedReport>>,
    config: DiffCacheConfig,
    stats: RwLock<CacheStats>,
}

impl DiffCache {
    /// Create a new diff cache with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DiffCacheConfig::default())
    }

    /// Create a new diff cache with custom configuration.
    #[must_use]
    pub fn with_config(config: DiffCacheConfig) -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
            config,
            stats: RwLock::new(CacheStats::default()),
        }
    }

    /// Look up a cached report.
    ///
    /// Returns `Some` if an entry exists and has not expired.
    pub fn get(&self, key: &DiffCacheKey) -> Option<Arc<DiffReport>> {
        let result = {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            cache.get(key).and_then(|entry| {
                entry
                    .is_valid(self.config.ttl)
                    .then(|| Arc::clone(&entry.report))
            })
        };

        let mut stats = self.stats.write().unwrap_or_else(PoisonError::into_inner);
        stats.lookups += 1;
        if result.is_some() {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
        result
    }

    /// Store a report, evicting the oldest entries when full.
    pub fn put(&self, key: DiffCacheKey, report: Arc<DiffReport>) {
        if self.config.max_entries == 0 {
            return;
        }
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);

        while cache.len() >= self.config.max_entries && !cache.contains_key(&key) {
            let Some(oldest_key) = Self::find_oldest_entry(&cache) else {
                break;
            };
            cache.remove(&oldest_key);
            self.stats
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .evictions += 1;
        }

        cache.insert(
            key,
            CachedReport {
                report,
                computed_at: Instant::now(),
            },
        );
    }

    /// Return the cached report for `key`, computing and storing it on a miss.
    ///
    /// Errors are not cached.
    pub fn get_or_compute<F>(&self, key: DiffCacheKey, compute: F) -> Result<Arc<DiffReport>>
    where
        F: FnOnce() -> Result<DiffReport>,
    {
        if let Some(report) = self.get(&key) {
            return Ok(report);
        }
        let report = Arc::new(compute()?);
        self.put(key, Arc::clone(&report));
        Ok(report)
    }

    fn find_oldest_entry(cache: &HashMap<DiffCacheKey, CachedReport>) -> Option<DiffCacheKey> {
        cache
            .iter()
            .max_by_key(|(_, entry)| entry.age())
            .map(|(key, _)| key.clone())
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Clear all cached entries.
    pub fn clear(&self) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Get the number of cached entries.
    pub fn len(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DiffCache {
    fn default() -> Self {
        Self::new()
    }
}
