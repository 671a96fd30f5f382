// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use parking_lot::Mutex;
use peercache_lru::LruCache;

use crate::ByteView;

/// Size of a group's local cache at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cached keys.
    pub entries: usize,
    /// Bytes charged against the budget: key lengths plus value lengths.
    pub bytes: u64,
}

/// A group's local cache. The LRU is built on the first insert; lookups before that miss.
#[derive(Debug)]
pub(crate) struct LocalCache {
    max_bytes: u64,
    lru: Mutex<Option<LruCache<ByteView>>>,
}

impl LocalCache {
    pub(crate) fn new(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            lru: Mutex::new(None),
        }
    }

    pub(crate) fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Looks up `key` and marks it most recently used.
    pub(crate) fn get(&self, key: &str) -> Option<ByteView> {
        self.lru.lock().as_mut()?.get(key).cloned()
    }

    /// Looks up `key` without touching its recency.
    pub(crate) fn peek(&self, key: &str) -> Option<ByteView> {
        self.lru.lock().as_ref()?.peek(key).cloned()
    }

    pub(crate) fn add(&self, key: &str, value: ByteView) {
        self.lru
            .lock()
            .get_or_insert_with(|| LruCache::new(self.max_bytes))
            .add(key, value);
    }

    pub(crate) fn stats(&self) -> CacheStats {
        self.lru.lock().as_ref().map_or_else(CacheStats::default, |lru| CacheStats {
            entries: lru.len(),
            bytes: lru.used_bytes(),
        })
    }
}
