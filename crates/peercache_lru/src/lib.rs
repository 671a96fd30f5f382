// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A least-recently-used cache bounded by a byte budget.
//!
//! [`LruCache`] keeps entries in strict recency order and charges every entry
//! `key.len() + value.byte_len()` bytes against its budget. Each insertion ends with an
//! eviction pass that drops the least recently used entries until the budget holds again.
//! A budget of `0` disables eviction.
//!
//! The cache is a plain single-owner data structure: all operations take `&mut self` and
//! none of them block or fail. Callers that share it between threads wrap it in a mutex.
//!
//! # Example
//!
//! ```
//! use peercache_lru::LruCache;
//!
//! // "a" + "11" and "b" + "22" fit, the third entry pushes the oldest one out.
//! let mut cache = LruCache::new(6);
//! cache.add("a", "11".to_string());
//! cache.add("b", "22".to_string());
//! cache.add("c", "33".to_string());
//!
//! assert!(cache.get("a").is_none());
//! assert_eq!(cache.get("c").map(String::as_str), Some("33"));
//! assert_eq!(cache.used_bytes(), 6);
//! ```

use std::collections::HashMap;
use std::fmt::Debug;

mod size;

#[doc(inline)]
pub use size::ByteSize;

/// Callback invoked with every entry the cache evicts.
pub type EvictionCallback<V> = Box<dyn FnMut(String, V) + Send>;

/// Marks the end of the recency list.
const NIL: usize = usize::MAX;

struct Node<V> {
    key: String,
    value: V,
    prev: usize,
    next: usize,
}

/// A byte-budgeted LRU cache with string keys.
///
/// Entries live in a slab and are threaded onto an intrusive doubly linked list ordered from
/// most recently used (head) to least recently used (tail). The key index and the list always
/// describe the same set of entries.
pub struct LruCache<V> {
    max_bytes: u64,
    used_bytes: u64,
    index: HashMap<String, usize>,
    slots: Vec<Option<Node<V>>>,
    free: Vec<usize>,
    head: usize,
    tail: usize,
    on_evicted: Option<EvictionCallback<V>>,
}

impl<V> Debug for LruCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruCache")
            .field("max_bytes", &self.max_bytes)
            .field("used_bytes", &self.used_bytes)
            .field("len", &self.index.len())
            .field("on_evicted", &self.on_evicted.is_some())
            .finish()
    }
}

impl<V: ByteSize> LruCache<V> {
    /// Creates a cache that holds at most `max_bytes` bytes of keys and values.
    ///
    /// A budget of `0` means the cache never evicts.
    #[must_use]
    pub fn new(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            used_bytes: 0,
            index: HashMap::new(),
            slots: Vec::new(),
            free: Vec::new(),
            head: NIL,
            tail: NIL,
            on_evicted: None,
        }
    }

    /// Creates a cache that hands every evicted entry to `on_evicted`.
    ///
    /// ```
    /// use std::sync::{Arc, Mutex};
    /// use peercache_lru::LruCache;
    ///
    /// let evicted = Arc::new(Mutex::new(Vec::new()));
    /// let sink = Arc::clone(&evicted);
    /// let mut cache = LruCache::with_eviction_callback(4, move |key, _value: String| {
    ///     sink.lock().unwrap().push(key);
    /// });
    ///
    /// cache.add("k1", "v1".to_string());
    /// cache.add("k2", "v2".to_string());
    ///
    /// assert_eq!(*evicted.lock().unwrap(), vec!["k1".to_string()]);
    /// ```
    #[must_use]
    pub fn with_eviction_callback(max_bytes: u64, on_evicted: impl FnMut(String, V) + Send + 'static) -> Self {
        let mut cache = Self::new(max_bytes);
        cache.on_evicted = Some(Box::new(on_evicted));
        cache
    }

    /// Looks up `key` and marks it as the most recently used entry.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.move_to_front(idx);
        Some(&self.node(idx).value)
    }

    /// Looks up `key` without touching the recency order.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&idx| &self.node(idx).value)
    }

    /// Returns `true` if `key` is cached, without touching the recency order.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Inserts or replaces the value stored under `key` and marks it most recently used.
    ///
    /// Afterwards the least recently used entries are evicted until the cache is back within
    /// its budget. A value larger than the whole budget is therefore evicted right away.
    pub fn add(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();

        if let Some(&idx) = self.index.get(key.as_str()) {
            let added = value.byte_len() as u64;
            let node = self.node_mut(idx);
            let removed = node.value.byte_len() as u64;
            node.value = value;
            self.used_bytes = self.used_bytes - removed + added;
            self.move_to_front(idx);
        } else {
            self.used_bytes += weight(&key, &value);
            let idx = self.allocate(Node {
                key: key.clone(),
                value,
                prev: NIL,
                next: NIL,
            });
            self.push_front(idx);
            self.index.insert(key, idx);
        }

        while self.max_bytes != 0 && self.used_bytes > self.max_bytes {
            self.remove_oldest();
        }
    }

    /// Evicts the least recently used entry, if any.
    pub fn remove_oldest(&mut self) {
        if self.tail == NIL {
            return;
        }

        let idx = self.tail;
        self.unlink(idx);
        let node = self.release(idx);
        self.index.remove(node.key.as_str());
        self.used_bytes -= weight(&node.key, &node.value);

        if let Some(on_evicted) = self.on_evicted.as_mut() {
            on_evicted(node.key, node.value);
        }
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Bytes currently charged against the budget.
    #[must_use]
    pub fn used_bytes(&self) -> u64 {
        self.used_bytes
    }

    /// The byte budget, `0` when unbounded.
    #[must_use]
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            if cursor == NIL {
                return None;
            }
            let node = self.node(cursor);
            cursor = node.next;
            Some(node.key.as_str())
        })
    }
}

impl<V> LruCache<V> {
    fn node(&self, idx: usize) -> &Node<V> {
        self.slots[idx].as_ref().expect("indexed slot is always occupied")
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node<V> {
        self.slots[idx].as_mut().expect("indexed slot is always occupied")
    }

    fn allocate(&mut self, node: Node<V>) -> usize {
        if let Some(idx) = self.free.pop() {
            self.slots[idx] = Some(node);
            idx
        } else {
            self.slots.push(Some(node));
            self.slots.len() - 1
        }
    }

    fn release(&mut self, idx: usize) -> Node<V> {
        let node = self.slots[idx].take().expect("released slot is always occupied");
        self.free.push(idx);
        node
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let node = self.node(idx);
            (node.prev, node.next)
        };

        if prev == NIL {
            self.head = next;
        } else {
            self.node_mut(prev).next = next;
        }

        if next == NIL {
            self.tail = prev;
        } else {
            self.node_mut(next).prev = prev;
        }

        let node = self.node_mut(idx);
        node.prev = NIL;
        node.next = NIL;
    }

    fn push_front(&mut self, idx: usize) {
        let old_head = self.head;
        {
            let node = self.node_mut(idx);
            node.prev = NIL;
            node.next = old_head;
        }

        if old_head == NIL {
            self.tail = idx;
        } else {
            self.node_mut(old_head).prev = idx;
        }
        self.head = idx;
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head != idx {
            self.unlink(idx);
            self.push_front(idx);
        }
    }
}

fn weight<V: ByteSize>(key: &str, value: &V) -> u64 {
    (key.len() + value.byte_len()) as u64
}
