// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for `LruCache`.

use std::sync::{Arc, Mutex};

use peercache_lru::{ByteSize, LruCache};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Blob(usize);

impl ByteSize for Blob {
    fn byte_len(&self) -> usize {
        self.0
    }
}

#[test]
fn get_hit_and_miss() {
    let mut cache = LruCache::new(0);
    cache.add("key1", "1234".to_string());

    assert_eq!(cache.get("key1").map(String::as_str), Some("1234"));
    assert!(cache.get("key2").is_none());
}

#[test]
fn remove_oldest_when_budget_exceeded() {
    let (k1, k2, k3) = ("key1", "key2", "k3");
    let (v1, v2, v3) = ("value1", "value2", "v3");
    let budget = (k1.len() + k2.len() + v1.len() + v2.len()) as u64;

    let mut cache = LruCache::new(budget);
    cache.add(k1, v1.to_string());
    cache.add(k2, v2.to_string());
    cache.add(k3, v3.to_string());

    assert!(cache.get(k1).is_none());
    assert_eq!(cache.len(), 2);
}

#[test]
fn oldest_entry_is_evicted_without_intervening_reads() {
    // Each entry weighs 3 bytes, so exactly two fit.
    let mut cache = LruCache::new(6);

    // Access sequence: add A, add B, add C.
    cache.add("A", "aa".to_string());
    cache.add("B", "bb".to_string());
    cache.add("C", "cc".to_string());

    assert!(cache.get("A").is_none());
    assert_eq!(cache.get("B").map(String::as_str), Some("bb"));
    assert_eq!(cache.get("C").map(String::as_str), Some("cc"));
}

#[test]
fn read_promotes_entry_over_newer_one() {
    let mut cache = LruCache::new(6);

    // Access sequence: add A, add B, get A, add C. B is now the least recently used.
    cache.add("A", "aa".to_string());
    cache.add("B", "bb".to_string());
    assert!(cache.get("A").is_some());
    cache.add("C", "cc".to_string());

    assert!(cache.get("B").is_none());
    assert_eq!(cache.get("A").map(String::as_str), Some("aa"));
    assert_eq!(cache.get("C").map(String::as_str), Some("cc"));
}

#[test]
fn overwrite_promotes_entry() {
    let mut cache = LruCache::new(6);
    cache.add("A", "aa".to_string());
    cache.add("B", "bb".to_string());
    cache.add("A", "zz".to_string());
    cache.add("C", "cc".to_string());

    assert!(!cache.contains("B"));
    assert_eq!(cache.peek("A").map(String::as_str), Some("zz"));
}

#[test]
fn eviction_callback_receives_every_evicted_entry() {
    let evicted = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&evicted);
    let mut cache = LruCache::with_eviction_callback(10, move |key, value: String| {
        sink.lock().unwrap().push((key, value));
    });

    cache.add("key1", "123456".to_string());
    cache.add("k2", "k2".to_string());
    cache.add("k3", "k3".to_string());
    cache.add("k4", "k4".to_string());

    assert_eq!(
        *evicted.lock().unwrap(),
        vec![("key1".to_string(), "123456".to_string()), ("k2".to_string(), "k2".to_string())]
    );
}

#[test]
fn oversized_value_is_never_retrievable() {
    let evicted = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&evicted);
    let mut cache = LruCache::with_eviction_callback(8, move |key, _value: Blob| {
        sink.lock().unwrap().push(key);
    });

    cache.add("small", Blob(1));
    cache.add("huge", Blob(100));

    assert!(cache.get("huge").is_none());
    assert!(cache.is_empty());
    assert_eq!(cache.used_bytes(), 0);
    assert_eq!(*evicted.lock().unwrap(), vec!["small".to_string(), "huge".to_string()]);
}

#[test]
fn remove_oldest_on_empty_cache_is_noop() {
    let mut cache: LruCache<String> = LruCache::new(16);
    cache.remove_oldest();
    assert!(cache.is_empty());
    assert_eq!(cache.used_bytes(), 0);
}

#[test]
fn remove_oldest_decrements_bytes() {
    let mut cache = LruCache::new(0);
    cache.add("a", Blob(4));
    cache.add("bb", Blob(5));
    assert_eq!(cache.used_bytes(), 12);

    cache.remove_oldest();
    assert_eq!(cache.used_bytes(), 7);
    assert!(!cache.contains("a"));
    assert!(cache.contains("bb"));
}

#[test]
fn zero_budget_never_evicts() {
    let mut cache = LruCache::new(0);
    for i in 0..1_000 {
        cache.add(format!("key-{i}"), Blob(64));
    }
    assert_eq!(cache.len(), 1_000);
    assert_eq!(cache.max_bytes(), 0);
}

#[test]
fn budget_and_accounting_hold_after_every_add() {
    let mut cache = LruCache::new(50);

    // A deterministic mix of inserts, overwrites and reads with varying sizes.
    for step in 0_usize..500 {
        let key = format!("k{}", step % 17);
        cache.add(key.clone(), Blob((step * 7) % 23));
        if step % 3 == 0 {
            let _ = cache.get(&format!("k{}", step % 5));
        }

        let expected: u64 = cache
            .keys()
            .map(|key| (key.len() + cache.peek(key).unwrap().byte_len()) as u64)
            .sum();
        assert_eq!(cache.used_bytes(), expected, "step {step}");
        assert!(cache.used_bytes() <= 50, "step {step}");
        assert_eq!(cache.keys().count(), cache.len(), "step {step}");
    }
}

#[test]
fn keys_are_listed_most_recent_first() {
    let mut cache = LruCache::new(0);
    cache.add("x", Blob(1));
    cache.add("y", Blob(1));
    cache.add("z", Blob(1));
    let _ = cache.get("x");

    assert_eq!(cache.keys().collect::<Vec<_>>(), ["x", "z", "y"]);
}
