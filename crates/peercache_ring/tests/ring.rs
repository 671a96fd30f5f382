// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for `HashRing`.

use std::collections::HashMap;

use peercache_ring::HashRing;

/// Treats the input as a decimal number so ring positions can be predicted.
fn decimal(data: &[u8]) -> u32 {
    std::str::from_utf8(data).unwrap().parse().unwrap()
}

#[test]
fn keys_map_to_clockwise_successor() {
    let mut ring = HashRing::with_hasher(3, decimal);

    // Points: 2, 4, 6, 12, 14, 16, 22, 24, 26
    ring.add(["6", "4", "2"]);

    let cases = [("2", "2"), ("11", "2"), ("23", "4"), ("27", "2")];
    for (key, node) in cases {
        assert_eq!(ring.get(key), Some(node), "key {key}");
    }

    // Points 8, 18, 28 now sit in front of the wrap-around.
    ring.add(["8"]);
    assert_eq!(ring.get("27"), Some("8"));
}

#[test]
fn hash_past_last_point_wraps_to_first() {
    let mut ring = HashRing::with_hasher(2, decimal);

    // Points: 3, 5, 13, 15
    ring.add(["3", "5"]);

    // 16 exceeds every point, so the smallest one (3) owns it.
    assert_eq!(ring.get("16"), Some("3"));
    assert_eq!(ring.get("4294967295"), Some("3"));
    assert_eq!(ring.get("0"), Some("3"));
}

#[test]
fn empty_ring_has_no_owner() {
    let ring = HashRing::new(50);
    assert_eq!(ring.get("key"), None);
    assert!(ring.is_empty());
}

#[test]
fn lookups_are_deterministic_across_rings() {
    let nodes = ["http://10.0.0.1:8001", "http://10.0.0.2:8001", "http://10.0.0.3:8001"];

    let mut first = HashRing::new(50);
    first.add(nodes);
    let mut second = HashRing::new(50);
    second.add(nodes);

    for i in 0..1_000 {
        let key = format!("key-{i}");
        let owner = first.get(&key);
        assert!(owner.is_some());
        assert_eq!(owner, first.get(&key), "repeat lookup of {key}");
        assert_eq!(owner, second.get(&key), "independent ring for {key}");
    }
}

#[test]
fn ring_size_is_replicas_times_nodes() {
    let mut ring = HashRing::new(7);
    ring.add(["a", "b", "c"]);
    assert_eq!(ring.len(), 21);
    assert_eq!(ring.replicas(), 7);
}

#[test]
fn virtual_replicas_spread_keys_over_all_nodes() {
    let mut ring = HashRing::new(50);
    ring.add(["alpha", "beta", "gamma", "delta"]);

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for i in 0..4_000 {
        let key = format!("item:{i}");
        *counts.entry(ring.get(&key).unwrap()).or_default() += 1;
    }

    assert_eq!(counts.len(), 4);
    for (node, count) in counts {
        assert!(count > 200, "node {node} only owns {count} of 4000 keys");
    }
}

#[test]
fn adding_a_node_only_moves_keys_to_that_node() {
    let mut before = HashRing::new(50);
    before.add(["alpha", "beta", "gamma"]);
    let mut after = before.clone();
    after.add(["delta"]);

    for i in 0..2_000 {
        let key = format!("item:{i}");
        let (old, new) = (before.get(&key).unwrap(), after.get(&key).unwrap());
        assert!(old == new || new == "delta", "{key} moved from {old} to {new}");
    }
}
