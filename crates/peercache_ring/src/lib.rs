// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Consistent hashing with virtual replicas.
//!
//! [`HashRing`] places every node at `replicas` pseudo-random points on a `u32` ring and
//! assigns a key to the first point at or after the key's own hash, wrapping around to the
//! smallest point when the key hashes past the last one. Spreading each node over many
//! points keeps the key distribution even with few nodes and limits how many keys move
//! when the node set changes.
//!
//! Every process that builds a ring from the same node names, replica count and hash
//! function gets the same assignment, which is what lets cache nodes agree on key ownership
//! without talking to each other.
//!
//! # Example
//!
//! ```
//! use peercache_ring::HashRing;
//!
//! let mut ring = HashRing::new(50);
//! ring.add(["http://10.0.0.1:8001", "http://10.0.0.2:8001", "http://10.0.0.3:8001"]);
//!
//! let owner = ring.get("user:42").unwrap();
//! assert_eq!(ring.get("user:42"), Some(owner));
//! ```

use std::collections::HashMap;

/// Hash function mapping bytes onto the ring.
///
/// It must be deterministic across calls and processes.
pub type HashFn = fn(&[u8]) -> u32;

/// Default hash: CRC-32 (IEEE) checksum.
#[must_use]
pub fn crc32(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// A consistent hash ring mapping keys to node names.
#[derive(Clone)]
pub struct HashRing {
    hash: HashFn,
    replicas: usize,
    points: Vec<u32>,
    owners: HashMap<u32, String>,
}

impl std::fmt::Debug for HashRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashRing")
            .field("replicas", &self.replicas)
            .field("points", &self.points.len())
            .finish_non_exhaustive()
    }
}

impl HashRing {
    /// Creates an empty ring that places each node at `replicas` points, hashed with CRC-32.
    #[must_use]
    pub fn new(replicas: usize) -> Self {
        Self::with_hasher(replicas, crc32)
    }

    /// Creates an empty ring with a custom hash function.
    ///
    /// ```
    /// use peercache_ring::HashRing;
    ///
    /// fn first_byte(data: &[u8]) -> u32 {
    ///     data.first().copied().map_or(0, u32::from)
    /// }
    ///
    /// let ring = HashRing::with_hasher(3, first_byte);
    /// assert!(ring.is_empty());
    /// ```
    #[must_use]
    pub fn with_hasher(replicas: usize, hash: HashFn) -> Self {
        Self {
            hash,
            replicas,
            points: Vec::new(),
            owners: HashMap::new(),
        }
    }

    /// Adds nodes to the ring.
    ///
    /// Replica `i` of node `name` lands at `hash("{i}{name}")`. Points are sorted once after
    /// all nodes are placed. If two points collide, the node added last owns the slot.
    pub fn add<I, S>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for node in nodes {
            let node = node.as_ref();
            for replica in 0..self.replicas {
                let point = (self.hash)(format!("{replica}{node}").as_bytes());
                self.points.push(point);
                self.owners.insert(point, node.to_owned());
            }
        }
        self.points.sort_unstable();
    }

    /// Returns the node owning `key`, or `None` if no node was added.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.points.is_empty() {
            return None;
        }

        let hash = (self.hash)(key.as_bytes());
        let idx = self.points.partition_point(|&point| point < hash);
        let point = self.points[idx % self.points.len()];
        self.owners.get(&point).map(String::as_str)
    }

    /// Number of points on the ring, `replicas` per added node.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if no node was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points placed per node.
    #[must_use]
    pub fn replicas(&self) -> usize {
        self.replicas
    }
}
