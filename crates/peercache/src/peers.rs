// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Seams between a group and the other nodes of the cluster.

use std::{fmt::Debug, future::Future, sync::Arc};

use bytes::Bytes;

use crate::Result;

/// Chooses which node owns a key.
///
/// Returning `None` means the current node owns the key (or no peers are known) and the value
/// must be loaded locally. Implementations must be deterministic across the cluster so that
/// every node forwards a key to the same owner.
pub trait PeerPicker: Send + Sync {
    /// Returns the remote peer owning `key`, or `None` if it is owned locally.
    fn pick_peer(&self, key: &str) -> Option<Peer>;
}

/// Fetches a value from a remote peer.
#[dynosaur::dynosaur(pub(crate) DynPeerGetter = dyn(box) PeerGetter, bridge(none))]
pub trait PeerGetter: Send + Sync {
    /// Fetches the value stored under `key` in the peer's group `group`.
    fn get(&self, group: &str, key: &str) -> impl Future<Output = Result<Bytes>> + Send;
}

/// A handle to a remote peer: its address plus the client used to reach it.
///
/// Cloning is cheap; clones share the same client.
#[derive(Clone)]
pub struct Peer {
    address: Arc<str>,
    getter: Arc<DynPeerGetter<'static>>,
}

impl Peer {
    /// Creates a handle for the peer at `address`, reached through `getter`.
    pub fn new(address: impl Into<Arc<str>>, getter: impl PeerGetter + 'static) -> Self {
        Self {
            address: address.into(),
            getter: DynPeerGetter::new_arc(getter),
        }
    }

    /// Address of the peer, as known to the picker.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }
}

impl Debug for Peer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Peer").field("address", &self.address).finish_non_exhaustive()
    }
}

impl PeerGetter for Peer {
    async fn get(&self, group: &str, key: &str) -> Result<Bytes> {
        self.getter.get(group, key).await
    }
}
