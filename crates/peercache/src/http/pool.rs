// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::{collections::HashMap, fmt::Debug, sync::Arc, time::Duration};

use axum::{
    Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use parking_lot::Mutex;
use peercache_ring::{HashFn, HashRing};
use prost::Message;

use crate::{Peer, PeerPicker, Registry, http::HttpGetter, http::proto};

const DEFAULT_BASE_PATH: &str = "/_peercache/";
const DEFAULT_REPLICAS: usize = 50;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings of an [`HttpPool`].
#[derive(Debug, Clone)]
pub struct HttpPoolOptions {
    /// Path prefix under which groups are served. Normalized to start and end with `/`.
    pub base_path: String,
    /// Points per peer on the hash ring.
    pub replicas: usize,
    /// Hash placing keys and peers on the ring. Must be the same on every node.
    pub hasher: HashFn,
    /// Timeout of a single request to a peer.
    pub timeout: Duration,
}

impl Default for HttpPoolOptions {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_BASE_PATH.to_owned(),
            replicas: DEFAULT_REPLICAS,
            hasher: peercache_ring::crc32,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// One node's view of the cluster.
///
/// The pool picks the owner of a key on a consistent hash ring over the peer addresses and
/// serves this node's groups to the other peers. Clones share the same state.
#[derive(Clone)]
pub struct HttpPool {
    inner: Arc<PoolInner>,
}

struct PoolInner {
    self_addr: String,
    options: HttpPoolOptions,
    registry: Arc<Registry>,
    client: reqwest::Client,
    peers: Mutex<PeerSet>,
}

struct PeerSet {
    ring: HashRing,
    getters: HashMap<String, Peer>,
}

impl HttpPool {
    /// Creates a pool for the node reachable at `self_addr` (for example
    /// `http://10.0.0.1:8001`) serving the groups of `registry`, with default options.
    #[must_use]
    pub fn new(self_addr: impl Into<String>, registry: Arc<Registry>) -> Self {
        Self::with_options(self_addr, registry, HttpPoolOptions::default())
    }

    /// Creates a pool with custom options.
    #[must_use]
    pub fn with_options(self_addr: impl Into<String>, registry: Arc<Registry>, mut options: HttpPoolOptions) -> Self {
        options.base_path = normalize_base_path(&options.base_path);
        let ring = HashRing::with_hasher(options.replicas, options.hasher);

        Self {
            inner: Arc::new(PoolInner {
                self_addr: self_addr.into(),
                options,
                registry,
                client: reqwest::Client::new(),
                peers: Mutex::new(PeerSet {
                    ring,
                    getters: HashMap::new(),
                }),
            }),
        }
    }

    /// Address of this node.
    #[must_use]
    pub fn self_addr(&self) -> &str {
        &self.inner.self_addr
    }

    /// Path prefix under which groups are served.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.inner.options.base_path
    }

    /// Replaces the set of peers. The list should include this node's own address so that
    /// every node builds the same ring.
    pub fn set_peers<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let options = &self.inner.options;
        let mut ring = HashRing::with_hasher(options.replicas, options.hasher);
        let mut getters = HashMap::new();

        for peer in peers {
            let peer = peer.as_ref();
            ring.add([peer]);
            let getter = HttpGetter::new(peer, &options.base_path, self.inner.client.clone(), options.timeout);
            getters.insert(peer.to_owned(), Peer::new(peer, getter));
        }

        *self.inner.peers.lock() = PeerSet { ring, getters };
    }

    /// Routes serving this node's groups to its peers.
    pub fn router(&self) -> Router {
        let route = format!("{}{{group}}/{{*key}}", self.inner.options.base_path);
        Router::new().route(&route, get(serve_key)).with_state(self.clone())
    }

    /// Serves [`router`](Self::router) on `listener` until the server fails.
    ///
    /// # Errors
    ///
    /// Returns the I/O error that stopped the server.
    pub async fn serve(&self, listener: tokio::net::TcpListener) -> std::io::Result<()> {
        axum::serve(listener, self.router()).await
    }
}

impl PeerPicker for HttpPool {
    fn pick_peer(&self, key: &str) -> Option<Peer> {
        let peers = self.inner.peers.lock();
        let owner = peers.ring.get(key)?;
        if owner == self.inner.self_addr {
            return None;
        }

        tracing::debug!(node = %self.inner.self_addr, peer = owner, key, "peercache.pick");
        peers.getters.get(owner).cloned()
    }
}

impl Debug for HttpPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let peers = self.inner.peers.lock();
        let mut addresses: Vec<&str> = peers.getters.keys().map(String::as_str).collect();
        addresses.sort_unstable();

        f.debug_struct("HttpPool")
            .field("self_addr", &self.inner.self_addr)
            .field("base_path", &self.inner.options.base_path)
            .field("peers", &addresses)
            .finish_non_exhaustive()
    }
}

async fn serve_key(State(pool): State<HttpPool>, Path((group_name, key)): Path<(String, String)>) -> Response {
    tracing::info!(node = %pool.inner.self_addr, group = %group_name, key = %key, "peercache.serve");

    let Some(group) = pool.inner.registry.group(&group_name) else {
        return (StatusCode::NOT_FOUND, format!("no such group: {group_name}")).into_response();
    };

    match group.get(&key).await {
        Ok(view) => {
            let body = proto::Response {
                value: view.into_bytes(),
            }
            .encode_to_vec();
            ([(header::CONTENT_TYPE, "application/octet-stream")], body).into_response()
        }
        Err(error) => (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()).into_response(),
    }
}

fn normalize_base_path(base_path: &str) -> String {
    let trimmed = base_path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_owned()
    } else {
        format!("/{trimmed}/")
    }
}
