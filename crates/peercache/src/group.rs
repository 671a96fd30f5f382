// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! A named cache namespace and its lookup path.

use std::{
    fmt::Debug,
    sync::{Arc, OnceLock},
};

use peercache_flight::Flight;

use crate::{
    ByteView, CacheStats, Error, GroupBuilder, PeerGetter, PeerPicker, Result,
    cache::LocalCache,
    getter::SharedGetter,
    telemetry::{Detail, GroupActivity, GroupTelemetry},
};

/// A named cache namespace.
///
/// A lookup goes through these steps:
///
/// 1. The local cache is consulted; a hit returns immediately.
/// 2. On a miss the key joins the in-flight load for that key, or starts one. All callers
///    waiting on one load get the same result.
/// 3. If a [`PeerPicker`] is registered and names a remote owner, the value is fetched from that
///    peer. It is returned without being cached locally, since the owner already caches it.
///    If the peer fails, the failure is logged and the lookup continues locally.
/// 4. Otherwise the [`Getter`](crate::Getter) loads the value, which is stored in the local cache and
///    returned. Getter errors go back to the caller and nothing is cached.
///
/// Groups are normally created through a [`Registry`](crate::Registry) so that peers can find
/// them by name.
pub struct Group {
    name: String,
    getter: SharedGetter,
    cache: LocalCache,
    peers: OnceLock<Arc<dyn PeerPicker>>,
    flight: Flight<String, Result<ByteView>>,
    telemetry: GroupTelemetry,
}

impl Group {
    /// Starts configuring a group named `name`.
    ///
    /// # Examples
    ///
    /// ```
    /// use peercache::{Group, getter_fn};
    ///
    /// let group = Group::builder("scores")
    ///     .cache_bytes(64 << 20)
    ///     .getter(getter_fn(|key: String| async move { Ok::<_, String>(key.into_bytes()) }))
    ///     .build();
    ///
    /// assert_eq!(group.name(), "scores");
    /// ```
    #[must_use]
    pub fn builder(name: impl Into<String>) -> GroupBuilder {
        GroupBuilder::new(name.into())
    }

    pub(crate) fn new(name: String, cache_bytes: u64, getter: SharedGetter, telemetry: GroupTelemetry) -> Self {
        Self {
            name,
            getter,
            cache: LocalCache::new(cache_bytes),
            peers: OnceLock::new(),
            flight: Flight::new(),
            telemetry,
        }
    }

    /// Name of the group.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Byte budget of the local cache. `0` means unbounded.
    #[must_use]
    pub fn cache_bytes(&self) -> u64 {
        self.cache.max_bytes()
    }

    /// Attaches the picker that decides which keys are served by remote peers.
    ///
    /// # Panics
    ///
    /// Panics if a picker was already registered for this group.
    pub fn register_peers(&self, picker: impl PeerPicker + 'static) {
        let registered = self.peers.set(Arc::new(picker)).is_ok();
        assert!(registered, "peers already registered for group {}", self.name);
    }

    /// Returns the value for `key`, loading it on a miss.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyKey`] if `key` is empty, or the getter's error if the value had to
    /// be loaded locally and the getter failed.
    pub async fn get(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Err(Error::EmptyKey);
        }

        if let Some(value) = self.cache.get(key) {
            self.telemetry.record(&self.name, key, GroupActivity::Hit);
            return Ok(value);
        }

        self.telemetry.record(&self.name, key, GroupActivity::Miss);
        self.load(key).await
    }

    /// Returns the locally cached value for `key` without loading it or changing its recency.
    #[must_use]
    pub fn cached(&self, key: &str) -> Option<ByteView> {
        self.cache.peek(key)
    }

    /// Size of the local cache.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    async fn load(&self, key: &str) -> Result<ByteView> {
        self.flight
            .work(key.to_owned(), || async {
                if let Some(peer) = self.peers.get().and_then(|picker| picker.pick_peer(key)) {
                    match peer.get(&self.name, key).await {
                        Ok(bytes) => {
                            self.telemetry.record(&self.name, key, GroupActivity::PeerHit);
                            return Ok(ByteView::from(bytes));
                        }
                        Err(error) => {
                            let detail = Detail {
                                peer: Some(peer.address()),
                                error: Some(&error),
                            };
                            self.telemetry.record_detail(&self.name, key, GroupActivity::PeerError, detail);
                        }
                    }
                }

                self.get_locally(key).await
            })
            .await
    }

    async fn get_locally(&self, key: &str) -> Result<ByteView> {
        match self.getter.get(key).await {
            Ok(bytes) => {
                let value = ByteView::from(bytes);
                self.cache.add(key, value.clone());
                self.telemetry.record(&self.name, key, GroupActivity::Loaded);
                Ok(value)
            }
            Err(error) => {
                let detail = Detail {
                    peer: None,
                    error: Some(&error),
                };
                self.telemetry.record_detail(&self.name, key, GroupActivity::SourceError, detail);
                Err(error)
            }
        }
    }
}

impl Debug for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("cache_bytes", &self.cache.max_bytes())
            .field("peers_registered", &self.peers.get().is_some())
            .field("flight", &self.flight)
            .finish_non_exhaustive()
    }
}
