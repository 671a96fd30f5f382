// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builder for configuring groups.

use std::fmt::Debug;

#[cfg(any(feature = "metrics", test))]
use opentelemetry::metrics::Meter;

use crate::{Getter, Group, getter::SharedGetter, telemetry::GroupTelemetry};

/// Builder for a [`Group`]. Created by [`Group::builder`].
///
/// Defaults: an unbounded local cache (`cache_bytes(0)`), logging enabled, no metrics.
/// A getter is required.
///
/// # Examples
///
/// ```
/// use peercache::{Group, Registry, getter_fn};
///
/// let registry = Registry::new();
/// let group = registry.insert(
///     Group::builder("users")
///         .cache_bytes(1 << 20)
///         .logging(false)
///         .getter(getter_fn(|key: String| async move { Ok::<_, String>(key.into_bytes()) }))
///         .build(),
/// );
///
/// assert!(registry.group("users").is_some());
/// assert_eq!(group.cache_bytes(), 1 << 20);
/// ```
pub struct GroupBuilder {
    name: String,
    cache_bytes: u64,
    getter: Option<SharedGetter>,
    logging: bool,
    #[cfg(any(feature = "metrics", test))]
    meter: Option<Meter>,
}

impl GroupBuilder {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            cache_bytes: 0,
            getter: None,
            logging: true,
            #[cfg(any(feature = "metrics", test))]
            meter: None,
        }
    }

    /// Sets the byte budget of the local cache. `0` disables eviction.
    #[must_use]
    pub fn cache_bytes(mut self, cache_bytes: u64) -> Self {
        self.cache_bytes = cache_bytes;
        self
    }

    /// Sets the authoritative source for keys missing from the cluster.
    #[must_use]
    pub fn getter(mut self, getter: impl Getter + 'static) -> Self {
        self.getter = Some(SharedGetter::new(getter));
        self
    }

    /// Enables or disables `tracing` events for lookups.
    #[must_use]
    pub fn logging(mut self, enabled: bool) -> Self {
        self.logging = enabled;
        self
    }

    /// Counts lookup activity on `meter`.
    #[cfg(any(feature = "metrics", test))]
    #[cfg_attr(docsrs, doc(cfg(feature = "metrics")))]
    #[must_use]
    pub fn meter(mut self, meter: &Meter) -> Self {
        self.meter = Some(meter.clone());
        self
    }

    /// Builds the group.
    ///
    /// # Panics
    ///
    /// Panics if no getter was set.
    #[must_use]
    #[expect(clippy::panic, reason = "building a group without a getter is a programming error")]
    pub fn build(self) -> Group {
        let Some(getter) = self.getter else {
            panic!("group {} needs a getter", self.name);
        };

        let telemetry = GroupTelemetry::new(self.logging);
        #[cfg(any(feature = "metrics", test))]
        let telemetry = match &self.meter {
            Some(meter) => telemetry.with_meter(meter),
            None => telemetry,
        };

        Group::new(self.name, self.cache_bytes, getter, telemetry)
    }
}

impl Debug for GroupBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupBuilder")
            .field("name", &self.name)
            .field("cache_bytes", &self.cache_bytes)
            .field("has_getter", &self.getter.is_some())
            .field("logging", &self.logging)
            .finish_non_exhaustive()
    }
}
