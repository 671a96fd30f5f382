// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::{
    collections::HashMap,
    sync::{Arc, LazyLock},
};

use parking_lot::RwLock;

use crate::{Getter, Group, getter::SharedGetter, telemetry::GroupTelemetry};

static GLOBAL: LazyLock<Arc<Registry>> = LazyLock::new(|| Arc::new(Registry::new()));

/// Groups by name.
///
/// Peers address a group by name, so a node serving lookups from other nodes resolves the
/// requested group through a registry. Groups are added or replaced, never removed.
///
/// Most programs use one registry. [`Registry::global`] returns a process-wide instance; tests
/// and embedders that need isolation create their own with [`Registry::new`].
#[derive(Debug, Default)]
pub struct Registry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    #[must_use]
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    /// Creates a group with logging enabled and registers it under `name`, replacing any group
    /// previously registered under that name.
    pub fn new_group(&self, name: impl Into<String>, cache_bytes: u64, getter: impl Getter + 'static) -> Arc<Group> {
        let group = Group::new(name.into(), cache_bytes, SharedGetter::new(getter), GroupTelemetry::new(true));
        self.insert(group)
    }

    /// Registers a group built with [`Group::builder`], replacing any group with the same name.
    pub fn insert(&self, group: Group) -> Arc<Group> {
        let group = Arc::new(group);
        self.groups.write().insert(group.name().to_owned(), Arc::clone(&group));
        group
    }

    /// Returns the group registered under `name`.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.read().get(name).map(Arc::clone)
    }

    /// Names of all registered groups, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }
}
