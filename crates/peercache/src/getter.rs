// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The authoritative source behind a group.

use std::{fmt::Debug, future::Future, sync::Arc};

use bytes::Bytes;

use crate::{Error, Result};

/// Loads the value for a key from the source of truth.
///
/// A group calls its getter only on a local miss that no peer could serve, and at most once per
/// key at a time however many callers are waiting. Errors are handed to every waiting caller
/// and are not cached.
///
/// Closures become getters through [`getter_fn`]. Implement the trait directly when the source
/// carries state of its own:
///
/// ```
/// use std::collections::HashMap;
///
/// use bytes::Bytes;
/// use peercache::{Error, Getter, Result};
///
/// struct Table(HashMap<String, Bytes>);
///
/// impl Getter for Table {
///     async fn get(&self, key: &str) -> Result<Bytes> {
///         self.0
///             .get(key)
///             .cloned()
///             .ok_or_else(|| Error::from_source(format!("{key} not exist")))
///     }
/// }
/// ```
#[dynosaur::dynosaur(pub(crate) DynGetter = dyn(box) Getter, bridge(none))]
pub trait Getter: Send + Sync {
    /// Loads the value stored under `key`.
    fn get(&self, key: &str) -> impl Future<Output = Result<Bytes>> + Send;
}

/// A type-erased, clonable getter.
#[derive(Clone)]
pub(crate) struct SharedGetter(Arc<DynGetter<'static>>);

impl SharedGetter {
    pub(crate) fn new(getter: impl Getter + 'static) -> Self {
        Self(DynGetter::new_arc(getter))
    }

    pub(crate) async fn get(&self, key: &str) -> Result<Bytes> {
        self.0.get(key).await
    }
}

impl Debug for SharedGetter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedGetter").finish_non_exhaustive()
    }
}

/// A [`Getter`] backed by an async closure. Created by [`getter_fn`].
#[derive(Clone)]
pub struct GetterFn<F>(F);

impl<F> Debug for GetterFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GetterFn").finish_non_exhaustive()
    }
}

/// Turns an async closure into a [`Getter`].
///
/// The closure receives the key and returns anything convertible into [`Bytes`]. Its error is
/// surfaced to callers unchanged through [`Error::Source`].
///
/// ```
/// use peercache::{Getter, getter_fn};
/// # futures::executor::block_on(async {
///
/// let getter = getter_fn(|key: String| async move {
///     if key == "Tom" { Ok(b"630".to_vec()) } else { Err("not found") }
/// });
///
/// assert_eq!(getter.get("Tom").await.unwrap(), &b"630"[..]);
/// assert_eq!(getter.get("Sam").await.unwrap_err().to_string(), "not found");
/// # });
/// ```
pub fn getter_fn<F, Fut, T, E>(f: F) -> GetterFn<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = std::result::Result<T, E>> + Send,
    T: Into<Bytes>,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    GetterFn(f)
}

impl<F, Fut, T, E> Getter for GetterFn<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = std::result::Result<T, E>> + Send,
    T: Into<Bytes>,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    async fn get(&self, key: &str) -> Result<Bytes> {
        (self.0)(key.to_owned()).await.map(Into::into).map_err(Error::from_source)
    }
}
