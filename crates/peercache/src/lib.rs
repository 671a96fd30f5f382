// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A distributed in-process cache.
//!
//! Every process keeps a bounded local cache per [`Group`]. On a miss, the key is either fetched
//! from the peer that owns it (chosen by consistent hashing over the cluster) or loaded from the
//! group's authoritative source through its [`Getter`]. Concurrent misses for one key collapse
//! into a single load, so the source sees one request no matter how many callers are waiting.
//!
//! This crate provides:
//! - [`Group`], a named cache namespace implementing the get path
//! - [`ByteView`], the immutable value handed out to callers
//! - [`Getter`], [`PeerPicker`] and [`PeerGetter`], the seams to the source and the cluster
//! - [`Registry`], a name to group map with a process-wide instance
//! - an HTTP transport between peers behind the `http` feature
//!
//! # Example
//!
//! ```
//! use peercache::{Registry, getter_fn};
//! # futures::executor::block_on(async {
//!
//! let registry = Registry::new();
//! let scores = registry.new_group(
//!     "scores",
//!     2 << 10,
//!     getter_fn(|key: String| async move {
//!         match key.as_str() {
//!             "Tom" => Ok(b"630".to_vec()),
//!             _ => Err(format!("{key} not exist")),
//!         }
//!     }),
//! );
//!
//! let value = scores.get("Tom").await?;
//! assert_eq!(value.as_slice(), b"630");
//!
//! let missing = scores.get("Kate").await.unwrap_err();
//! assert_eq!(missing.to_string(), "Kate not exist");
//! # Ok::<(), peercache::Error>(())
//! # });
//! ```
//!
//! # Features
//!
//! - `http`: [`http::HttpPool`] serves groups to peers with `axum` and fetches from peers with
//!   `reqwest`, using a protobuf response body.
//! - `metrics`: counts group activity on an OpenTelemetry [`Meter`](opentelemetry::metrics::Meter).

mod builder;
mod byteview;
mod cache;
mod error;
mod getter;
mod group;
#[cfg(feature = "http")]
#[cfg_attr(docsrs, doc(cfg(feature = "http")))]
pub mod http;
mod peers;
mod registry;
mod telemetry;

#[doc(inline)]
pub use builder::GroupBuilder;
#[doc(inline)]
pub use byteview::ByteView;
#[doc(inline)]
pub use cache::CacheStats;
#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use getter::{Getter, GetterFn, getter_fn};
#[doc(inline)]
pub use group::Group;
#[doc(inline)]
pub use peers::{Peer, PeerGetter, PeerPicker};
#[doc(inline)]
pub use registry::Registry;
