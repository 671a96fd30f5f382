// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! HTTP transport between cache nodes.
//!
//! Each node runs an [`HttpPool`]. The pool serves the node's groups to its peers under
//! `GET {base_path}{group}/{key}`, answering with a protobuf [`proto::Response`]. It is also
//! the node's [`PeerPicker`](crate::PeerPicker): the key's owner on the consistent hash ring is
//! reached through an [`HttpGetter`].
//!
//! ```no_run
//! use peercache::{Registry, getter_fn, http::HttpPool};
//!
//! # async fn run() -> std::io::Result<()> {
//! let registry = Registry::global();
//! let scores = registry.new_group(
//!     "scores",
//!     2 << 10,
//!     getter_fn(|key: String| async move { Ok::<_, String>(key.into_bytes()) }),
//! );
//!
//! let pool = HttpPool::new("http://localhost:8001", registry);
//! pool.set_peers(["http://localhost:8001", "http://localhost:8002", "http://localhost:8003"]);
//! scores.register_peers(pool.clone());
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8001").await?;
//! pool.serve(listener).await
//! # }
//! ```

mod client;
mod pool;
pub mod proto;

pub use client::HttpGetter;
pub use pool::{HttpPool, HttpPoolOptions};
