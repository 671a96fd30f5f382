// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Wire messages exchanged between peers.
//!
//! Equivalent protobuf definition:
//!
//! ```proto
//! message Response {
//!     bytes value = 1;
//! }
//! ```

use bytes::Bytes;

/// Body of a successful peer response.
#[derive(Clone, PartialEq, Eq, prost::Message)]
pub struct Response {
    /// The cached value.
    #[prost(bytes = "bytes", tag = "1")]
    pub value: Bytes,
}
