// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::Arc;

use bytes::Bytes;

/// Values that report how many bytes they occupy in an [`LruCache`](crate::LruCache).
///
/// The reported size is what the cache charges against its budget, so it should be stable for
/// as long as the value is cached.
pub trait ByteSize {
    /// Number of bytes charged for this value.
    fn byte_len(&self) -> usize;
}

impl ByteSize for Vec<u8> {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

impl ByteSize for Box<[u8]> {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

impl ByteSize for Arc<[u8]> {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

impl ByteSize for String {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

impl ByteSize for &str {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

impl ByteSize for Bytes {
    fn byte_len(&self) -> usize {
        self.len()
    }
}
