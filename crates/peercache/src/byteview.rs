// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::{self, Debug, Display};

use bytes::Bytes;
use peercache_lru::ByteSize;

/// An immutable view of cached bytes.
///
/// Clones share one reference-counted buffer, so handing a cached value to many callers costs
/// no copying. The buffer is never mutated: [`to_vec`](Self::to_vec) returns an owned copy and
/// [`as_slice`](Self::as_slice) a read-only borrow.
///
/// # Examples
///
/// ```
/// use peercache::ByteView;
///
/// let view = ByteView::from(b"630".to_vec());
/// let mut copy = view.to_vec();
/// copy[0] = b'9';
///
/// assert_eq!(view.as_slice(), b"630");
/// assert_eq!(view.len(), 3);
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ByteView {
    bytes: Bytes,
}

impl ByteView {
    /// Creates a view over `bytes`.
    #[must_use]
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self { bytes: bytes.into() }
    }

    /// Length of the value in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the value holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns an owned copy of the bytes. Changing the copy leaves the view untouched.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    /// Borrows the bytes.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the shared buffer backing this view.
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

impl ByteSize for ByteView {
    fn byte_len(&self) -> usize {
        self.bytes.len()
    }
}

impl AsRef<[u8]> for ByteView {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<Bytes> for ByteView {
    fn from(bytes: Bytes) -> Self {
        Self { bytes }
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&'static [u8]> for ByteView {
    fn from(bytes: &'static [u8]) -> Self {
        Self::new(bytes)
    }
}

impl From<String> for ByteView {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&'static str> for ByteView {
    fn from(text: &'static str) -> Self {
        Self::new(text)
    }
}

impl Debug for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteView").field("len", &self.bytes.len()).finish()
    }
}

/// Renders the bytes as UTF-8, replacing invalid sequences.
impl Display for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&String::from_utf8_lossy(&self.bytes), f)
    }
}
