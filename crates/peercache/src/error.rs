// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for group lookups.

use std::sync::Arc;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// An error from a group lookup.
///
/// Errors are cheap to clone so that a single failed load can be handed to every caller that
/// waited on it.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The requested key was empty.
    #[error("key is required")]
    EmptyKey,

    /// The group's getter failed. Displays exactly as the getter's own error.
    #[error(transparent)]
    Source(Arc<dyn std::error::Error + Send + Sync>),

    /// Fetching from a remote peer failed.
    #[error("peer {peer}: {message}")]
    Peer {
        /// Address of the peer that was asked.
        peer: String,
        /// What went wrong.
        message: String,
    },
}

impl Error {
    /// Wraps an error returned by an authoritative source.
    ///
    /// # Examples
    ///
    /// ```
    /// use peercache::Error;
    ///
    /// let error = Error::from_source("Kate not exist");
    /// assert_eq!(error.to_string(), "Kate not exist");
    /// ```
    pub fn from_source(cause: impl Into<BoxError>) -> Self {
        Self::Source(Arc::from(cause.into()))
    }

    /// Creates a peer failure for the peer at `peer`.
    pub fn peer(peer: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Peer {
            peer: peer.into(),
            message: message.into(),
        }
    }
}

/// A specialized [`Result`] type for group lookups.
pub type Result<T> = std::result::Result<T, Error>;
