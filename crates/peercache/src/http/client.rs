// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::Duration;

use bytes::Bytes;
use prost::Message;
use reqwest::{StatusCode, Url};

use crate::{Error, PeerGetter, Result, http::proto};

/// Fetches values from one remote [`HttpPool`](super::HttpPool).
#[derive(Debug, Clone)]
pub struct HttpGetter {
    peer: String,
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpGetter {
    /// Creates a getter for the peer at `peer` (for example `http://10.0.0.2:8001`) serving
    /// groups under `base_path`.
    pub fn new(peer: impl Into<String>, base_path: &str, client: reqwest::Client, timeout: Duration) -> Self {
        let peer = peer.into();
        let base_url = format!("{}{base_path}", peer.trim_end_matches('/'));
        Self {
            peer,
            base_url,
            client,
            timeout,
        }
    }

    /// Address of the peer.
    #[must_use]
    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// URL of `key` in `group`. Both are percent-encoded as single path segments.
    fn url(&self, group: &str, key: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| self.failure(format!("invalid peer url: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| self.failure("peer url cannot be a base"))?
            .pop_if_empty()
            .push(group)
            .push(key);
        Ok(url)
    }

    fn failure(&self, message: impl Into<String>) -> Error {
        Error::peer(self.peer.as_str(), message)
    }
}

impl PeerGetter for HttpGetter {
    async fn get(&self, group: &str, key: &str) -> Result<Bytes> {
        let url = self.url(group, key)?;
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.failure(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(self.failure(format!("server returned {status}: {}", body.trim())));
        }

        let body = response.bytes().await.map_err(|e| self.failure(e.to_string()))?;
        let message = proto::Response::decode(body).map_err(|e| self.failure(format!("decoding response body: {e}")))?;
        Ok(message.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn getter(peer: &str, base_path: &str) -> HttpGetter {
        HttpGetter::new(peer, base_path, reqwest::Client::new(), Duration::from_secs(1))
    }

    #[test]
    fn url_encodes_group_and_key_as_segments() {
        let getter = getter("http://10.0.0.2:8001", "/_peercache/");
        let url = getter.url("scores", "a b/c?").unwrap();
        assert_eq!(url.as_str(), "http://10.0.0.2:8001/_peercache/scores/a%20b%2Fc%3F");
    }

    #[test]
    fn trailing_slash_on_peer_is_ignored() {
        let getter = getter("http://10.0.0.2:8001/", "/_peercache/");
        let url = getter.url("g", "k").unwrap();
        assert_eq!(url.as_str(), "http://10.0.0.2:8001/_peercache/g/k");
        assert_eq!(getter.peer(), "http://10.0.0.2:8001/");
    }

    #[test]
    fn unparsable_peer_is_a_peer_error() {
        let getter = getter("not a url", "/_peercache/");
        let error = getter.url("g", "k").unwrap_err();
        assert!(matches!(error, Error::Peer { ref peer, .. } if peer == "not a url"));
    }
}
