// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Structured logs and metrics for group lookups.
//!
//! Every step of a lookup is recorded as a [`GroupActivity`]. Activities are emitted as `tracing`
//! events when logging is enabled, and counted on an OpenTelemetry counter when a meter was
//! supplied (`metrics` feature).

#[cfg(any(feature = "metrics", test))]
use opentelemetry::{
    KeyValue,
    metrics::{Counter, Meter},
};

use crate::Error;

pub(crate) mod attributes;
#[cfg(any(feature = "metrics", test))]
pub(crate) mod metrics;
#[cfg(test)]
pub(crate) mod testing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GroupActivity {
    Hit,
    Miss,
    PeerHit,
    PeerError,
    Loaded,
    SourceError,
}

impl GroupActivity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "peercache.hit",
            Self::Miss => "peercache.miss",
            Self::PeerHit => "peercache.peer_hit",
            Self::PeerError => "peercache.peer_error",
            Self::Loaded => "peercache.loaded",
            Self::SourceError => "peercache.source_error",
        }
    }

    fn severity(self) -> Severity {
        match self {
            Self::Hit | Self::Miss | Self::PeerHit | Self::Loaded => Severity::Debug,
            Self::PeerError => Severity::Warn,
            Self::SourceError => Severity::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    Debug,
    Warn,
    Error,
}

/// Optional fields attached to an event.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Detail<'a> {
    pub peer: Option<&'a str>,
    pub error: Option<&'a Error>,
}

#[derive(Clone, Debug)]
pub(crate) struct GroupTelemetry {
    logging_enabled: bool,
    #[cfg(any(feature = "metrics", test))]
    event_counter: Option<Counter<u64>>,
}

impl GroupTelemetry {
    pub(crate) fn new(logging_enabled: bool) -> Self {
        Self {
            logging_enabled,
            #[cfg(any(feature = "metrics", test))]
            event_counter: None,
        }
    }

    #[cfg(any(feature = "metrics", test))]
    #[must_use]
    pub(crate) fn with_meter(self, meter: &Meter) -> Self {
        Self {
            event_counter: Some(metrics::create_event_counter(meter)),
            ..self
        }
    }

    #[inline]
    pub(crate) fn record(&self, group: &str, key: &str, activity: GroupActivity) {
        self.record_detail(group, key, activity, Detail::default());
    }

    pub(crate) fn record_detail(&self, group: &str, key: &str, activity: GroupActivity, detail: Detail<'_>) {
        #[cfg(any(feature = "metrics", test))]
        if let Some(counter) = &self.event_counter {
            counter.add(
                1,
                &[
                    KeyValue::new(attributes::GROUP_NAME, group.to_owned()),
                    KeyValue::new(attributes::GROUP_ACTIVITY, activity.as_str()),
                ],
            );
        }

        if self.logging_enabled {
            Self::emit(group, key, activity, detail);
        }
    }

    fn emit(group: &str, key: &str, activity: GroupActivity, detail: Detail<'_>) {
        let name = activity.as_str();
        let peer = detail.peer;
        let error = detail.error.map(tracing::field::display);

        // Field names must match the constants in attributes.rs.
        macro_rules! emit_event {
            ($level:ident) => {
                tracing::$level!(group.name = group, group.activity = name, key, peer, error, "{name}")
            };
        }

        match activity.severity() {
            Severity::Error => emit_event!(error),
            Severity::Warn => emit_event!(warn),
            Severity::Debug => emit_event!(debug),
        }
    }
}
