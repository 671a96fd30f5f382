// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use opentelemetry::metrics::{Counter, Meter};

const GROUP_EVENT_COUNT_NAME: &str = "peercache.event.count";

pub(crate) fn create_event_counter(meter: &Meter) -> Counter<u64> {
    meter
        .u64_counter(GROUP_EVENT_COUNT_NAME)
        .with_description("Group lookup events")
        .with_unit("{event}")
        .build()
}
