// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#[cfg(any(feature = "metrics", test))]
pub(crate) const GROUP_NAME: &str = "group.name";

#[cfg(any(feature = "metrics", test))]
pub(crate) const GROUP_ACTIVITY: &str = "group.activity";

#[cfg(test)]
pub(crate) const KEY: &str = "key";

#[cfg(test)]
pub(crate) const PEER: &str = "peer";

#[cfg(test)]
pub(crate) const ERROR: &str = "error";
