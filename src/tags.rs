// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Tag helpers shared by all reconcilers.
//!
//! Resources may be shared with other clusters or edited by hand, so tags are only ever
//! merged: a render sends the union of what the server already has and what we want, and a
//! tag set "matches" when every desired key is present with the desired value.

use crate::constants::TAG_KUBERNETES_CLUSTER;
use std::collections::BTreeMap;

/// Azure resource tags.
pub type Tags = BTreeMap<String, String>;

/// Build the tags every rendered resource carries for a cluster.
///
/// `extra` entries are added after the cluster tag and win on equal keys.
#[must_use]
pub fn cluster_tags(cluster_name: Option<&str>, extra: &Tags) -> Tags {
    let mut tags = Tags::new();
    if let Some(name) = cluster_name.filter(|n| !n.is_empty()) {
        tags.insert(TAG_KUBERNETES_CLUSTER.to_string(), name.to_string());
    }
    tags.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
    tags
}

/// Insert `additions` into `tags`, overwriting equal keys and keeping everything else.
pub fn add_tags(tags: &mut Tags, additions: &Tags) {
    for (key, value) in additions {
        tags.insert(key.clone(), value.clone());
    }
}

/// Tags to send on create-or-update: the server's tags overlaid with the desired ones.
#[must_use]
pub fn merge_tags(existing: Option<&Tags>, desired: &Tags) -> Tags {
    let mut merged = existing.cloned().unwrap_or_default();
    add_tags(&mut merged, desired);
    merged
}

/// True when every desired tag is present in `actual` with the same value.
#[must_use]
pub fn contains_all(actual: &Tags, desired: &Tags) -> bool {
    desired
        .iter()
        .all(|(key, value)| actual.get(key) == Some(value))
}

#[cfg(test)]
#[path = "tags_tests.rs"]
mod tags_tests;
