// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! DNS zone reconciler.
//!
//! A zone is public unless `private` is set. A private zone may be linked to a virtual network
//! of the same resource group; the link is (re)ensured on every render. The kind of an
//! existing zone cannot change.

use super::{
    changed, changed_name, changed_tags, push_if_some, require_name, CloudTask, FieldChanges,
};
use crate::arm::ids::{name_from_id, VirtualNetworkId};
use crate::cloud::AzureCloud;
use crate::dns::{names_equal, ZoneKind};
use crate::errors::{ApplyError, DiscoveryError};
use crate::tags::{merge_tags, Tags};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Desired or discovered DNS zone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsZone {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Defaults to the configured resource group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    /// Virtual network a private zone is linked to, by name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtual_network_name: Option<String>,
    #[serde(default, skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
    /// Provider-assigned ID, set on discovered zones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl DnsZone {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn private_in(mut self, virtual_network_name: impl Into<String>) -> Self {
        self.private = Some(true);
        self.virtual_network_name = Some(virtual_network_name.into());
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DnsZoneChanges {
    pub name: Option<String>,
    pub private: Option<bool>,
    pub tags: Option<Tags>,
}

impl FieldChanges for DnsZoneChanges {
    fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        push_if_some(&mut fields, "Name", &self.name);
        push_if_some(&mut fields, "Private", &self.private);
        push_if_some(&mut fields, "Tags", &self.tags);
        fields
    }
}

#[async_trait]
impl CloudTask for DnsZone {
    type Changes = DnsZoneChanges;

    const KIND: &'static str = "DNSZone";
    const IMMUTABLE_FIELDS: &'static [&'static str] = &["Name", "Private"];

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn tags_mut(&mut self) -> Option<&mut Tags> {
        Some(&mut self.tags)
    }

    async fn find(&self, cloud: &dyn AzureCloud) -> Result<Option<Self>, DiscoveryError> {
        let Some(name) = self.name.as_deref() else {
            return Ok(None);
        };
        let zones = cloud.zones(self.resource_group.as_deref());

        let listed = zones.list().await.map_err(|source| DiscoveryError {
            kind: Self::KIND,
            name: name.to_string(),
            source,
        })?;

        // Prefer a zone of the desired kind when both kinds share the name
        let mut matching: Vec<_> = listed
            .into_iter()
            .filter(|zone| names_equal(zone.name(), name))
            .collect();
        if let Some(private) = self.private {
            matching.sort_by_key(|zone| zone.kind().is_private() != private);
        }
        let Some(zone) = matching.into_iter().next() else {
            debug!(zone = %name, "DNS zone not found");
            return Ok(None);
        };

        let info = zone.info();
        Ok(Some(Self {
            name: Some(info.name.clone()),
            resource_group: Some(zones.resource_group().to_string()),
            private: Some(info.kind.is_private()),
            virtual_network_name: info
                .virtual_network
                .as_deref()
                .and_then(name_from_id)
                .map(str::to_string),
            tags: info.tags.clone(),
            id: info.id.clone(),
        }))
    }

    fn diff(actual: &Self, desired: &Self) -> DnsZoneChanges {
        DnsZoneChanges {
            name: changed_name(actual.name.as_deref(), desired.name.as_deref()),
            private: changed(&actual.private, &desired.private),
            tags: changed_tags(&actual.tags, &desired.tags),
        }
    }

    async fn render(
        cloud: &dyn AzureCloud,
        actual: Option<&Self>,
        desired: &Self,
        _changes: &DnsZoneChanges,
    ) -> Result<(), ApplyError> {
        let name = require_name(Self::KIND, desired.name.as_deref())?;
        let private = desired
            .private
            .or_else(|| actual.and_then(|a| a.private))
            .unwrap_or(false);
        let kind = ZoneKind::from_private(private);

        let zones = cloud.zones(desired.resource_group.as_deref());
        let mut zone = zones.new_zone(name, kind);
        zone.set_tags(merge_tags(actual.map(|a| &a.tags), &desired.tags));

        if kind.is_private() {
            let virtual_network = desired.virtual_network_name.as_ref().map(|vnet| {
                VirtualNetworkId {
                    subscription_id: cloud.subscription_id().to_string(),
                    resource_group_name: zones.resource_group().to_string(),
                    virtual_network_name: vnet.clone(),
                }
                .to_string()
            });
            zone.set_virtual_network(virtual_network);
        }

        zones
            .add(&zone)
            .await
            .map_err(|source| ApplyError::Backend {
                kind: Self::KIND,
                name: name.to_string(),
                source,
            })?;
        Ok(())
    }
}
