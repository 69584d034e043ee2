// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Private DNS adapter (`Microsoft.Network/privateDnsZones`).
//!
//! Private zones are only resolvable from virtual networks linked to them. The link is a
//! `virtualNetworkLinks/{vnet}` child of the zone, written after the zone itself and removed
//! before the zone is deleted (ARM refuses to delete a zone that still has links).

use super::backend::{listed_fqdn, DnsBackend};
use super::{ResourceRecordSet, RrsType, ZoneInfo, ZoneKind};
use crate::arm::ids::name_from_id;
use crate::arm::types::{
    ARecord, PrivateRecordSet, PrivateRecordSetProperties, PrivateZone, SubResource,
    VirtualNetworkLink, VirtualNetworkLinkProperties,
};
use crate::arm::ArmClient;
use crate::constants::{DNS_ZONE_LOCATION, PRIVATE_DNS_API_VERSION};
use crate::errors::BackendError;
use async_trait::async_trait;
use tracing::{debug, info};

const PRIVATE_DNS_ZONES: &str = "privateDnsZones";
const VIRTUAL_NETWORK_LINKS: &str = "virtualNetworkLinks";
/// Collection segment listing record sets of every type
const ALL_RECORD_SETS: &str = "ALL";

/// [`DnsBackend`] for private zones.
#[derive(Debug, Clone)]
pub struct PrivateDnsBackend {
    arm: ArmClient,
}

impl PrivateDnsBackend {
    #[must_use]
    pub fn new(arm: ArmClient) -> Self {
        Self { arm }
    }

    /// Link `zone` to the virtual network `virtual_network_id` with auto-registration on.
    async fn link_virtual_network(
        &self,
        resource_group: &str,
        zone: &ZoneInfo,
        virtual_network_id: &str,
    ) -> Result<(), BackendError> {
        let link_name = name_from_id(virtual_network_id).unwrap_or(virtual_network_id);
        let url = self.arm.resource_url(
            resource_group,
            &[PRIVATE_DNS_ZONES, zone.name.as_str(), VIRTUAL_NETWORK_LINKS, link_name],
            PRIVATE_DNS_API_VERSION,
        )?;
        let body = VirtualNetworkLink {
            location: Some(DNS_ZONE_LOCATION.to_string()),
            tags: zone.tags.clone(),
            properties: Some(VirtualNetworkLinkProperties {
                virtual_network: Some(SubResource::new(virtual_network_id)),
                registration_enabled: Some(true),
            }),
            ..Default::default()
        };

        info!(
            zone = %zone.name,
            virtual_network = %virtual_network_id,
            "Linking private DNS zone to virtual network"
        );
        let resource = format!("{}/{link_name}", zone.name);
        let _: VirtualNetworkLink = self
            .arm
            .put_json("CreateOrUpdateVirtualNetworkLink", &resource, url, &body)
            .await?;
        Ok(())
    }

    async fn unlink_all(&self, resource_group: &str, zone: &str) -> Result<(), BackendError> {
        let url = self.arm.resource_url(
            resource_group,
            &[PRIVATE_DNS_ZONES, zone, VIRTUAL_NETWORK_LINKS],
            PRIVATE_DNS_API_VERSION,
        )?;
        let links: Vec<VirtualNetworkLink> = self
            .arm
            .list_all("ListVirtualNetworkLinks", zone, url)
            .await?;

        for link in links {
            let Some(name) = link.name else { continue };
            let url = self.arm.resource_url(
                resource_group,
                &[PRIVATE_DNS_ZONES, zone, VIRTUAL_NETWORK_LINKS, name.as_str()],
                PRIVATE_DNS_API_VERSION,
            )?;
            let resource = format!("{zone}/{name}");
            match self
                .arm
                .delete("DeleteVirtualNetworkLink", &resource, url)
                .await
            {
                Err(e) if e.is_not_found() => {
                    debug!(link = %resource, "Virtual network link already gone");
                }
                other => other?,
            }
        }
        Ok(())
    }
}

fn record_set_body(rrset: &ResourceRecordSet) -> PrivateRecordSet {
    PrivateRecordSet {
        properties: Some(PrivateRecordSetProperties {
            ttl: Some(rrset.ttl),
            a_records: rrset
                .rrdatas
                .iter()
                .map(|ip| ARecord {
                    ipv4_address: Some(ip.clone()),
                })
                .collect(),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn from_wire(zone: &str, record: PrivateRecordSet) -> ResourceRecordSet {
    let properties = record.properties.unwrap_or_default();
    ResourceRecordSet {
        name: listed_fqdn(properties.fqdn.as_deref(), record.name.as_deref(), zone),
        rrs_type: record
            .record_type
            .as_deref()
            .map(RrsType::from)
            .unwrap_or(RrsType::A),
        ttl: properties.ttl.unwrap_or_default(),
        rrdatas: properties
            .a_records
            .into_iter()
            .filter_map(|a| a.ipv4_address)
            .collect(),
    }
}

fn zone_from_wire(zone: PrivateZone) -> ZoneInfo {
    ZoneInfo {
        name: zone.name.unwrap_or_default(),
        id: zone.id,
        kind: ZoneKind::Private,
        tags: zone.tags,
        virtual_network: None,
    }
}

#[async_trait]
impl DnsBackend for PrivateDnsBackend {
    fn kind(&self) -> ZoneKind {
        ZoneKind::Private
    }

    async fn create_or_update(
        &self,
        resource_group: &str,
        zone: &str,
        relative_name: &str,
        rrs_type: &RrsType,
        rrset: &ResourceRecordSet,
    ) -> Result<(), BackendError> {
        let url = self.arm.resource_url(
            resource_group,
            &[PRIVATE_DNS_ZONES, zone, rrs_type.as_str(), relative_name],
            PRIVATE_DNS_API_VERSION,
        )?;
        let _: PrivateRecordSet = self
            .arm
            .put_json(
                "CreateOrUpdatePrivateRecordSet",
                &rrset.name,
                url,
                &record_set_body(rrset),
            )
            .await?;
        Ok(())
    }

    async fn list(
        &self,
        resource_group: &str,
        zone: &str,
    ) -> Result<Vec<ResourceRecordSet>, BackendError> {
        let url = self.arm.resource_url(
            resource_group,
            &[PRIVATE_DNS_ZONES, zone, ALL_RECORD_SETS],
            PRIVATE_DNS_API_VERSION,
        )?;
        let records: Vec<PrivateRecordSet> = self
            .arm
            .list_all("ListPrivateRecordSets", zone, url)
            .await?;
        debug!(zone = %zone, count = records.len(), "Listed private record sets");
        Ok(records.into_iter().map(|r| from_wire(zone, r)).collect())
    }

    async fn delete(
        &self,
        resource_group: &str,
        zone: &str,
        relative_name: &str,
        rrs_type: &RrsType,
    ) -> Result<(), BackendError> {
        let url = self.arm.resource_url(
            resource_group,
            &[PRIVATE_DNS_ZONES, zone, rrs_type.as_str(), relative_name],
            PRIVATE_DNS_API_VERSION,
        )?;
        let resource = format!("{zone}/{rrs_type}/{relative_name}");
        self.arm
            .delete("DeletePrivateRecordSet", &resource, url)
            .await
    }

    async fn list_zones(&self, resource_group: &str) -> Result<Vec<ZoneInfo>, BackendError> {
        let url = self.arm.resource_url(
            resource_group,
            &[PRIVATE_DNS_ZONES],
            PRIVATE_DNS_API_VERSION,
        )?;
        let zones: Vec<PrivateZone> = self
            .arm
            .list_all("ListPrivateDnsZones", resource_group, url)
            .await?;
        Ok(zones.into_iter().map(zone_from_wire).collect())
    }

    async fn create_or_update_zone(
        &self,
        resource_group: &str,
        zone: &ZoneInfo,
    ) -> Result<ZoneInfo, BackendError> {
        let url = self.arm.resource_url(
            resource_group,
            &[PRIVATE_DNS_ZONES, zone.name.as_str()],
            PRIVATE_DNS_API_VERSION,
        )?;
        let body = PrivateZone {
            location: Some(DNS_ZONE_LOCATION.to_string()),
            tags: zone.tags.clone(),
            ..Default::default()
        };
        let created: PrivateZone = self
            .arm
            .put_json("CreateOrUpdatePrivateDnsZone", &zone.name, url, &body)
            .await?;

        if let Some(virtual_network) = zone.virtual_network.as_deref() {
            self.link_virtual_network(resource_group, zone, virtual_network)
                .await?;
        }

        let mut info = zone_from_wire(created);
        if info.name.is_empty() {
            info.name.clone_from(&zone.name);
        }
        info.virtual_network.clone_from(&zone.virtual_network);
        Ok(info)
    }

    async fn delete_zone(&self, resource_group: &str, zone: &str) -> Result<(), BackendError> {
        self.unlink_all(resource_group, zone).await?;
        let url = self.arm.resource_url(
            resource_group,
            &[PRIVATE_DNS_ZONES, zone],
            PRIVATE_DNS_API_VERSION,
        )?;
        self.arm.delete("DeletePrivateDnsZone", zone, url).await
    }
}

#[cfg(test)]
#[path = "private_tests.rs"]
mod private_tests;
