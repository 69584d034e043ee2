// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Public DNS adapter (`Microsoft.Network/dnsZones`).

use super::backend::{listed_fqdn, DnsBackend};
use super::{ResourceRecordSet, RrsType, ZoneInfo, ZoneKind};
use crate::arm::types::{ARecord, DnsRecordSet, DnsRecordSetProperties, DnsZone, DnsZoneProperties};
use crate::arm::ArmClient;
use crate::constants::{DNS_ZONE_LOCATION, PUBLIC_DNS_API_VERSION};
use crate::errors::BackendError;
use async_trait::async_trait;
use tracing::debug;

const DNS_ZONES: &str = "dnsZones";

/// [`DnsBackend`] for public zones.
#[derive(Debug, Clone)]
pub struct PublicDnsBackend {
    arm: ArmClient,
}

impl PublicDnsBackend {
    #[must_use]
    pub fn new(arm: ArmClient) -> Self {
        Self { arm }
    }
}

/// Wire body for an A record set.
fn record_set_body(rrset: &ResourceRecordSet) -> DnsRecordSet {
    DnsRecordSet {
        properties: Some(DnsRecordSetProperties {
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

fn from_wire(zone: &str, record: DnsRecordSet) -> ResourceRecordSet {
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

fn zone_from_wire(zone: DnsZone) -> ZoneInfo {
    ZoneInfo {
        name: zone.name.unwrap_or_default(),
        id: zone.id,
        kind: ZoneKind::Public,
        tags: zone.tags,
        virtual_network: None,
    }
}

#[async_trait]
impl DnsBackend for PublicDnsBackend {
    fn kind(&self) -> ZoneKind {
        ZoneKind::Public
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
            &[DNS_ZONES, zone, rrs_type.as_str(), relative_name],
            PUBLIC_DNS_API_VERSION,
        )?;
        let _: DnsRecordSet = self
            .arm
            .put_json(
                "CreateOrUpdateRecordSet",
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
            &[DNS_ZONES, zone, "recordsets"],
            PUBLIC_DNS_API_VERSION,
        )?;
        let records: Vec<DnsRecordSet> = self.arm.list_all("ListRecordSets", zone, url).await?;
        debug!(zone = %zone, count = records.len(), "Listed public record sets");
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
            &[DNS_ZONES, zone, rrs_type.as_str(), relative_name],
            PUBLIC_DNS_API_VERSION,
        )?;
        let resource = format!("{zone}/{rrs_type}/{relative_name}");
        self.arm.delete("DeleteRecordSet", &resource, url).await
    }

    async fn list_zones(&self, resource_group: &str) -> Result<Vec<ZoneInfo>, BackendError> {
        let url = self
            .arm
            .resource_url(resource_group, &[DNS_ZONES], PUBLIC_DNS_API_VERSION)?;
        let zones: Vec<DnsZone> = self
            .arm
            .list_all("ListDnsZones", resource_group, url)
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
            &[DNS_ZONES, zone.name.as_str()],
            PUBLIC_DNS_API_VERSION,
        )?;
        let body = DnsZone {
            location: Some(DNS_ZONE_LOCATION.to_string()),
            tags: zone.tags.clone(),
            properties: Some(DnsZoneProperties {
                zone_type: Some("Public".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let created: DnsZone = self
            .arm
            .put_json("CreateOrUpdateDnsZone", &zone.name, url, &body)
            .await?;

        let mut info = zone_from_wire(created);
        if info.name.is_empty() {
            info.name.clone_from(&zone.name);
        }
        Ok(info)
    }

    async fn delete_zone(&self, resource_group: &str, zone: &str) -> Result<(), BackendError> {
        let url = self
            .arm
            .resource_url(resource_group, &[DNS_ZONES, zone], PUBLIC_DNS_API_VERSION)?;
        self.arm.delete("DeleteDnsZone", zone, url).await
    }
}

#[cfg(test)]
#[path = "public_tests.rs"]
mod public_tests;
