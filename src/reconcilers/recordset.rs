// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! A record set reconciler.
//!
//! Record sets are written through a DNS changeset (a single upsert), so the public and the
//! private backend are driven the same way. The zone a record set lives in, and that zone's
//! kind, cannot change.

use super::{
    changed, changed_list, changed_name, check_transition, push_if_some, require_name, CloudTask,
    FieldChanges,
};
use crate::cloud::AzureCloud;
use crate::constants::DEFAULT_DNS_RECORD_TTL_SECS;
use crate::dns::{names_equal, RrsType, Zone, ZoneKind, Zones};
use crate::errors::{ApplyError, BackendError, DiscoveryError, ValidationError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Desired or discovered A record set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSet {
    /// Fully-qualified record set name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
    /// Name of the zone the record set lives in
    #[serde(default, rename = "dnsZone")]
    pub dns_zone: String,
    /// Kind of the zone; looked up when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<String>,
}

impl RecordSet {
    /// A record set named `name` (fully qualified) in zone `dns_zone`.
    #[must_use]
    pub fn new(name: impl Into<String>, dns_zone: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            dns_zone: dns_zone.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_addresses<I, S>(mut self, addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.addresses = addresses.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: i64) -> Self {
        self.ttl = Some(ttl);
        self
    }

    #[must_use]
    pub fn with_private(mut self, private: bool) -> Self {
        self.private = Some(private);
        self
    }

    #[must_use]
    pub fn with_resource_group(mut self, resource_group: impl Into<String>) -> Self {
        self.resource_group = Some(resource_group.into());
        self
    }

    /// The zone to write into, preferring the desired kind when both kinds share the name.
    async fn locate_zone(&self, zones: &Zones) -> Result<Option<Zone>, BackendError> {
        let mut matching: Vec<Zone> = zones
            .list()
            .await?
            .into_iter()
            .filter(|zone| names_equal(zone.name(), &self.dns_zone))
            .collect();
        if let Some(private) = self.private {
            matching.sort_by_key(|zone| zone.kind().is_private() != private);
        }
        Ok(matching.into_iter().next())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSetChanges {
    pub name: Option<String>,
    pub dns_zone: Option<String>,
    pub private: Option<bool>,
    pub ttl: Option<i64>,
    pub addresses: Option<Vec<String>>,
}

impl FieldChanges for RecordSetChanges {
    fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        push_if_some(&mut fields, "Name", &self.name);
        push_if_some(&mut fields, "DNSZone", &self.dns_zone);
        push_if_some(&mut fields, "Private", &self.private);
        push_if_some(&mut fields, "TTL", &self.ttl);
        push_if_some(&mut fields, "Addresses", &self.addresses);
        fields
    }
}

#[async_trait]
impl CloudTask for RecordSet {
    type Changes = RecordSetChanges;

    const KIND: &'static str = "RecordSet";
    const IMMUTABLE_FIELDS: &'static [&'static str] = &["Name", "DNSZone", "Private"];

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    async fn find(&self, cloud: &dyn AzureCloud) -> Result<Option<Self>, DiscoveryError> {
        let Some(name) = self.name.as_deref() else {
            return Ok(None);
        };
        let discovery_error = |source: BackendError| DiscoveryError {
            kind: Self::KIND,
            name: name.to_string(),
            source,
        };
        let zones = cloud.zones(self.resource_group.as_deref());

        let Some(zone) = self.locate_zone(&zones).await.map_err(discovery_error)? else {
            debug!(name = %name, zone = %self.dns_zone, "DNS zone not found, record set is absent");
            return Ok(None);
        };

        let rrsets = match zone.resource_record_sets().get(name).await {
            Ok(rrsets) => rrsets,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(discovery_error(e)),
        };
        let Some(rrset) = rrsets.into_iter().find(|r| r.rrs_type == RrsType::A) else {
            return Ok(None);
        };

        Ok(Some(Self {
            name: Some(rrset.name),
            resource_group: Some(zones.resource_group().to_string()),
            dns_zone: zone.name().to_string(),
            private: Some(zone.kind().is_private()),
            ttl: Some(rrset.ttl),
            addresses: rrset.rrdatas,
        }))
    }

    fn diff(actual: &Self, desired: &Self) -> RecordSetChanges {
        let dns_zone = if desired.dns_zone.is_empty() || names_equal(&actual.dns_zone, &desired.dns_zone)
        {
            None
        } else {
            Some(desired.dns_zone.clone())
        };

        RecordSetChanges {
            name: changed_name(actual.name.as_deref(), desired.name.as_deref()),
            dns_zone,
            private: changed(&actual.private, &desired.private),
            ttl: changed(&actual.ttl, &desired.ttl),
            addresses: changed_list(&actual.addresses, &desired.addresses),
        }
    }

    fn check_changes(
        actual: Option<&Self>,
        desired: &Self,
        changes: &RecordSetChanges,
    ) -> Result<(), ValidationError> {
        check_transition(actual, desired, changes)?;
        if actual.is_none() && desired.dns_zone.is_empty() {
            return Err(ValidationError::RequiredField("DNSZone"));
        }
        Ok(())
    }

    async fn render(
        cloud: &dyn AzureCloud,
        actual: Option<&Self>,
        desired: &Self,
        _changes: &RecordSetChanges,
    ) -> Result<(), ApplyError> {
        let name = require_name(Self::KIND, desired.name.as_deref())?;
        if desired.dns_zone.is_empty() {
            return Err(ApplyError::MissingField {
                kind: Self::KIND,
                field: "DNSZone",
            });
        }
        let zones = cloud.zones(desired.resource_group.as_deref());

        let private = desired.private.or_else(|| actual.and_then(|a| a.private));
        let zone = match private {
            Some(private) => zones.new_zone(&desired.dns_zone, ZoneKind::from_private(private)),
            None => desired
                .locate_zone(&zones)
                .await
                .and_then(|zone| {
                    zone.ok_or_else(|| BackendError::NotFound {
                        operation: "GetDnsZone",
                        resource: desired.dns_zone.clone(),
                    })
                })
                .map_err(|source| ApplyError::Backend {
                    kind: Self::KIND,
                    name: name.to_string(),
                    source,
                })?,
        };

        let addresses = if desired.addresses.is_empty() {
            actual.map(|a| a.addresses.clone()).unwrap_or_default()
        } else {
            desired.addresses.clone()
        };
        let ttl = desired
            .ttl
            .or_else(|| actual.and_then(|a| a.ttl))
            .unwrap_or(DEFAULT_DNS_RECORD_TTL_SECS);

        let rrsets = zone.resource_record_sets();
        let rrset = rrsets.new_record_set(name, addresses, ttl, RrsType::A);
        let mut changeset = rrsets.start_changeset();
        changeset.upsert(rrset);
        changeset.apply().await
    }
}
