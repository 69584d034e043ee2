// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Interface shared by the public and private DNS adapters.

use super::{ResourceRecordSet, RrsType, ZoneInfo, ZoneKind};
use crate::errors::BackendError;
use async_trait::async_trait;

/// Record set and zone operations against one DNS service.
///
/// Record set calls take the ARM *relative* name (see [`super::relative_name`]). Every call is
/// a single attempt.
#[async_trait]
pub trait DnsBackend: Send + Sync {
    /// The zone kind this backend serves.
    fn kind(&self) -> ZoneKind;

    /// Create or replace a record set.
    async fn create_or_update(
        &self,
        resource_group: &str,
        zone: &str,
        relative_name: &str,
        rrs_type: &RrsType,
        rrset: &ResourceRecordSet,
    ) -> Result<(), BackendError>;

    /// Every record set of a zone, all pages drained.
    async fn list(
        &self,
        resource_group: &str,
        zone: &str,
    ) -> Result<Vec<ResourceRecordSet>, BackendError>;

    /// Delete a record set.
    ///
    /// # Errors
    ///
    /// Deleting a record set that does not exist is [`BackendError::NotFound`].
    async fn delete(
        &self,
        resource_group: &str,
        zone: &str,
        relative_name: &str,
        rrs_type: &RrsType,
    ) -> Result<(), BackendError>;

    /// Every zone of this kind in the resource group.
    async fn list_zones(&self, resource_group: &str) -> Result<Vec<ZoneInfo>, BackendError>;

    /// Create or update a zone and wait for it to be provisioned.
    async fn create_or_update_zone(
        &self,
        resource_group: &str,
        zone: &ZoneInfo,
    ) -> Result<ZoneInfo, BackendError>;

    /// Delete a zone and wait for the deletion to finish.
    async fn delete_zone(&self, resource_group: &str, zone: &str) -> Result<(), BackendError>;
}

/// Fully-qualified name of a listed record set.
///
/// Prefers the `fqdn` ARM reports; otherwise joins the relative name to the zone, with `@`
/// standing for the apex.
pub(crate) fn listed_fqdn(fqdn: Option<&str>, relative: Option<&str>, zone: &str) -> String {
    if let Some(fqdn) = fqdn.filter(|f| !f.is_empty()) {
        return fqdn.trim_end_matches('.').to_string();
    }
    let zone = zone.trim_end_matches('.');
    match relative {
        None | Some("") | Some(crate::constants::APEX_RELATIVE_NAME) => zone.to_string(),
        Some(relative) => format!("{relative}.{zone}"),
    }
}
