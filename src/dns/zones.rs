// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zone handles.

use super::backend::DnsBackend;
use super::rrsets::ResourceRecordSets;
use super::{names_equal, ZoneInfo, ZoneKind};
use crate::errors::BackendError;
use std::sync::Arc;
use tracing::{debug, info};

/// Entry point to the zones of one resource group, across both DNS services.
#[derive(Clone)]
pub struct Zones {
    resource_group: String,
    public: Arc<dyn DnsBackend>,
    private: Arc<dyn DnsBackend>,
}

impl std::fmt::Debug for Zones {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Zones")
            .field("resource_group", &self.resource_group)
            .finish_non_exhaustive()
    }
}

impl Zones {
    #[must_use]
    pub fn new(
        resource_group: impl Into<String>,
        public: Arc<dyn DnsBackend>,
        private: Arc<dyn DnsBackend>,
    ) -> Self {
        Self {
            resource_group: resource_group.into(),
            public,
            private,
        }
    }

    #[must_use]
    pub fn resource_group(&self) -> &str {
        &self.resource_group
    }

    /// Same backends, scoped to another resource group.
    #[must_use]
    pub fn in_resource_group(&self, resource_group: impl Into<String>) -> Self {
        Self {
            resource_group: resource_group.into(),
            public: Arc::clone(&self.public),
            private: Arc::clone(&self.private),
        }
    }

    /// Backend serving zones of `kind`.
    #[must_use]
    pub fn backend(&self, kind: ZoneKind) -> Arc<dyn DnsBackend> {
        match kind {
            ZoneKind::Public => Arc::clone(&self.public),
            ZoneKind::Private => Arc::clone(&self.private),
        }
    }

    /// All public zones followed by all private zones.
    ///
    /// # Errors
    ///
    /// Returns the first failing list call.
    pub async fn list(&self) -> Result<Vec<Zone>, BackendError> {
        let mut zones = Vec::new();
        for kind in [ZoneKind::Public, ZoneKind::Private] {
            let backend = self.backend(kind);
            let infos = backend.list_zones(&self.resource_group).await?;
            debug!(kind = %kind, count = infos.len(), "Listed DNS zones");
            zones.extend(
                infos
                    .into_iter()
                    .map(|info| Zone::new(info, &self.resource_group, Arc::clone(&backend))),
            );
        }
        Ok(zones)
    }

    /// The zone named `name`, searching public zones first.
    ///
    /// # Errors
    ///
    /// Returns the first failing list call.
    pub async fn get(&self, name: &str) -> Result<Option<Zone>, BackendError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|zone| names_equal(zone.name(), name)))
    }

    /// A local handle for a zone that may not exist yet. No backend call is made.
    #[must_use]
    pub fn new_zone(&self, name: impl Into<String>, kind: ZoneKind) -> Zone {
        Zone::new(
            ZoneInfo::new(name, kind),
            &self.resource_group,
            self.backend(kind),
        )
    }

    /// Create (or update) `zone` in its backend and return the provisioned handle.
    ///
    /// # Errors
    ///
    /// Returns the failing create-or-update call.
    pub async fn add(&self, zone: &Zone) -> Result<Zone, BackendError> {
        info!(zone = %zone.name(), kind = %zone.kind(), "Creating or updating DNS zone");
        let info = zone
            .backend
            .create_or_update_zone(&self.resource_group, &zone.info)
            .await?;
        Ok(Zone::new(info, &self.resource_group, Arc::clone(&zone.backend)))
    }

    /// Delete `zone` from its backend.
    ///
    /// # Errors
    ///
    /// Returns the failing delete call ([`BackendError::NotFound`] if it did not exist).
    pub async fn remove(&self, zone: &Zone) -> Result<(), BackendError> {
        info!(zone = %zone.name(), kind = %zone.kind(), "Deleting DNS zone");
        zone.backend
            .delete_zone(&self.resource_group, zone.name())
            .await
    }
}

/// A single zone bound to the backend of its kind.
#[derive(Clone)]
pub struct Zone {
    info: ZoneInfo,
    resource_group: String,
    backend: Arc<dyn DnsBackend>,
}

impl std::fmt::Debug for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Zone")
            .field("info", &self.info)
            .field("resource_group", &self.resource_group)
            .finish_non_exhaustive()
    }
}

impl Zone {
    /// Bind `info` to `backend`. The backend must serve `info.kind`.
    pub(crate) fn new(info: ZoneInfo, resource_group: &str, backend: Arc<dyn DnsBackend>) -> Self {
        debug_assert_eq!(info.kind, backend.kind());
        Self {
            info,
            resource_group: resource_group.to_string(),
            backend,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// ARM resource ID, `None` for a handle built with [`Zones::new_zone`].
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.info.id.as_deref()
    }

    #[must_use]
    pub fn kind(&self) -> ZoneKind {
        self.info.kind
    }

    #[must_use]
    pub fn info(&self) -> &ZoneInfo {
        &self.info
    }

    /// Tags written by [`Zones::add`].
    pub fn set_tags(&mut self, tags: crate::tags::Tags) {
        self.info.tags = tags;
    }

    /// Set the virtual network a private zone is linked to.
    pub fn set_virtual_network(&mut self, virtual_network_id: Option<String>) {
        self.info.virtual_network = virtual_network_id;
    }

    #[must_use]
    pub fn resource_group(&self) -> &str {
        &self.resource_group
    }

    pub(crate) fn backend(&self) -> &Arc<dyn DnsBackend> {
        &self.backend
    }

    /// Record sets of this zone.
    #[must_use]
    pub fn resource_record_sets(&self) -> ResourceRecordSets {
        ResourceRecordSets::new(self.clone())
    }
}

#[cfg(test)]
#[path = "zones_tests.rs"]
mod zones_tests;
