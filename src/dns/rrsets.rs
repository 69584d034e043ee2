// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Record sets of one zone.

use super::changeset::Changeset;
use super::zones::Zone;
use super::{names_equal, ResourceRecordSet, RrsType};
use crate::errors::BackendError;

/// Record set view of a [`Zone`].
#[derive(Debug, Clone)]
pub struct ResourceRecordSets {
    zone: Zone,
}

impl ResourceRecordSets {
    pub(crate) fn new(zone: Zone) -> Self {
        Self { zone }
    }

    /// Every record set in the zone.
    ///
    /// # Errors
    ///
    /// Returns the failing list call.
    pub async fn list(&self) -> Result<Vec<ResourceRecordSet>, BackendError> {
        self.zone
            .backend()
            .list(self.zone.resource_group(), self.zone.name())
            .await
    }

    /// Record sets (of any type) whose fully-qualified name is `name`.
    ///
    /// # Errors
    ///
    /// Returns the failing list call.
    pub async fn get(&self, name: &str) -> Result<Vec<ResourceRecordSet>, BackendError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|rrset| names_equal(&rrset.name, name))
            .collect())
    }

    /// Build a record set for this zone. Nothing is written until a changeset is applied.
    #[must_use]
    pub fn new_record_set(
        &self,
        name: impl Into<String>,
        rrdatas: Vec<String>,
        ttl: i64,
        rrs_type: RrsType,
    ) -> ResourceRecordSet {
        ResourceRecordSet::new(name, rrdatas, ttl, rrs_type)
    }

    /// An empty changeset against this zone.
    #[must_use]
    pub fn start_changeset(&self) -> Changeset {
        Changeset::new(self.zone.clone())
    }

    #[must_use]
    pub fn zone(&self) -> &Zone {
        &self.zone
    }
}
