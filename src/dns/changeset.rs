// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Batched record set mutations.
//!
//! A [`Changeset`] accumulates removals, additions and upserts without touching the backend.
//! [`Changeset::apply`] then issues them strictly in that order:
//!
//! 1. every removal (delete)
//! 2. every addition (create-or-update)
//! 3. every upsert (create-or-update)
//!
//! Removals first let a caller replace a record set by removing and re-adding the same name
//! in one changeset. The first failure stops the run; mutations already issued stay applied.

use super::naming::relative_name;
use super::zones::Zone;
use super::{ResourceRecordSet, RrsType};
use crate::errors::ApplyError;
use tracing::{debug, info};

/// Pending record set mutations for one zone.
#[derive(Debug)]
pub struct Changeset {
    zone: Zone,
    additions: Vec<ResourceRecordSet>,
    removals: Vec<ResourceRecordSet>,
    upserts: Vec<ResourceRecordSet>,
}

impl Changeset {
    pub(crate) fn new(zone: Zone) -> Self {
        Self {
            zone,
            additions: Vec::new(),
            removals: Vec::new(),
            upserts: Vec::new(),
        }
    }

    /// Queue creation of `rrset`.
    pub fn add(&mut self, rrset: ResourceRecordSet) -> &mut Self {
        self.additions.push(rrset);
        self
    }

    /// Queue deletion of `rrset` (matched by name and type).
    pub fn remove(&mut self, rrset: ResourceRecordSet) -> &mut Self {
        self.removals.push(rrset);
        self
    }

    /// Queue create-or-replace of `rrset`.
    pub fn upsert(&mut self, rrset: ResourceRecordSet) -> &mut Self {
        self.upserts.push(rrset);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty() && self.upserts.is_empty()
    }

    #[must_use]
    pub fn zone(&self) -> &Zone {
        &self.zone
    }

    /// Issue every queued mutation.
    ///
    /// An empty changeset returns immediately without contacting the backend.
    ///
    /// # Errors
    ///
    /// Returns [`ApplyError::RecordSet`] for the first failing backend call and
    /// [`ApplyError::UnsupportedRecordType`] for an addition or upsert that is not an A record
    /// set. Nothing after the failing entry is attempted.
    pub async fn apply(self) -> Result<(), ApplyError> {
        if self.is_empty() {
            return Ok(());
        }

        debug!(
            zone = %self.zone.name(),
            kind = %self.zone.kind(),
            removals = self.removals.len(),
            additions = self.additions.len(),
            upserts = self.upserts.len(),
            "Applying DNS changeset"
        );

        for removal in &self.removals {
            self.delete(removal).await?;
        }
        for addition in &self.additions {
            self.write("add", addition).await?;
        }
        for upsert in &self.upserts {
            self.write("upsert", upsert).await?;
        }
        Ok(())
    }

    async fn delete(&self, rrset: &ResourceRecordSet) -> Result<(), ApplyError> {
        let relative = relative_name(&rrset.name, self.zone.name());
        info!(
            zone = %self.zone.name(),
            record_set = %rrset.name,
            rrs_type = %rrset.rrs_type,
            "Deleting record set"
        );
        self.zone
            .backend()
            .delete(
                self.zone.resource_group(),
                self.zone.name(),
                &relative,
                &rrset.rrs_type,
            )
            .await
            .map_err(|source| ApplyError::RecordSet {
                operation: "remove",
                name: rrset.name.clone(),
                source,
            })
    }

    async fn write(
        &self,
        operation: &'static str,
        rrset: &ResourceRecordSet,
    ) -> Result<(), ApplyError> {
        if rrset.rrs_type != RrsType::A {
            return Err(ApplyError::UnsupportedRecordType {
                name: rrset.name.clone(),
                rrs_type: rrset.rrs_type.to_string(),
            });
        }

        let relative = relative_name(&rrset.name, self.zone.name());
        info!(
            zone = %self.zone.name(),
            record_set = %rrset.name,
            relative_name = %relative,
            ttl = rrset.ttl,
            rrdatas = ?rrset.rrdatas,
            "Writing record set"
        );
        self.zone
            .backend()
            .create_or_update(
                self.zone.resource_group(),
                self.zone.name(),
                &relative,
                &rrset.rrs_type,
                rrset,
            )
            .await
            .map_err(|source| ApplyError::RecordSet {
                operation,
                name: rrset.name.clone(),
                source,
            })
    }
}

#[cfg(test)]
#[path = "changeset_tests.rs"]
mod changeset_tests;
