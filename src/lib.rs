// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # armsync - idempotent reconciliation of Azure DNS and network resources
//!
//! armsync converges a declared topology of DNS zones, A record sets, network security groups,
//! application security groups and security rules against Azure Resource Manager. It is
//! meant to be invoked repeatedly: every pass re-discovers the live state, so a pass that
//! stopped half way is simply finished by the next one.
//!
//! ## Overview
//!
//! - Every resource kind implements the same Find / CheckChanges / Render contract
//! - DNS writes go through a changeset applied in a fixed order (removals, additions, upserts)
//! - Public and private DNS zones sit behind one backend interface chosen by [`dns::ZoneKind`]
//! - ARM calls are made once, never retried; failures surface with their ARM error code
//!
//! ## Modules
//!
//! - [`reconcilers`] - the reconciliation triad and the per-kind tasks
//! - [`dns`] - DNS provider facade, changesets and the public/private backends
//! - [`arm`] - Azure Resource Manager transport, wire types and network clients
//! - [`cloud`] - shared context handed to every reconciler
//! - [`manifest`] - YAML manifests and the sequential executor
//! - [`config`] - cloud configuration loaded from the environment
//! - [`errors`] - error taxonomy
//!
//! ## Example
//!
//! ```rust,no_run
//! use armsync::dns::{ResourceRecordSet, RrsType, ZoneKind};
//! use armsync::cloud::{ArmCloud, AzureCloud};
//!
//! async fn publish(cloud: &ArmCloud) -> anyhow::Result<()> {
//!     let zone = cloud.zones(None).new_zone("example.com", ZoneKind::Public);
//!     let mut changeset = zone.resource_record_sets().start_changeset();
//!     changeset.upsert(ResourceRecordSet::new(
//!         "www.example.com",
//!         vec!["1.2.3.4".to_string()],
//!         300,
//!         RrsType::A,
//!     ));
//!     changeset.apply().await?;
//!     Ok(())
//! }
//! ```

pub mod arm;
pub mod cloud;
pub mod config;
pub mod constants;
pub mod dns;
pub mod errors;
pub mod http_errors;
pub mod manifest;
pub mod reconcilers;
pub mod tags;

#[cfg(test)]
pub(crate) mod testing;
