// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Desired-state manifests and the sequential executor.
//!
//! A manifest is a YAML document listing every resource to reconcile:
//!
//! ```yaml
//! dnsZones:
//!   - name: example.com
//! recordSets:
//!   - name: api.example.com
//!     dnsZone: example.com
//!     addresses: ["10.0.0.4"]
//! applicationSecurityGroups:
//!   - name: masters
//! networkSecurityGroups:
//!   - name: masters-nsg
//! securityGroupRules:
//!   - networkSecurityGroup: masters-nsg
//!     name: kube-api
//!     priority: 100
//!     protocol: Tcp
//!     access: Allow
//!     destinationPortRange: "6443"
//!     destinationApplicationSecurityGroups: [masters]
//! ```
//!
//! [`reconcile_manifest`] drives the resources one at a time in dependency order (zones,
//! record sets, application security groups, network security groups, rules) and stops at the
//! first failure. Resources already applied stay applied.

use crate::cloud::AzureCloud;
use crate::errors::{ManifestError, ReconcileError};
use crate::reconcilers::{
    plan_task, run_task, ApplicationSecurityGroup, CloudTask, DnsZone, NetworkSecurityGroup,
    Outcome, RecordSet, SecurityGroupRule,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

const INLINE_SOURCE: &str = "<inline>";

/// Every resource to reconcile, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dns_zones: Vec<DnsZone>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub record_sets: Vec<RecordSet>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub application_security_groups: Vec<ApplicationSecurityGroup>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub network_security_groups: Vec<NetworkSecurityGroup>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security_group_rules: Vec<SecurityGroupRule>,
}

impl Manifest {
    /// Parse a manifest from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Parse`] for malformed YAML or unknown keys.
    pub fn from_yaml(yaml: &str) -> Result<Self, ManifestError> {
        parse(yaml, INLINE_SOURCE)
    }

    /// Read and parse the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Read`] when the file cannot be read and
    /// [`ManifestError::Parse`] when it is not a valid manifest.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let yaml = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ManifestError::Read {
                path: display.clone(),
                reason: e.to_string(),
            })?;
        parse(&yaml, &display)
    }

    /// Number of resources across all kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dns_zones.len()
            + self.record_sets.len()
            + self.application_security_groups.len()
            + self.network_security_groups.len()
            + self.security_group_rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn parse(yaml: &str, source: &str) -> Result<Manifest, ManifestError> {
    serde_yaml::from_str(yaml).map_err(|e| ManifestError::Parse {
        path: source.to_string(),
        reason: e.to_string(),
    })
}

/// What happened (or, for a dry run, would happen) to one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub kind: &'static str,
    pub name: String,
    pub outcome: Outcome,
}

/// Result of [`reconcile_manifest`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub dry_run: bool,
    pub entries: Vec<ReportEntry>,
}

impl Report {
    /// Number of entries with `outcome`.
    #[must_use]
    pub fn count(&self, outcome: Outcome) -> usize {
        self.entries.iter().filter(|e| e.outcome == outcome).count()
    }
}

/// Reconcile every resource of `manifest` in dependency order.
///
/// With `dry_run` each resource is only planned (Find, diff, CheckChanges) and the report
/// says what a real run would do. Cluster tags are merged into `manifest` as resources are
/// reconciled.
///
/// # Errors
///
/// Returns the first [`ReconcileError`]; later resources are not attempted.
pub async fn reconcile_manifest(
    cloud: &dyn AzureCloud,
    manifest: &mut Manifest,
    dry_run: bool,
) -> Result<Report, ReconcileError> {
    let mut report = Report {
        dry_run,
        entries: Vec::with_capacity(manifest.len()),
    };

    reconcile_all(cloud, &mut manifest.dns_zones, dry_run, &mut report).await?;
    reconcile_all(cloud, &mut manifest.record_sets, dry_run, &mut report).await?;
    reconcile_all(
        cloud,
        &mut manifest.application_security_groups,
        dry_run,
        &mut report,
    )
    .await?;
    reconcile_all(
        cloud,
        &mut manifest.network_security_groups,
        dry_run,
        &mut report,
    )
    .await?;
    reconcile_all(cloud, &mut manifest.security_group_rules, dry_run, &mut report).await?;

    info!(
        dry_run,
        created = report.count(Outcome::Created),
        updated = report.count(Outcome::Updated),
        unchanged = report.count(Outcome::Unchanged),
        "Manifest reconciled"
    );
    Ok(report)
}

async fn reconcile_all<T: CloudTask>(
    cloud: &dyn AzureCloud,
    resources: &mut [T],
    dry_run: bool,
    report: &mut Report,
) -> Result<(), ReconcileError> {
    for resource in resources.iter_mut() {
        let outcome = if dry_run {
            plan_outcome(cloud, resource).await
        } else {
            run_task(cloud, resource).await
        };

        let name = resource.name().unwrap_or_default().to_string();
        match outcome {
            Ok(outcome) => report.entries.push(ReportEntry {
                kind: T::KIND,
                name,
                outcome,
            }),
            Err(e) => {
                warn!(kind = T::KIND, name = %name, error = %e, "Reconciliation stopped");
                return Err(e);
            }
        }
    }
    Ok(())
}

async fn plan_outcome<T: CloudTask>(
    cloud: &dyn AzureCloud,
    desired: &mut T,
) -> Result<Outcome, ReconcileError> {
    if let Some(tags) = desired.tags_mut() {
        cloud.add_cluster_tags(tags);
    }
    let plan = plan_task(cloud, desired).await?;
    Ok(match (&plan.actual, plan.needs_render()) {
        (None, _) => Outcome::Created,
        (Some(_), true) => Outcome::Updated,
        (Some(_), false) => Outcome::Unchanged,
    })
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod manifest_tests;
