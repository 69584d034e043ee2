// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Reconcilers for Azure DNS and network resources.
//!
//! Every resource kind implements [`CloudTask`], the same three-step contract:
//!
//! 1. **Find** - list the remote resources and return the actual state, or `None`
//! 2. **CheckChanges** - reject transitions the cloud cannot perform (immutable fields,
//!    missing required fields)
//! 3. **Render** - create or update the resource so it matches the desired state
//!
//! [`run_task`] drives one resource through a full pass. [`plan_task`] stops before Render
//! and is used for dry runs. Nothing is persisted between passes: every pass starts from
//! [`Phase::Unknown`] and re-discovers the actual state.
//!
//! # Available Kinds
//!
//! - [`DnsZone`] - public or private DNS zone
//! - [`RecordSet`] - A record set, written through a DNS changeset
//! - [`NetworkSecurityGroup`] - network security group with inline rules
//! - [`ApplicationSecurityGroup`] - application security group
//! - [`SecurityGroupRule`] - a single rule of an existing network security group
//!
//! # Example
//!
//! ```rust,no_run
//! use armsync::cloud::ArmCloud;
//! use armsync::reconcilers::{run_task, RecordSet};
//!
//! async fn publish(cloud: &ArmCloud) -> anyhow::Result<()> {
//!     let mut record = RecordSet::new("api.example.com", "example.com")
//!         .with_addresses(["10.0.0.4"])
//!         .with_ttl(60);
//!     let outcome = run_task(cloud, &mut record).await?;
//!     println!("{outcome}");
//!     Ok(())
//! }
//! ```

pub mod application_security_group;
pub mod dnszone;
pub mod network_security_group;
pub mod recordset;
pub mod rules;
pub mod security_group_rule;

#[cfg(test)]
mod recordset_tests;

pub use application_security_group::ApplicationSecurityGroup;
pub use dnszone::DnsZone;
pub use network_security_group::NetworkSecurityGroup;
pub use recordset::RecordSet;
pub use rules::{RuleAccess, RuleProtocol, RuleSpec};
pub use security_group_rule::SecurityGroupRule;

use crate::cloud::AzureCloud;
use crate::dns::names_equal;
use crate::errors::{ApplyError, DiscoveryError, ReconcileError, ValidationError};
use crate::tags::{contains_all, Tags};
use async_trait::async_trait;
use std::fmt;
use tracing::{debug, info};

/// Field-level difference between actual and desired state.
///
/// A field is present only when desired specifies it and it differs from actual.
pub trait FieldChanges: Default + fmt::Debug + Send + Sync {
    /// Names of the changed fields.
    fn changed_fields(&self) -> Vec<&'static str>;

    fn is_empty(&self) -> bool {
        self.changed_fields().is_empty()
    }
}

/// The Find / CheckChanges / Render contract of one resource kind.
#[async_trait]
pub trait CloudTask: Sized + Clone + fmt::Debug + Send + Sync {
    type Changes: FieldChanges;

    /// Kind name used in logs and errors (e.g. `"DNSZone"`).
    const KIND: &'static str;

    /// Fields that cannot change once the resource exists. `"Name"` comes first.
    const IMMUTABLE_FIELDS: &'static [&'static str];

    /// Desired or discovered name.
    fn name(&self) -> Option<&str>;

    /// Tags the cluster tags are merged into, for kinds that carry tags.
    fn tags_mut(&mut self) -> Option<&mut Tags> {
        None
    }

    /// Discover the actual state of the resource named like `self`.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError`] when the list call fails. Absence is `Ok(None)`.
    async fn find(&self, cloud: &dyn AzureCloud) -> Result<Option<Self>, DiscoveryError>;

    /// Fields desired specifies that differ from actual.
    fn diff(actual: &Self, desired: &Self) -> Self::Changes;

    /// Reject transitions that cannot be applied.
    ///
    /// On create (`actual` is `None`) the name is required. On update every immutable field
    /// present in `changes` is rejected.
    ///
    /// # Errors
    ///
    /// [`ValidationError::RequiredField`] or [`ValidationError::CannotChangeField`].
    fn check_changes(
        actual: Option<&Self>,
        desired: &Self,
        changes: &Self::Changes,
    ) -> Result<(), ValidationError> {
        check_transition::<Self>(actual, desired, changes)
    }

    /// Create or update the resource to match `desired`.
    ///
    /// # Errors
    ///
    /// Returns [`ApplyError`] when the backend call fails.
    async fn render(
        cloud: &dyn AzureCloud,
        actual: Option<&Self>,
        desired: &Self,
        changes: &Self::Changes,
    ) -> Result<(), ApplyError>;
}

/// Where a single pass over one resource currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing is known yet
    Unknown,
    /// Find returned nothing
    Absent,
    /// Find returned the actual state
    Present,
    /// CheckChanges accepted the transition
    Validated,
    /// Render finished
    Applied,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self {
            Phase::Unknown => "Unknown",
            Phase::Absent => "Absent",
            Phase::Present => "Present",
            Phase::Validated => "Validated",
            Phase::Applied => "Applied",
        };
        f.write_str(phase)
    }
}

/// Result of [`run_task`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The resource did not exist and was created
    Created,
    /// The resource existed and differed; it was updated
    Updated,
    /// The resource already matched
    Unchanged,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = match self {
            Outcome::Created => "created",
            Outcome::Updated => "updated",
            Outcome::Unchanged => "unchanged",
        };
        f.write_str(outcome)
    }
}

/// Actual state and validated changes for one resource.
#[derive(Debug)]
pub struct Plan<T: CloudTask> {
    pub actual: Option<T>,
    pub changes: T::Changes,
    pub phase: Phase,
}

impl<T: CloudTask> Plan<T> {
    /// True when Render has something to do.
    #[must_use]
    pub fn needs_render(&self) -> bool {
        self.actual.is_none() || !self.changes.is_empty()
    }
}

fn validation_error<T: CloudTask>(desired: &T, source: ValidationError) -> ReconcileError {
    ReconcileError::Validation {
        kind: T::KIND,
        name: desired.name().unwrap_or_default().to_string(),
        source,
    }
}

/// Find, diff and CheckChanges without rendering.
///
/// # Errors
///
/// Returns [`ReconcileError::Discovery`] or [`ReconcileError::Validation`].
pub async fn plan_task<T: CloudTask>(
    cloud: &dyn AzureCloud,
    desired: &T,
) -> Result<Plan<T>, ReconcileError> {
    let name = desired.name().unwrap_or_default();
    debug!(kind = T::KIND, name = %name, phase = %Phase::Unknown, "Finding resource");

    let actual = desired.find(cloud).await?;
    let phase = if actual.is_some() {
        Phase::Present
    } else {
        Phase::Absent
    };
    debug!(kind = T::KIND, name = %name, phase = %phase, "Discovered actual state");

    let changes = match &actual {
        Some(actual) => T::diff(actual, desired),
        None => T::Changes::default(),
    };

    T::check_changes(actual.as_ref(), desired, &changes)
        .map_err(|e| validation_error(desired, e))?;
    debug!(
        kind = T::KIND,
        name = %name,
        phase = %Phase::Validated,
        changes = ?changes.changed_fields(),
        "Validated changes"
    );

    Ok(Plan {
        actual,
        changes,
        phase: Phase::Validated,
    })
}

/// One full reconciliation pass: merge cluster tags, plan, and render when absent or changed.
///
/// # Errors
///
/// Returns the first failing step as a [`ReconcileError`]; nothing is rolled back.
pub async fn run_task<T: CloudTask>(
    cloud: &dyn AzureCloud,
    desired: &mut T,
) -> Result<Outcome, ReconcileError> {
    if let Some(tags) = desired.tags_mut() {
        cloud.add_cluster_tags(tags);
    }

    let plan = plan_task(cloud, desired).await?;
    let name = desired.name().unwrap_or_default();

    if !plan.needs_render() {
        debug!(kind = T::KIND, name = %name, "Resource is up to date");
        return Ok(Outcome::Unchanged);
    }

    let outcome = if plan.actual.is_some() {
        Outcome::Updated
    } else {
        Outcome::Created
    };

    T::render(cloud, plan.actual.as_ref(), desired, &plan.changes).await?;
    info!(
        kind = T::KIND,
        name = %name,
        phase = %Phase::Applied,
        outcome = %outcome,
        "Reconciled resource"
    );
    Ok(outcome)
}

/// Name required on create, immutable fields rejected on update.
///
/// Kinds that override [`CloudTask::check_changes`] call this first.
///
/// # Errors
///
/// [`ValidationError::RequiredField`] or [`ValidationError::CannotChangeField`].
pub fn check_transition<T: CloudTask>(
    actual: Option<&T>,
    desired: &T,
    changes: &T::Changes,
) -> Result<(), ValidationError> {
    if actual.is_none() {
        if desired.name().map_or(true, str::is_empty) {
            return Err(ValidationError::RequiredField("Name"));
        }
        return Ok(());
    }

    let changed = changes.changed_fields();
    match T::IMMUTABLE_FIELDS
        .iter()
        .find(|field| changed.contains(*field))
    {
        Some(field) => Err(ValidationError::CannotChangeField(*field)),
        None => Ok(()),
    }
}

/// `desired` when it is specified and differs from `actual`.
pub(crate) fn changed<T: PartialEq + Clone>(actual: &Option<T>, desired: &Option<T>) -> Option<T> {
    match desired {
        Some(value) if actual.as_ref() != Some(value) => Some(value.clone()),
        _ => None,
    }
}

/// Push `field` onto `fields` when `value` is present.
pub(crate) fn push_if_some<T>(fields: &mut Vec<&'static str>, field: &'static str, value: &Option<T>) {
    if value.is_some() {
        fields.push(field);
    }
}

/// Desired name, `Some` only when it differs from actual (ASCII case and a trailing dot ignored).
pub(crate) fn changed_name(actual: Option<&str>, desired: Option<&str>) -> Option<String> {
    match (actual, desired) {
        (Some(a), Some(d)) if names_equal(a, d) => None,
        (_, Some(d)) => Some(d.to_string()),
        _ => None,
    }
}

/// Sorted `desired` when it is non-empty and differs from `actual` as a set of entries.
pub(crate) fn changed_list(actual: &[String], desired: &[String]) -> Option<Vec<String>> {
    if desired.is_empty() {
        return None;
    }
    let mut a = actual.to_vec();
    let mut d = desired.to_vec();
    a.sort();
    d.sort();
    (a != d).then_some(d)
}

/// Desired tags when some desired key is missing or different on the server.
pub(crate) fn changed_tags(actual: &Tags, desired: &Tags) -> Option<Tags> {
    (!contains_all(actual, desired)).then(|| desired.clone())
}

/// Required name for render.
pub(crate) fn require_name<'a>(kind: &'static str, name: Option<&'a str>) -> Result<&'a str, ApplyError> {
    name.filter(|n| !n.is_empty()).ok_or(ApplyError::MissingField {
        kind,
        field: "Name",
    })
}
