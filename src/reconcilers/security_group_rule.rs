// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Security rule reconciler.
//!
//! A rule belongs to an existing network security group, referenced by name. It is written
//! through the security rules client, so the rest of the group is left untouched.

use super::rules::{RuleChanges, RuleSpec};
use super::{check_transition, require_name, CloudTask, FieldChanges};
use crate::cloud::AzureCloud;
use crate::errors::{ApplyError, DiscoveryError, ValidationError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Desired or discovered security rule of a network security group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityGroupRule {
    /// Name of the owning network security group
    #[serde(default)]
    pub network_security_group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
    #[serde(flatten)]
    pub rule: RuleSpec,
}

impl SecurityGroupRule {
    /// `rule` inside the network security group `network_security_group`.
    #[must_use]
    pub fn new(network_security_group: impl Into<String>, rule: RuleSpec) -> Self {
        Self {
            network_security_group: network_security_group.into(),
            resource_group: None,
            rule,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SecurityGroupRuleChanges {
    pub network_security_group: Option<String>,
    pub rule: RuleChanges,
}

impl FieldChanges for SecurityGroupRuleChanges {
    fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = self.rule.changed_fields();
        if self.network_security_group.is_some() {
            fields.push("NetworkSecurityGroup");
        }
        fields
    }
}

#[async_trait]
impl CloudTask for SecurityGroupRule {
    type Changes = SecurityGroupRuleChanges;

    const KIND: &'static str = "SecurityGroupRule";
    const IMMUTABLE_FIELDS: &'static [&'static str] = &["Name", "NetworkSecurityGroup"];

    fn name(&self) -> Option<&str> {
        self.rule.name.as_deref()
    }

    async fn find(&self, cloud: &dyn AzureCloud) -> Result<Option<Self>, DiscoveryError> {
        let Some(name) = self.rule.name.as_deref() else {
            return Ok(None);
        };
        if self.network_security_group.is_empty() {
            return Ok(None);
        }
        let resource_group = cloud.resource_group(self.resource_group.as_deref());
        let subscription_id = cloud.subscription_id();

        let rules = match cloud
            .security_rules()
            .list(resource_group, &self.network_security_group)
            .await
        {
            Ok(rules) => rules,
            Err(e) if e.is_not_found() => {
                debug!(
                    network_security_group = %self.network_security_group,
                    rule = %name,
                    "Network security group not found, rule is absent"
                );
                return Ok(None);
            }
            Err(source) => {
                return Err(DiscoveryError {
                    kind: Self::KIND,
                    name: name.to_string(),
                    source,
                })
            }
        };

        Ok(rules
            .iter()
            .find(|r| r.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(name)))
            .map(|r| Self {
                network_security_group: self.network_security_group.clone(),
                resource_group: Some(resource_group.to_string()),
                rule: RuleSpec::from_wire(r, subscription_id, resource_group),
            }))
    }

    fn diff(actual: &Self, desired: &Self) -> SecurityGroupRuleChanges {
        let network_security_group = (!desired.network_security_group.is_empty()
            && !desired
                .network_security_group
                .eq_ignore_ascii_case(&actual.network_security_group))
        .then(|| desired.network_security_group.clone());

        SecurityGroupRuleChanges {
            network_security_group,
            rule: RuleSpec::diff(&actual.rule, &desired.rule),
        }
    }

    fn check_changes(
        actual: Option<&Self>,
        desired: &Self,
        changes: &SecurityGroupRuleChanges,
    ) -> Result<(), ValidationError> {
        check_transition(actual, desired, changes)?;
        if actual.is_none() && desired.network_security_group.is_empty() {
            return Err(ValidationError::RequiredField("NetworkSecurityGroup"));
        }
        Ok(())
    }

    async fn render(
        cloud: &dyn AzureCloud,
        _actual: Option<&Self>,
        desired: &Self,
        _changes: &SecurityGroupRuleChanges,
    ) -> Result<(), ApplyError> {
        let name = require_name(Self::KIND, desired.rule.name.as_deref())?;
        if desired.network_security_group.is_empty() {
            return Err(ApplyError::MissingField {
                kind: Self::KIND,
                field: "NetworkSecurityGroup",
            });
        }
        let resource_group = cloud.resource_group(desired.resource_group.as_deref());
        let rule = desired.rule.to_wire(cloud.subscription_id(), resource_group);

        cloud
            .security_rules()
            .create_or_update(resource_group, &desired.network_security_group, name, &rule)
            .await
            .map_err(|source| ApplyError::Backend {
                kind: Self::KIND,
                name: name.to_string(),
                source,
            })?;
        Ok(())
    }
}
