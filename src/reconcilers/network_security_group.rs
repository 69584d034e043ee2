// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Network security group reconciler.
//!
//! Rules listed on the group are rendered inline with it. Rules that exist on the server but
//! are not named in desired state are written back exactly as ARM returned them, so rules
//! managed through [`super::SecurityGroupRule`] or by hand survive a render of their group.

use super::rules::RuleSpec;
use super::{
    changed_name, changed_tags, check_transition, push_if_some, require_name, CloudTask,
    FieldChanges,
};
use crate::arm::types::{SecurityGroup, SecurityGroupProperties, SecurityRule};
use crate::cloud::AzureCloud;
use crate::errors::{ApplyError, DiscoveryError, ValidationError};
use crate::tags::{merge_tags, Tags};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Desired or discovered network security group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSecurityGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
    #[serde(default, skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Rules exactly as listed by ARM; empty for desired state
    #[serde(skip)]
    pub server_rules: Vec<SecurityRule>,
}

impl NetworkSecurityGroup {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_rules(mut self, rules: Vec<RuleSpec>) -> Self {
        self.rules = rules;
        self
    }

    fn rule_named(&self, name: &str) -> Option<&RuleSpec> {
        self.rules.iter().find(|r| {
            r.name
                .as_deref()
                .is_some_and(|n| n.eq_ignore_ascii_case(name))
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkSecurityGroupChanges {
    pub name: Option<String>,
    pub tags: Option<Tags>,
    pub rules: Option<Vec<RuleSpec>>,
}

impl FieldChanges for NetworkSecurityGroupChanges {
    fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        push_if_some(&mut fields, "Name", &self.name);
        push_if_some(&mut fields, "Tags", &self.tags);
        push_if_some(&mut fields, "Rules", &self.rules);
        fields
    }
}

#[async_trait]
impl CloudTask for NetworkSecurityGroup {
    type Changes = NetworkSecurityGroupChanges;

    const KIND: &'static str = "NetworkSecurityGroup";
    const IMMUTABLE_FIELDS: &'static [&'static str] = &["Name"];

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn tags_mut(&mut self) -> Option<&mut Tags> {
        Some(&mut self.tags)
    }

    async fn find(&self, cloud: &dyn AzureCloud) -> Result<Option<Self>, DiscoveryError> {
        let Some(name) = self.name.as_deref() else {
            return Ok(None);
        };
        let resource_group = cloud.resource_group(self.resource_group.as_deref());
        let subscription_id = cloud.subscription_id();

        let groups = cloud
            .network_security_groups()
            .list(resource_group)
            .await
            .map_err(|source| DiscoveryError {
                kind: Self::KIND,
                name: name.to_string(),
                source,
            })?;

        Ok(groups
            .into_iter()
            .find(|g| g.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(name)))
            .map(|g| {
                let server_rules = g.properties.map(|p| p.security_rules).unwrap_or_default();
                Self {
                    name: g.name,
                    resource_group: Some(resource_group.to_string()),
                    tags: g.tags,
                    rules: server_rules
                        .iter()
                        .map(|r| RuleSpec::from_wire(r, subscription_id, resource_group))
                        .collect(),
                    id: g.id,
                    server_rules,
                }
            }))
    }

    fn diff(actual: &Self, desired: &Self) -> NetworkSecurityGroupChanges {
        let rules_match = desired.rules.iter().all(|want| {
            want.name
                .as_deref()
                .and_then(|n| actual.rule_named(n))
                .is_some_and(|have| RuleSpec::diff(have, want).is_empty())
        });

        NetworkSecurityGroupChanges {
            name: changed_name(actual.name.as_deref(), desired.name.as_deref()),
            tags: changed_tags(&actual.tags, &desired.tags),
            rules: (!rules_match).then(|| desired.rules.clone()),
        }
    }

    fn check_changes(
        actual: Option<&Self>,
        desired: &Self,
        changes: &NetworkSecurityGroupChanges,
    ) -> Result<(), ValidationError> {
        check_transition(actual, desired, changes)?;
        if desired
            .rules
            .iter()
            .any(|r| r.name.as_deref().map_or(true, str::is_empty))
        {
            return Err(ValidationError::RequiredField("Rules.Name"));
        }
        Ok(())
    }

    async fn render(
        cloud: &dyn AzureCloud,
        actual: Option<&Self>,
        desired: &Self,
        _changes: &NetworkSecurityGroupChanges,
    ) -> Result<(), ApplyError> {
        let name = require_name(Self::KIND, desired.name.as_deref())?;
        let resource_group = cloud.resource_group(desired.resource_group.as_deref());
        let subscription_id = cloud.subscription_id();

        let mut security_rules: Vec<_> = desired
            .rules
            .iter()
            .map(|r| r.to_wire(subscription_id, resource_group))
            .collect();
        if let Some(actual) = actual {
            security_rules.extend(
                actual
                    .server_rules
                    .iter()
                    .filter(|r| {
                        r.name
                            .as_deref()
                            .is_some_and(|n| desired.rule_named(n).is_none())
                    })
                    .cloned(),
            );
        }

        let group = SecurityGroup {
            location: Some(cloud.region().to_string()),
            tags: merge_tags(actual.map(|a| &a.tags), &desired.tags),
            properties: Some(SecurityGroupProperties { security_rules }),
            ..SecurityGroup::default()
        };

        cloud
            .network_security_groups()
            .create_or_update(resource_group, name, &group)
            .await
            .map_err(|source| ApplyError::Backend {
                kind: Self::KIND,
                name: name.to_string(),
                source,
            })?;
        Ok(())
    }
}
