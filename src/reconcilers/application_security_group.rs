// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Application security group reconciler.

use super::{changed_name, changed_tags, push_if_some, require_name, CloudTask, FieldChanges};
use crate::arm::types;
use crate::cloud::AzureCloud;
use crate::errors::{ApplyError, DiscoveryError};
use crate::tags::{merge_tags, Tags};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Desired or discovered application security group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSecurityGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
    #[serde(default, skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl ApplicationSecurityGroup {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationSecurityGroupChanges {
    pub name: Option<String>,
    pub tags: Option<Tags>,
}

impl FieldChanges for ApplicationSecurityGroupChanges {
    fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        push_if_some(&mut fields, "Name", &self.name);
        push_if_some(&mut fields, "Tags", &self.tags);
        fields
    }
}

#[async_trait]
impl CloudTask for ApplicationSecurityGroup {
    type Changes = ApplicationSecurityGroupChanges;

    const KIND: &'static str = "ApplicationSecurityGroup";
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

        let groups = cloud
            .application_security_groups()
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
            .map(|g| Self {
                name: g.name,
                resource_group: Some(resource_group.to_string()),
                tags: g.tags,
                id: g.id,
            }))
    }

    fn diff(actual: &Self, desired: &Self) -> ApplicationSecurityGroupChanges {
        ApplicationSecurityGroupChanges {
            name: changed_name(actual.name.as_deref(), desired.name.as_deref()),
            tags: changed_tags(&actual.tags, &desired.tags),
        }
    }

    async fn render(
        cloud: &dyn AzureCloud,
        actual: Option<&Self>,
        desired: &Self,
        _changes: &ApplicationSecurityGroupChanges,
    ) -> Result<(), ApplyError> {
        let name = require_name(Self::KIND, desired.name.as_deref())?;
        let resource_group = cloud.resource_group(desired.resource_group.as_deref());

        let group = types::ApplicationSecurityGroup {
            location: Some(cloud.region().to_string()),
            tags: merge_tags(actual.map(|a| &a.tags), &desired.tags),
            ..types::ApplicationSecurityGroup::default()
        };

        cloud
            .application_security_groups()
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
