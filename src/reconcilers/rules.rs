// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Security rule model shared by [`super::NetworkSecurityGroup`] and
//! [`super::SecurityGroupRule`].
//!
//! Desired rules reference application security groups by name when the group lives in the
//! rule's own resource group, and by full ARM resource ID otherwise. Names are resolved to IDs
//! only when a rule is converted to its wire form; IDs read back from ARM collapse to names
//! only when they point into that same resource group.

use super::{changed, changed_list, changed_name, push_if_some, FieldChanges};
use crate::arm::ids::{name_from_id, ApplicationSecurityGroupId};
use crate::arm::types::{SecurityRule, SecurityRuleProperties, SubResource};
use serde::{Deserialize, Serialize};

/// Rule protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleProtocol {
    Tcp,
    Udp,
    Icmp,
    Esp,
    Ah,
    #[serde(rename = "*")]
    Any,
}

impl RuleProtocol {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RuleProtocol::Tcp => "Tcp",
            RuleProtocol::Udp => "Udp",
            RuleProtocol::Icmp => "Icmp",
            RuleProtocol::Esp => "Esp",
            RuleProtocol::Ah => "Ah",
            RuleProtocol::Any => "*",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        [
            RuleProtocol::Tcp,
            RuleProtocol::Udp,
            RuleProtocol::Icmp,
            RuleProtocol::Esp,
            RuleProtocol::Ah,
            RuleProtocol::Any,
        ]
        .into_iter()
        .find(|p| p.as_str().eq_ignore_ascii_case(value))
    }
}

/// Whether matching traffic is let through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleAccess {
    Allow,
    Deny,
}

impl RuleAccess {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RuleAccess::Allow => "Allow",
            RuleAccess::Deny => "Deny",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        [RuleAccess::Allow, RuleAccess::Deny]
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(value))
    }
}

const DIRECTION_INBOUND: &str = "Inbound";
const DIRECTION_OUTBOUND: &str = "Outbound";

/// Application security group references are names unless they already are resource IDs.
fn is_resource_id(reference: &str) -> bool {
    reference.starts_with('/')
}

/// Desired or discovered security rule.
///
/// Every field is optional; only specified fields are compared against the actual rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<RuleProtocol>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<RuleAccess>,
    /// `true` for outbound rules, `false` for inbound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub egress: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_port_range: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_port_ranges: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_port_range: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub destination_port_ranges: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_address_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_address_prefixes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_address_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub destination_address_prefixes: Vec<String>,
    /// Application security groups matched as source: names in the rule's resource group,
    /// or full resource IDs for groups elsewhere
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_application_security_groups: Vec<String>,
    /// Application security groups matched as destination, referenced like the source ones
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub destination_application_security_groups: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RuleSpec {
    /// A rule named `name` with nothing else specified.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Wire form; application security group names become IDs in `resource_group`, IDs are
    /// sent as given.
    #[must_use]
    pub fn to_wire(&self, subscription_id: &str, resource_group: &str) -> SecurityRule {
        let asg_refs = |references: &[String]| -> Vec<SubResource> {
            references
                .iter()
                .map(|reference| {
                    if is_resource_id(reference) {
                        SubResource::new(reference.clone())
                    } else {
                        SubResource::new(
                            asg_id(subscription_id, resource_group, reference).to_string(),
                        )
                    }
                })
                .collect()
        };

        SecurityRule {
            id: None,
            name: self.name.clone(),
            properties: Some(SecurityRuleProperties {
                description: self.description.clone(),
                protocol: self.protocol.map(|p| p.as_str().to_string()),
                priority: self.priority,
                access: self.access.map(|a| a.as_str().to_string()),
                direction: self.egress.map(|egress| {
                    if egress {
                        DIRECTION_OUTBOUND.to_string()
                    } else {
                        DIRECTION_INBOUND.to_string()
                    }
                }),
                source_port_range: self.source_port_range.clone(),
                source_port_ranges: self.source_port_ranges.clone(),
                destination_port_range: self.destination_port_range.clone(),
                destination_port_ranges: self.destination_port_ranges.clone(),
                source_address_prefix: self.source_address_prefix.clone(),
                source_address_prefixes: self.source_address_prefixes.clone(),
                destination_address_prefix: self.destination_address_prefix.clone(),
                destination_address_prefixes: self.destination_address_prefixes.clone(),
                source_application_security_groups: asg_refs(
                    &self.source_application_security_groups,
                ),
                destination_application_security_groups: asg_refs(
                    &self.destination_application_security_groups,
                ),
                other: serde_json::Map::new(),
            }),
        }
    }

    /// Rule as read back from ARM. Application security groups in `resource_group` are read
    /// back as names, any other group keeps its full ID.
    #[must_use]
    pub fn from_wire(rule: &SecurityRule, subscription_id: &str, resource_group: &str) -> Self {
        let props = rule.properties.clone().unwrap_or_default();
        let asg_names = |refs: &[SubResource]| -> Vec<String> {
            refs.iter()
                .filter_map(|r| r.id.as_deref())
                .map(|id| local_asg_name(id, subscription_id, resource_group).unwrap_or(id))
                .map(str::to_string)
                .collect()
        };

        Self {
            name: rule.name.clone(),
            priority: props.priority,
            protocol: props.protocol.as_deref().and_then(RuleProtocol::parse),
            access: props.access.as_deref().and_then(RuleAccess::parse),
            egress: props
                .direction
                .as_deref()
                .map(|d| d.eq_ignore_ascii_case(DIRECTION_OUTBOUND)),
            source_port_range: props.source_port_range,
            source_port_ranges: props.source_port_ranges,
            destination_port_range: props.destination_port_range,
            destination_port_ranges: props.destination_port_ranges,
            source_address_prefix: props.source_address_prefix,
            source_address_prefixes: props.source_address_prefixes,
            destination_address_prefix: props.destination_address_prefix,
            destination_address_prefixes: props.destination_address_prefixes,
            source_application_security_groups: asg_names(
                &props.source_application_security_groups,
            ),
            destination_application_security_groups: asg_names(
                &props.destination_application_security_groups,
            ),
            description: props.description,
        }
    }

    /// Fields `desired` specifies that differ from `actual`.
    #[must_use]
    pub fn diff(actual: &Self, desired: &Self) -> RuleChanges {
        RuleChanges {
            name: changed_name(actual.name.as_deref(), desired.name.as_deref()),
            priority: changed(&actual.priority, &desired.priority),
            protocol: changed(&actual.protocol, &desired.protocol),
            access: changed(&actual.access, &desired.access),
            egress: changed(&actual.egress, &desired.egress),
            source_port_range: changed(&actual.source_port_range, &desired.source_port_range),
            source_port_ranges: changed_list(
                &actual.source_port_ranges,
                &desired.source_port_ranges,
            ),
            destination_port_range: changed(
                &actual.destination_port_range,
                &desired.destination_port_range,
            ),
            destination_port_ranges: changed_list(
                &actual.destination_port_ranges,
                &desired.destination_port_ranges,
            ),
            source_address_prefix: changed(
                &actual.source_address_prefix,
                &desired.source_address_prefix,
            ),
            source_address_prefixes: changed_list(
                &actual.source_address_prefixes,
                &desired.source_address_prefixes,
            ),
            destination_address_prefix: changed(
                &actual.destination_address_prefix,
                &desired.destination_address_prefix,
            ),
            destination_address_prefixes: changed_list(
                &actual.destination_address_prefixes,
                &desired.destination_address_prefixes,
            ),
            source_application_security_groups: changed_list(
                &actual.source_application_security_groups,
                &desired.source_application_security_groups,
            ),
            destination_application_security_groups: changed_list(
                &actual.destination_application_security_groups,
                &desired.destination_application_security_groups,
            ),
            description: changed(&actual.description, &desired.description),
        }
    }
}

fn asg_id(subscription_id: &str, resource_group: &str, name: &str) -> ApplicationSecurityGroupId {
    ApplicationSecurityGroupId {
        subscription_id: subscription_id.to_string(),
        resource_group_name: resource_group.to_string(),
        application_security_group_name: name.to_string(),
    }
}

/// Name of the group `id` points at, when it lives in `resource_group` of `subscription_id`.
fn local_asg_name<'a>(id: &'a str, subscription_id: &str, resource_group: &str) -> Option<&'a str> {
    let name = name_from_id(id)?;
    asg_id(subscription_id, resource_group, name)
        .to_string()
        .eq_ignore_ascii_case(id.trim_end_matches('/'))
        .then_some(name)
}

/// Changed fields of a [`RuleSpec`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleChanges {
    pub name: Option<String>,
    pub priority: Option<i32>,
    pub protocol: Option<RuleProtocol>,
    pub access: Option<RuleAccess>,
    pub egress: Option<bool>,
    pub source_port_range: Option<String>,
    pub source_port_ranges: Option<Vec<String>>,
    pub destination_port_range: Option<String>,
    pub destination_port_ranges: Option<Vec<String>>,
    pub source_address_prefix: Option<String>,
    pub source_address_prefixes: Option<Vec<String>>,
    pub destination_address_prefix: Option<String>,
    pub destination_address_prefixes: Option<Vec<String>>,
    pub source_application_security_groups: Option<Vec<String>>,
    pub destination_application_security_groups: Option<Vec<String>>,
    pub description: Option<String>,
}

impl FieldChanges for RuleChanges {
    fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        push_if_some(&mut fields, "Name", &self.name);
        push_if_some(&mut fields, "Priority", &self.priority);
        push_if_some(&mut fields, "Protocol", &self.protocol);
        push_if_some(&mut fields, "Access", &self.access);
        push_if_some(&mut fields, "Egress", &self.egress);
        push_if_some(&mut fields, "SourcePortRange", &self.source_port_range);
        push_if_some(&mut fields, "SourcePortRanges", &self.source_port_ranges);
        push_if_some(&mut fields, "DestinationPortRange", &self.destination_port_range);
        push_if_some(&mut fields, "DestinationPortRanges", &self.destination_port_ranges);
        push_if_some(&mut fields, "SourceAddressPrefix", &self.source_address_prefix);
        push_if_some(&mut fields, "SourceAddressPrefixes", &self.source_address_prefixes);
        push_if_some(
            &mut fields,
            "DestinationAddressPrefix",
            &self.destination_address_prefix,
        );
        push_if_some(
            &mut fields,
            "DestinationAddressPrefixes",
            &self.destination_address_prefixes,
        );
        push_if_some(
            &mut fields,
            "SourceApplicationSecurityGroups",
            &self.source_application_security_groups,
        );
        push_if_some(
            &mut fields,
            "DestinationApplicationSecurityGroups",
            &self.destination_application_security_groups,
        );
        push_if_some(&mut fields, "Description", &self.description);
        fields
    }
}
