// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! ARM resource ID builders.
//!
//! Resources reference each other by ID on the wire but by name in desired state; these
//! helpers convert between the two.

use crate::constants::NETWORK_PROVIDER;
use std::fmt;

/// ID of an application security group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationSecurityGroupId {
    pub subscription_id: String,
    pub resource_group_name: String,
    pub application_security_group_name: String,
}

impl fmt::Display for ApplicationSecurityGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/subscriptions/{}/resourceGroups/{}/providers/{}/applicationSecurityGroups/{}",
            self.subscription_id,
            self.resource_group_name,
            NETWORK_PROVIDER,
            self.application_security_group_name
        )
    }
}

/// ID of a virtual network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualNetworkId {
    pub subscription_id: String,
    pub resource_group_name: String,
    pub virtual_network_name: String,
}

impl fmt::Display for VirtualNetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/subscriptions/{}/resourceGroups/{}/providers/{}/virtualNetworks/{}",
            self.subscription_id, self.resource_group_name, NETWORK_PROVIDER, self.virtual_network_name
        )
    }
}

/// Last path segment of a resource ID, i.e. the resource's own name.
#[must_use]
pub fn name_from_id(id: &str) -> Option<&str> {
    id.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_security_group_id() {
        let id = ApplicationSecurityGroupId {
            subscription_id: "sub".to_string(),
            resource_group_name: "rg".to_string(),
            application_security_group_name: "masters".to_string(),
        };
        assert_eq!(
            id.to_string(),
            "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Network/applicationSecurityGroups/masters"
        );
    }

    #[test]
    fn test_virtual_network_id() {
        let id = VirtualNetworkId {
            subscription_id: "sub".to_string(),
            resource_group_name: "rg".to_string(),
            virtual_network_name: "cluster-vnet".to_string(),
        };
        assert_eq!(name_from_id(&id.to_string()), Some("cluster-vnet"));
    }

    #[test]
    fn test_name_from_id_edge_cases() {
        assert_eq!(name_from_id("/a/b/c/"), Some("c"));
        assert_eq!(name_from_id("plain"), Some("plain"));
        assert_eq!(name_from_id(""), None);
        assert_eq!(name_from_id("/"), None);
    }
}
