// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Shared cloud context for every reconciler.
//!
//! Reconcilers receive a `&dyn AzureCloud` that provides:
//! - the [`CloudConfig`] (subscription, default resource group, region, cluster tags)
//! - the DNS provider (public and private zones)
//! - the network security group, application security group and security rule clients
//!
//! [`ArmCloud`] wires these to Azure Resource Manager; tests substitute in-memory fakes.

use crate::arm::credential::TokenCredential;
use crate::arm::network::{
    ApplicationSecurityGroupClient, ArmApplicationSecurityGroupClient,
    ArmNetworkSecurityGroupClient, ArmSecurityRulesClient, NetworkSecurityGroupClient,
    SecurityRulesClient,
};
use crate::arm::ArmClient;
use crate::config::CloudConfig;
use crate::dns::{DnsProvider, Zones};
use crate::errors::BackendError;
use crate::tags::{add_tags, Tags};
use std::sync::Arc;

/// Everything a reconciler needs to talk to the cloud.
pub trait AzureCloud: Send + Sync {
    fn config(&self) -> &CloudConfig;

    fn dns(&self) -> &DnsProvider;

    fn network_security_groups(&self) -> &dyn NetworkSecurityGroupClient;

    fn application_security_groups(&self) -> &dyn ApplicationSecurityGroupClient;

    fn security_rules(&self) -> &dyn SecurityRulesClient;

    fn subscription_id(&self) -> &str {
        &self.config().subscription_id
    }

    fn region(&self) -> &str {
        &self.config().region
    }

    /// `resource_group`, or the configured default when `None`.
    fn resource_group<'a>(&'a self, resource_group: Option<&'a str>) -> &'a str {
        resource_group.unwrap_or(self.config().resource_group.as_str())
    }

    /// DNS zones of `resource_group` (or the default resource group).
    fn zones(&self, resource_group: Option<&str>) -> Zones {
        let zones = self.dns().zones();
        match resource_group {
            Some(rg) if rg != zones.resource_group() => zones.in_resource_group(rg),
            _ => zones.clone(),
        }
    }

    /// Merge the cluster tags into `tags`, overwriting equal keys.
    fn add_cluster_tags(&self, tags: &mut Tags) {
        add_tags(tags, &self.config().cluster_tags());
    }
}

/// [`AzureCloud`] backed by Azure Resource Manager.
#[derive(Debug, Clone)]
pub struct ArmCloud {
    config: CloudConfig,
    dns: DnsProvider,
    network_security_groups: ArmNetworkSecurityGroupClient,
    application_security_groups: ArmApplicationSecurityGroupClient,
    security_rules: ArmSecurityRulesClient,
}

impl ArmCloud {
    /// Build every client from one shared [`ArmClient`].
    ///
    /// # Errors
    ///
    /// Returns an error if the ARM endpoint is invalid or the HTTP client cannot be built.
    pub fn new(
        config: CloudConfig,
        credential: Arc<dyn TokenCredential>,
    ) -> Result<Self, BackendError> {
        let arm = ArmClient::new(&config, credential)?;
        Ok(Self {
            dns: DnsProvider::from_arm(&arm, &config.resource_group),
            network_security_groups: ArmNetworkSecurityGroupClient::new(arm.clone()),
            application_security_groups: ArmApplicationSecurityGroupClient::new(arm.clone()),
            security_rules: ArmSecurityRulesClient::new(arm),
            config,
        })
    }
}

impl AzureCloud for ArmCloud {
    fn config(&self) -> &CloudConfig {
        &self.config
    }

    fn dns(&self) -> &DnsProvider {
        &self.dns
    }

    fn network_security_groups(&self) -> &dyn NetworkSecurityGroupClient {
        &self.network_security_groups
    }

    fn application_security_groups(&self) -> &dyn ApplicationSecurityGroupClient {
        &self.application_security_groups
    }

    fn security_rules(&self) -> &dyn SecurityRulesClient {
        &self.security_rules
    }
}

#[cfg(test)]
#[path = "cloud_tests.rs"]
mod cloud_tests;
