// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Network security group, security rule and application security group clients.
//!
//! Each client is a trait so reconcilers can be exercised against in-memory fakes; the
//! `Arm*` structs are the REST implementations.

use super::types::{ApplicationSecurityGroup, SecurityGroup, SecurityRule};
use super::ArmClient;
use crate::constants::NETWORK_API_VERSION;
use crate::errors::BackendError;
use async_trait::async_trait;

/// CRUD for `Microsoft.Network/networkSecurityGroups`.
#[async_trait]
pub trait NetworkSecurityGroupClient: Send + Sync {
    /// Create or replace a network security group, waiting for completion.
    async fn create_or_update(
        &self,
        resource_group: &str,
        name: &str,
        group: &SecurityGroup,
    ) -> Result<SecurityGroup, BackendError>;

    /// All network security groups of the resource group.
    async fn list(&self, resource_group: &str) -> Result<Vec<SecurityGroup>, BackendError>;

    /// Delete a network security group, waiting for completion.
    async fn delete(&self, resource_group: &str, name: &str) -> Result<(), BackendError>;
}

/// CRUD for `Microsoft.Network/applicationSecurityGroups`.
#[async_trait]
pub trait ApplicationSecurityGroupClient: Send + Sync {
    async fn create_or_update(
        &self,
        resource_group: &str,
        name: &str,
        group: &ApplicationSecurityGroup,
    ) -> Result<ApplicationSecurityGroup, BackendError>;

    async fn list(
        &self,
        resource_group: &str,
    ) -> Result<Vec<ApplicationSecurityGroup>, BackendError>;

    async fn delete(&self, resource_group: &str, name: &str) -> Result<(), BackendError>;
}

/// CRUD for the `securityRules` children of a network security group.
#[async_trait]
pub trait SecurityRulesClient: Send + Sync {
    async fn create_or_update(
        &self,
        resource_group: &str,
        network_security_group: &str,
        name: &str,
        rule: &SecurityRule,
    ) -> Result<SecurityRule, BackendError>;

    async fn list(
        &self,
        resource_group: &str,
        network_security_group: &str,
    ) -> Result<Vec<SecurityRule>, BackendError>;

    async fn delete(
        &self,
        resource_group: &str,
        network_security_group: &str,
        name: &str,
    ) -> Result<(), BackendError>;
}

/// REST implementation of [`NetworkSecurityGroupClient`].
#[derive(Debug, Clone)]
pub struct ArmNetworkSecurityGroupClient {
    arm: ArmClient,
}

impl ArmNetworkSecurityGroupClient {
    #[must_use]
    pub fn new(arm: ArmClient) -> Self {
        Self { arm }
    }
}

#[async_trait]
impl NetworkSecurityGroupClient for ArmNetworkSecurityGroupClient {
    async fn create_or_update(
        &self,
        resource_group: &str,
        name: &str,
        group: &SecurityGroup,
    ) -> Result<SecurityGroup, BackendError> {
        let url = self.arm.resource_url(
            resource_group,
            &["networkSecurityGroups", name],
            NETWORK_API_VERSION,
        )?;
        self.arm
            .put_json("CreateOrUpdateNetworkSecurityGroup", name, url, group)
            .await
    }

    async fn list(&self, resource_group: &str) -> Result<Vec<SecurityGroup>, BackendError> {
        let url = self.arm.resource_url(
            resource_group,
            &["networkSecurityGroups"],
            NETWORK_API_VERSION,
        )?;
        self.arm
            .list_all("ListNetworkSecurityGroups", resource_group, url)
            .await
    }

    async fn delete(&self, resource_group: &str, name: &str) -> Result<(), BackendError> {
        let url = self.arm.resource_url(
            resource_group,
            &["networkSecurityGroups", name],
            NETWORK_API_VERSION,
        )?;
        self.arm
            .delete("DeleteNetworkSecurityGroup", name, url)
            .await
    }
}

/// REST implementation of [`ApplicationSecurityGroupClient`].
#[derive(Debug, Clone)]
pub struct ArmApplicationSecurityGroupClient {
    arm: ArmClient,
}

impl ArmApplicationSecurityGroupClient {
    #[must_use]
    pub fn new(arm: ArmClient) -> Self {
        Self { arm }
    }
}

#[async_trait]
impl ApplicationSecurityGroupClient for ArmApplicationSecurityGroupClient {
    async fn create_or_update(
        &self,
        resource_group: &str,
        name: &str,
        group: &ApplicationSecurityGroup,
    ) -> Result<ApplicationSecurityGroup, BackendError> {
        let url = self.arm.resource_url(
            resource_group,
            &["applicationSecurityGroups", name],
            NETWORK_API_VERSION,
        )?;
        self.arm
            .put_json("CreateOrUpdateApplicationSecurityGroup", name, url, group)
            .await
    }

    async fn list(
        &self,
        resource_group: &str,
    ) -> Result<Vec<ApplicationSecurityGroup>, BackendError> {
        let url = self.arm.resource_url(
            resource_group,
            &["applicationSecurityGroups"],
            NETWORK_API_VERSION,
        )?;
        self.arm
            .list_all("ListApplicationSecurityGroups", resource_group, url)
            .await
    }

    async fn delete(&self, resource_group: &str, name: &str) -> Result<(), BackendError> {
        let url = self.arm.resource_url(
            resource_group,
            &["applicationSecurityGroups", name],
            NETWORK_API_VERSION,
        )?;
        self.arm
            .delete("DeleteApplicationSecurityGroup", name, url)
            .await
    }
}

/// REST implementation of [`SecurityRulesClient`].
#[derive(Debug, Clone)]
pub struct ArmSecurityRulesClient {
    arm: ArmClient,
}

impl ArmSecurityRulesClient {
    #[must_use]
    pub fn new(arm: ArmClient) -> Self {
        Self { arm }
    }
}

#[async_trait]
impl SecurityRulesClient for ArmSecurityRulesClient {
    async fn create_or_update(
        &self,
        resource_group: &str,
        network_security_group: &str,
        name: &str,
        rule: &SecurityRule,
    ) -> Result<SecurityRule, BackendError> {
        let url = self.arm.resource_url(
            resource_group,
            &["networkSecurityGroups", network_security_group, "securityRules", name],
            NETWORK_API_VERSION,
        )?;
        let resource = format!("{network_security_group}/{name}");
        self.arm
            .put_json("CreateOrUpdateSecurityRule", &resource, url, rule)
            .await
    }

    async fn list(
        &self,
        resource_group: &str,
        network_security_group: &str,
    ) -> Result<Vec<SecurityRule>, BackendError> {
        let url = self.arm.resource_url(
            resource_group,
            &["networkSecurityGroups", network_security_group, "securityRules"],
            NETWORK_API_VERSION,
        )?;
        self.arm
            .list_all("ListSecurityRules", network_security_group, url)
            .await
    }

    async fn delete(
        &self,
        resource_group: &str,
        network_security_group: &str,
        name: &str,
    ) -> Result<(), BackendError> {
        let url = self.arm.resource_url(
            resource_group,
            &["networkSecurityGroups", network_security_group, "securityRules", name],
            NETWORK_API_VERSION,
        )?;
        let resource = format!("{network_security_group}/{name}");
        self.arm.delete("DeleteSecurityRule", &resource, url).await
    }
}

#[cfg(test)]
#[path = "network_tests.rs"]
mod network_tests;
