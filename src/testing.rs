// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! In-memory fakes shared by unit tests.
//!
//! [`FakeDnsBackend`] and [`FakeNetwork`] keep resources in memory, record every call in
//! order and can be told to fail specific calls. [`FakeCloud`] wires them into an
//! [`AzureCloud`].

use crate::arm::network::{
    ApplicationSecurityGroupClient, NetworkSecurityGroupClient, SecurityRulesClient,
};
use crate::arm::types::{ApplicationSecurityGroup, SecurityGroup, SecurityRule};
use crate::cloud::AzureCloud;
use crate::config::CloudConfig;
use crate::dns::backend::DnsBackend;
use crate::dns::{DnsProvider, ResourceRecordSet, RrsType, ZoneInfo, ZoneKind, Zones};
use crate::errors::BackendError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DnsCall {
    CreateOrUpdate {
        zone: String,
        relative_name: String,
        rrs_type: String,
        ttl: i64,
        rrdatas: Vec<String>,
    },
    Delete {
        zone: String,
        relative_name: String,
        rrs_type: String,
    },
    List {
        zone: String,
    },
    ListZones,
    CreateOrUpdateZone {
        zone: String,
    },
    DeleteZone {
        zone: String,
    },
}

fn server_error(operation: &'static str, resource: &str) -> BackendError {
    BackendError::Api {
        operation,
        resource: resource.to_string(),
        status: 500,
        code: "InternalServerError".to_string(),
        message: "injected failure".to_string(),
    }
}

#[derive(Debug, Default)]
struct DnsState {
    calls: Vec<DnsCall>,
    /// (zone, relative name, type) -> record set
    records: BTreeMap<(String, String, String), ResourceRecordSet>,
    zones: Vec<ZoneInfo>,
    fail_relative_names: Vec<String>,
    fail_lists: bool,
}

/// Recording in-memory [`DnsBackend`].
#[derive(Debug)]
pub struct FakeDnsBackend {
    kind: ZoneKind,
    state: Mutex<DnsState>,
}

impl FakeDnsBackend {
    pub fn new(kind: ZoneKind) -> Self {
        Self {
            kind,
            state: Mutex::new(DnsState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, DnsState> {
        self.state.lock().unwrap()
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<DnsCall> {
        self.state().calls.clone()
    }

    /// Calls other than reads.
    pub fn mutations(&self) -> Vec<DnsCall> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, DnsCall::List { .. } | DnsCall::ListZones))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Make create-or-update and delete of `relative_name` (or of the zone of that name) fail
    /// with HTTP 500.
    pub fn fail_on(&self, relative_name: &str) {
        self.state().fail_relative_names.push(relative_name.to_string());
    }

    /// Make every list call fail with HTTP 500.
    pub fn fail_lists(&self) {
        self.state().fail_lists = true;
    }

    /// Seed an existing zone.
    pub fn insert_zone(&self, name: &str, tags: &[(&str, &str)]) {
        let mut info = ZoneInfo::new(name, self.kind);
        info.id = Some(format!("/fake/{}/{name}", self.kind));
        info.tags = tags
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        self.state().zones.push(info);
    }

    /// Seed an existing A record set.
    pub fn insert_record(&self, zone: &str, relative_name: &str, ttl: i64, rrdatas: &[&str]) {
        let fqdn = format!("{relative_name}.{zone}");
        let rrset = ResourceRecordSet::new(
            fqdn,
            rrdatas.iter().map(|s| (*s).to_string()).collect(),
            ttl,
            RrsType::A,
        );
        self.state().records.insert(
            (zone.to_string(), relative_name.to_string(), "A".to_string()),
            rrset,
        );
    }

    pub fn records(&self, zone: &str) -> Vec<ResourceRecordSet> {
        self.state()
            .records
            .iter()
            .filter(|((z, _, _), _)| z == zone)
            .map(|(_, r)| r.clone())
            .collect()
    }

    pub fn zone_infos(&self) -> Vec<ZoneInfo> {
        self.state().zones.clone()
    }
}

#[async_trait]
impl DnsBackend for FakeDnsBackend {
    fn kind(&self) -> ZoneKind {
        self.kind
    }

    async fn create_or_update(
        &self,
        _resource_group: &str,
        zone: &str,
        relative_name: &str,
        rrs_type: &RrsType,
        rrset: &ResourceRecordSet,
    ) -> Result<(), BackendError> {
        let mut state = self.state();
        state.calls.push(DnsCall::CreateOrUpdate {
            zone: zone.to_string(),
            relative_name: relative_name.to_string(),
            rrs_type: rrs_type.to_string(),
            ttl: rrset.ttl,
            rrdatas: rrset.rrdatas.clone(),
        });
        if state.fail_relative_names.iter().any(|n| n == relative_name) {
            return Err(server_error("CreateOrUpdateRecordSet", relative_name));
        }
        let stored = ResourceRecordSet::new(
            format!("{relative_name}.{zone}"),
            rrset.rrdatas.clone(),
            rrset.ttl,
            rrs_type.clone(),
        );
        state.records.insert(
            (zone.to_string(), relative_name.to_string(), rrs_type.to_string()),
            stored,
        );
        Ok(())
    }

    async fn list(
        &self,
        _resource_group: &str,
        zone: &str,
    ) -> Result<Vec<ResourceRecordSet>, BackendError> {
        let mut state = self.state();
        state.calls.push(DnsCall::List {
            zone: zone.to_string(),
        });
        if state.fail_lists {
            return Err(server_error("ListRecordSets", zone));
        }
        Ok(state
            .records
            .iter()
            .filter(|((z, _, _), _)| z == zone)
            .map(|(_, r)| r.clone())
            .collect())
    }

    async fn delete(
        &self,
        _resource_group: &str,
        zone: &str,
        relative_name: &str,
        rrs_type: &RrsType,
    ) -> Result<(), BackendError> {
        let mut state = self.state();
        state.calls.push(DnsCall::Delete {
            zone: zone.to_string(),
            relative_name: relative_name.to_string(),
            rrs_type: rrs_type.to_string(),
        });
        if state.fail_relative_names.iter().any(|n| n == relative_name) {
            return Err(server_error("DeleteRecordSet", relative_name));
        }
        let key = (zone.to_string(), relative_name.to_string(), rrs_type.to_string());
        match state.records.remove(&key) {
            Some(_) => Ok(()),
            None => Err(BackendError::NotFound {
                operation: "DeleteRecordSet",
                resource: format!("{zone}/{rrs_type}/{relative_name}"),
            }),
        }
    }

    async fn list_zones(&self, resource_group: &str) -> Result<Vec<ZoneInfo>, BackendError> {
        let mut state = self.state();
        state.calls.push(DnsCall::ListZones);
        if state.fail_lists {
            return Err(server_error("ListDnsZones", resource_group));
        }
        Ok(state.zones.clone())
    }

    async fn create_or_update_zone(
        &self,
        _resource_group: &str,
        zone: &ZoneInfo,
    ) -> Result<ZoneInfo, BackendError> {
        let mut state = self.state();
        state.calls.push(DnsCall::CreateOrUpdateZone {
            zone: zone.name.clone(),
        });
        if state.fail_relative_names.iter().any(|n| *n == zone.name) {
            return Err(server_error("CreateOrUpdateDnsZone", &zone.name));
        }
        let mut stored = zone.clone();
        stored.id = Some(format!("/fake/{}/{}", self.kind, zone.name));
        state.zones.retain(|z| z.name != zone.name);
        state.zones.push(stored.clone());
        Ok(stored)
    }

    async fn delete_zone(&self, _resource_group: &str, zone: &str) -> Result<(), BackendError> {
        let mut state = self.state();
        state.calls.push(DnsCall::DeleteZone {
            zone: zone.to_string(),
        });
        let before = state.zones.len();
        state.zones.retain(|z| z.name != zone);
        if state.zones.len() == before {
            return Err(BackendError::NotFound {
                operation: "DeleteDnsZone",
                resource: zone.to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct NetworkState {
    calls: Vec<String>,
    security_groups: Vec<SecurityGroup>,
    application_security_groups: Vec<ApplicationSecurityGroup>,
    /// network security group name -> rules
    rules: BTreeMap<String, Vec<SecurityRule>>,
    fail_writes: bool,
    fail_lists: bool,
}

/// In-memory network security group, application security group and security rule clients.
#[derive(Debug, Default)]
pub struct FakeNetwork {
    state: Mutex<NetworkState>,
}

impl FakeNetwork {
    fn state(&self) -> MutexGuard<'_, NetworkState> {
        self.state.lock().unwrap()
    }

    /// Calls in order, as `"Operation name"` strings.
    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    pub fn fail_writes(&self) {
        self.state().fail_writes = true;
    }

    pub fn fail_lists(&self) {
        self.state().fail_lists = true;
    }

    pub fn insert_security_group(&self, group: SecurityGroup) {
        self.state().security_groups.push(group);
    }

    pub fn insert_application_security_group(&self, group: ApplicationSecurityGroup) {
        self.state().application_security_groups.push(group);
    }

    pub fn insert_rule(&self, network_security_group: &str, rule: SecurityRule) {
        self.state()
            .rules
            .entry(network_security_group.to_string())
            .or_default()
            .push(rule);
    }

    pub fn security_groups(&self) -> Vec<SecurityGroup> {
        self.state().security_groups.clone()
    }

    pub fn application_security_groups(&self) -> Vec<ApplicationSecurityGroup> {
        self.state().application_security_groups.clone()
    }

    pub fn rules(&self, network_security_group: &str) -> Vec<SecurityRule> {
        self.state()
            .rules
            .get(network_security_group)
            .cloned()
            .unwrap_or_default()
    }
}

fn upsert_named<T: Clone>(items: &mut Vec<T>, name: &str, item: T, name_of: impl Fn(&T) -> Option<&str>) {
    items.retain(|existing| name_of(existing) != Some(name));
    items.push(item);
}

#[async_trait]
impl NetworkSecurityGroupClient for FakeNetwork {
    async fn create_or_update(
        &self,
        _resource_group: &str,
        name: &str,
        group: &SecurityGroup,
    ) -> Result<SecurityGroup, BackendError> {
        let mut state = self.state();
        state.calls.push(format!("CreateOrUpdateNetworkSecurityGroup {name}"));
        if state.fail_writes {
            return Err(server_error("CreateOrUpdateNetworkSecurityGroup", name));
        }
        let mut stored = group.clone();
        stored.name = Some(name.to_string());
        upsert_named(&mut state.security_groups, name, stored.clone(), |g| g.name.as_deref());
        Ok(stored)
    }

    async fn list(&self, resource_group: &str) -> Result<Vec<SecurityGroup>, BackendError> {
        let mut state = self.state();
        state.calls.push("ListNetworkSecurityGroups".to_string());
        if state.fail_lists {
            return Err(server_error("ListNetworkSecurityGroups", resource_group));
        }
        Ok(state.security_groups.clone())
    }

    async fn delete(&self, _resource_group: &str, name: &str) -> Result<(), BackendError> {
        let mut state = self.state();
        state.calls.push(format!("DeleteNetworkSecurityGroup {name}"));
        state.security_groups.retain(|g| g.name.as_deref() != Some(name));
        Ok(())
    }
}

#[async_trait]
impl ApplicationSecurityGroupClient for FakeNetwork {
    async fn create_or_update(
        &self,
        _resource_group: &str,
        name: &str,
        group: &ApplicationSecurityGroup,
    ) -> Result<ApplicationSecurityGroup, BackendError> {
        let mut state = self.state();
        state
            .calls
            .push(format!("CreateOrUpdateApplicationSecurityGroup {name}"));
        if state.fail_writes {
            return Err(server_error("CreateOrUpdateApplicationSecurityGroup", name));
        }
        let mut stored = group.clone();
        stored.name = Some(name.to_string());
        upsert_named(
            &mut state.application_security_groups,
            name,
            stored.clone(),
            |g| g.name.as_deref(),
        );
        Ok(stored)
    }

    async fn list(
        &self,
        resource_group: &str,
    ) -> Result<Vec<ApplicationSecurityGroup>, BackendError> {
        let mut state = self.state();
        state.calls.push("ListApplicationSecurityGroups".to_string());
        if state.fail_lists {
            return Err(server_error("ListApplicationSecurityGroups", resource_group));
        }
        Ok(state.application_security_groups.clone())
    }

    async fn delete(&self, _resource_group: &str, name: &str) -> Result<(), BackendError> {
        let mut state = self.state();
        state
            .calls
            .push(format!("DeleteApplicationSecurityGroup {name}"));
        state
            .application_security_groups
            .retain(|g| g.name.as_deref() != Some(name));
        Ok(())
    }
}

#[async_trait]
impl SecurityRulesClient for FakeNetwork {
    async fn create_or_update(
        &self,
        _resource_group: &str,
        network_security_group: &str,
        name: &str,
        rule: &SecurityRule,
    ) -> Result<SecurityRule, BackendError> {
        let mut state = self.state();
        state
            .calls
            .push(format!("CreateOrUpdateSecurityRule {network_security_group}/{name}"));
        if state.fail_writes {
            return Err(server_error("CreateOrUpdateSecurityRule", name));
        }
        let mut stored = rule.clone();
        stored.name = Some(name.to_string());
        let rules = state
            .rules
            .entry(network_security_group.to_string())
            .or_default();
        upsert_named(rules, name, stored.clone(), |r| r.name.as_deref());
        Ok(stored)
    }

    async fn list(
        &self,
        _resource_group: &str,
        network_security_group: &str,
    ) -> Result<Vec<SecurityRule>, BackendError> {
        let mut state = self.state();
        state
            .calls
            .push(format!("ListSecurityRules {network_security_group}"));
        if state.fail_lists {
            return Err(server_error("ListSecurityRules", network_security_group));
        }
        Ok(state
            .rules
            .get(network_security_group)
            .cloned()
            .unwrap_or_default())
    }

    async fn delete(
        &self,
        _resource_group: &str,
        network_security_group: &str,
        name: &str,
    ) -> Result<(), BackendError> {
        let mut state = self.state();
        state
            .calls
            .push(format!("DeleteSecurityRule {network_security_group}/{name}"));
        if let Some(rules) = state.rules.get_mut(network_security_group) {
            rules.retain(|r| r.name.as_deref() != Some(name));
        }
        Ok(())
    }
}

/// [`AzureCloud`] over the in-memory fakes.
pub struct FakeCloud {
    pub config: CloudConfig,
    pub public: Arc<FakeDnsBackend>,
    pub private: Arc<FakeDnsBackend>,
    pub network: FakeNetwork,
    dns: DnsProvider,
}

impl FakeCloud {
    pub fn new() -> Self {
        let mut config = CloudConfig::new("sub", "cluster-rg", "westeurope");
        config.cluster_name = Some("dev.example.com".to_string());
        Self::with_config(config)
    }

    pub fn with_config(config: CloudConfig) -> Self {
        let public = Arc::new(FakeDnsBackend::new(ZoneKind::Public));
        let private = Arc::new(FakeDnsBackend::new(ZoneKind::Private));
        let dns = DnsProvider::from_zones(Zones::new(
            config.resource_group.clone(),
            Arc::clone(&public) as Arc<dyn DnsBackend>,
            Arc::clone(&private) as Arc<dyn DnsBackend>,
        ));
        Self {
            config,
            public,
            private,
            network: FakeNetwork::default(),
            dns,
        }
    }

    /// The fake backend serving `kind`.
    pub fn backend(&self, kind: ZoneKind) -> &FakeDnsBackend {
        match kind {
            ZoneKind::Public => &self.public,
            ZoneKind::Private => &self.private,
        }
    }
}

impl AzureCloud for FakeCloud {
    fn config(&self) -> &CloudConfig {
        &self.config
    }

    fn dns(&self) -> &DnsProvider {
        &self.dns
    }

    fn network_security_groups(&self) -> &dyn NetworkSecurityGroupClient {
        &self.network
    }

    fn application_security_groups(&self) -> &dyn ApplicationSecurityGroupClient {
        &self.network
    }

    fn security_rules(&self) -> &dyn SecurityRulesClient {
        &self.network
    }
}

/// Tags from string pairs.
pub fn tags(pairs: &[(&str, &str)]) -> crate::tags::Tags {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}
