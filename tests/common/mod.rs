// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Shared helpers for integration tests.

#![allow(dead_code)]

use armsync::arm::credential::StaticTokenCredential;
use armsync::cloud::ArmCloud;
use armsync::config::CloudConfig;
use std::sync::Arc;
use wiremock::MockServer;

pub const SUBSCRIPTION: &str = "sub";
pub const RESOURCE_GROUP: &str = "cluster-rg";
pub const CLUSTER: &str = "dev.example.com";

/// Path prefix of every `Microsoft.Network` resource in the test resource group.
pub fn network_path(rest: &str) -> String {
    format!(
        "/subscriptions/{SUBSCRIPTION}/resourceGroups/{RESOURCE_GROUP}/providers/Microsoft.Network/{rest}"
    )
}

/// [`ArmCloud`] pointed at `server`, polling long-running operations every millisecond.
pub fn arm_cloud(server: &MockServer) -> ArmCloud {
    let mut config = CloudConfig::new(SUBSCRIPTION, RESOURCE_GROUP, "westeurope");
    config.endpoint = server.uri();
    config.cluster_name = Some(CLUSTER.to_string());
    config.poll_interval_ms = 1;
    ArmCloud::new(config, Arc::new(StaticTokenCredential::new("test-token")))
        .expect("valid test configuration")
}
