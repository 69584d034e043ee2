// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for armsync.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Azure Resource Manager
// ============================================================================

/// Default Azure Resource Manager endpoint (public cloud)
pub const DEFAULT_ARM_ENDPOINT: &str = "https://management.azure.com";

/// API version for the public DNS service (`Microsoft.Network/dnsZones`)
pub const PUBLIC_DNS_API_VERSION: &str = "2018-05-01";

/// API version for the private DNS service (`Microsoft.Network/privateDnsZones`)
pub const PRIVATE_DNS_API_VERSION: &str = "2020-06-01";

/// API version for network security groups, rules and application security groups
pub const NETWORK_API_VERSION: &str = "2023-09-01";

/// Resource provider namespace for all resources managed here
pub const NETWORK_PROVIDER: &str = "Microsoft.Network";

/// DNS zones (public and private) are global resources
pub const DNS_ZONE_LOCATION: &str = "global";

/// Header carrying the long-running operation status URL
pub const HEADER_ASYNC_OPERATION: &str = "Azure-AsyncOperation";

/// Header suggesting how long to wait between long-running operation polls
pub const HEADER_RETRY_AFTER: &str = "Retry-After";

/// Default delay between long-running operation polls (milliseconds)
pub const DEFAULT_POLL_INTERVAL_MILLIS: u64 = 2_000;

// ============================================================================
// DNS
// ============================================================================

/// Name the DNS provider is registered under
pub const DNS_PROVIDER_NAME: &str = "azure-dns";

/// Default TTL for DNS record sets (5 minutes)
pub const DEFAULT_DNS_RECORD_TTL_SECS: i64 = 300;

/// Relative name Azure uses for the zone apex
pub const APEX_RELATIVE_NAME: &str = "@";

// ============================================================================
// Tags
// ============================================================================

/// Tag carrying the cluster name on every resource we render
pub const TAG_KUBERNETES_CLUSTER: &str = "KubernetesCluster";

// ============================================================================
// Environment
// ============================================================================

/// Subscription the resources live in
pub const ENV_SUBSCRIPTION_ID: &str = "AZURE_SUBSCRIPTION_ID";

/// Resource group the resources live in
pub const ENV_RESOURCE_GROUP: &str = "AZURE_RESOURCEGROUP_NAME";

/// Region regional resources are created in
pub const ENV_LOCATION: &str = "AZURE_LOCATION";

/// Optional override of the ARM endpoint (sovereign clouds, tests)
pub const ENV_ARM_ENDPOINT: &str = "AZURE_RESOURCE_MANAGER_ENDPOINT";

/// Optional cluster name used for the cluster tag
pub const ENV_CLUSTER_NAME: &str = "ARMSYNC_CLUSTER_NAME";

/// Optional long-running operation poll interval override
pub const ENV_POLL_INTERVAL_MS: &str = "ARMSYNC_POLL_INTERVAL_MS";

/// Optional extra cluster tags, `key=value` pairs separated by commas
pub const ENV_EXTRA_TAGS: &str = "ARMSYNC_EXTRA_TAGS";

/// Bearer token used by the command-line executor
pub const ENV_ACCESS_TOKEN: &str = "AZURE_ACCESS_TOKEN";
