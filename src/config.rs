// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Cloud configuration.
//!
//! A single [`CloudConfig`] value is built once (normally from the environment) and passed
//! into every constructor. Nothing below this module reads the environment.

use crate::constants::{
    DEFAULT_ARM_ENDPOINT, DEFAULT_POLL_INTERVAL_MILLIS, ENV_ARM_ENDPOINT, ENV_CLUSTER_NAME,
    ENV_EXTRA_TAGS, ENV_LOCATION, ENV_POLL_INTERVAL_MS, ENV_RESOURCE_GROUP, ENV_SUBSCRIPTION_ID,
};
use crate::errors::ConfigError;
use crate::tags::{cluster_tags, Tags};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where and how resources are reconciled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudConfig {
    /// Azure subscription ID
    pub subscription_id: String,

    /// Default resource group for resources that do not name one
    pub resource_group: String,

    /// Region regional resources (security groups) are created in
    pub region: String,

    /// Azure Resource Manager endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Cluster name written to the `KubernetesCluster` tag
    #[serde(default)]
    pub cluster_name: Option<String>,

    /// Additional tags added to every rendered resource
    #[serde(default)]
    pub extra_tags: Tags,

    /// Delay between long-running operation polls when ARM sends no `Retry-After`
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ARM_ENDPOINT.to_string()
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MILLIS
}

/// `key=value[,key=value...]`; blank entries are skipped, values may contain `=`.
fn parse_extra_tags(raw: &str) -> Result<Tags, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.trim().to_string()))
            }
            _ => Err(ConfigError::InvalidVar {
                name: ENV_EXTRA_TAGS,
                value: raw.to_string(),
                reason: format!("'{entry}' is not a key=value pair"),
            }),
        })
        .collect()
}

impl CloudConfig {
    /// Create a configuration with defaults for everything but the required values.
    #[must_use]
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group: resource_group.into(),
            region: region.into(),
            endpoint: default_endpoint(),
            cluster_name: None,
            extra_tags: Tags::new(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }

    /// Load the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVar`] when a required variable is unset or empty and
    /// [`ConfigError::InvalidVar`] when the poll interval is not a number or an extra tag is
    /// not a `key=value` pair.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load the configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`CloudConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingVar(name))
        };

        let mut config = Self::new(
            required(ENV_SUBSCRIPTION_ID)?,
            required(ENV_RESOURCE_GROUP)?,
            required(ENV_LOCATION)?,
        );

        if let Some(endpoint) = lookup(ENV_ARM_ENDPOINT).filter(|v| !v.is_empty()) {
            config.endpoint = endpoint;
        }
        config.cluster_name = lookup(ENV_CLUSTER_NAME).filter(|v| !v.is_empty());

        if let Some(raw) = lookup(ENV_POLL_INTERVAL_MS).filter(|v| !v.is_empty()) {
            config.poll_interval_ms =
                raw.trim()
                    .parse()
                    .map_err(|e: std::num::ParseIntError| ConfigError::InvalidVar {
                        name: ENV_POLL_INTERVAL_MS,
                        value: raw.clone(),
                        reason: e.to_string(),
                    })?;
        }

        if let Some(raw) = lookup(ENV_EXTRA_TAGS).filter(|v| !v.trim().is_empty()) {
            config.extra_tags = parse_extra_tags(&raw)?;
        }

        Ok(config)
    }

    /// Tags merged into every resource rendered for this cluster.
    #[must_use]
    pub fn cluster_tags(&self) -> Tags {
        cluster_tags(self.cluster_name.as_deref(), &self.extra_tags)
    }

    /// Delay between long-running operation polls.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
