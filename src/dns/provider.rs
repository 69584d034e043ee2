// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! DNS provider registry.
//!
//! Callers ask for a provider by name; only [`DNS_PROVIDER_NAME`] (`"azure-dns"`) is known.

use super::private::PrivateDnsBackend;
use super::public::PublicDnsBackend;
use super::zones::Zones;
use crate::arm::credential::TokenCredential;
use crate::arm::ArmClient;
use crate::config::CloudConfig;
use crate::constants::DNS_PROVIDER_NAME;
use crate::errors::ProviderError;
use std::sync::Arc;
use tracing::{error, info};

/// Handle to the Azure DNS services of one resource group.
#[derive(Debug, Clone)]
pub struct DnsProvider {
    zones: Zones,
}

impl DnsProvider {
    /// Provider backed by the public and private ARM adapters.
    #[must_use]
    pub fn from_arm(arm: &ArmClient, resource_group: &str) -> Self {
        Self::from_zones(Zones::new(
            resource_group,
            Arc::new(PublicDnsBackend::new(arm.clone())),
            Arc::new(PrivateDnsBackend::new(arm.clone())),
        ))
    }

    #[must_use]
    pub fn from_zones(zones: Zones) -> Self {
        Self { zones }
    }

    #[must_use]
    pub fn zones(&self) -> &Zones {
        &self.zones
    }
}

/// Construct the provider registered as `name`.
///
/// A token is fetched up front so that missing credentials fail here, once, instead of on
/// the first record set call.
///
/// # Errors
///
/// - [`ProviderError::UnknownProvider`] for any name other than `"azure-dns"`
/// - [`ProviderError::Credentials`] when no token can be obtained; callers should treat this
///   as fatal
/// - [`ProviderError::Client`] when the ARM client cannot be built
pub async fn get_dns_provider(
    name: &str,
    config: &CloudConfig,
    credential: Arc<dyn TokenCredential>,
) -> Result<DnsProvider, ProviderError> {
    if name != DNS_PROVIDER_NAME {
        return Err(ProviderError::UnknownProvider(name.to_string()));
    }

    credential.token().await.map_err(|e| {
        error!(provider = %name, error = %e, "Could not obtain Azure credentials");
        ProviderError::Credentials(e)
    })?;

    let arm = ArmClient::new(config, credential).map_err(ProviderError::Client)?;
    info!(
        provider = %name,
        resource_group = %config.resource_group,
        "DNS provider ready"
    );
    Ok(DnsProvider::from_arm(&arm, &config.resource_group))
}
