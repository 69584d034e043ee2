// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! DNS provider facade over Azure public and private DNS zones.
//!
//! The facade is a chain of handles:
//!
//! ```text
//! Zones ──list/get/new_zone──▶ Zone ──resource_record_sets()──▶ ResourceRecordSets
//!                                                                 │
//!                                                    start_changeset()
//!                                                                 ▼
//!                                                             Changeset ──apply()
//! ```
//!
//! A [`Zone`] is bound to exactly one [`DnsBackend`] when it is constructed, chosen by its
//! [`ZoneKind`]. Every type above the backends works on the uniform [`ResourceRecordSet`]
//! and never looks at the wire representation.

pub mod backend;
pub mod changeset;
pub mod naming;
pub mod private;
pub mod provider;
pub mod public;
pub mod rrsets;
pub mod zones;

pub use backend::DnsBackend;
pub use changeset::Changeset;
pub use naming::relative_name;
pub use provider::{get_dns_provider, DnsProvider};
pub use rrsets::ResourceRecordSets;
pub use zones::{Zone, Zones};

use crate::tags::Tags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which DNS service a zone lives in. Fixed for the lifetime of a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneKind {
    /// `Microsoft.Network/dnsZones`
    Public,
    /// `Microsoft.Network/privateDnsZones`
    Private,
}

impl ZoneKind {
    /// Kind selected by a `private` flag.
    #[must_use]
    pub fn from_private(private: bool) -> Self {
        if private {
            ZoneKind::Private
        } else {
            ZoneKind::Public
        }
    }

    #[must_use]
    pub fn is_private(self) -> bool {
        self == ZoneKind::Private
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ZoneKind::Public => "public",
            ZoneKind::Private => "private",
        }
    }
}

impl fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// DNS record type.
///
/// Only [`RrsType::A`] can be written; the other variants exist so listed record sets keep
/// their real type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RrsType {
    A,
    Aaaa,
    Caa,
    Cname,
    Mx,
    Ns,
    Ptr,
    Soa,
    Srv,
    Txt,
    Other(String),
}

impl RrsType {
    /// Path segment used by ARM for this type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            RrsType::A => "A",
            RrsType::Aaaa => "AAAA",
            RrsType::Caa => "CAA",
            RrsType::Cname => "CNAME",
            RrsType::Mx => "MX",
            RrsType::Ns => "NS",
            RrsType::Ptr => "PTR",
            RrsType::Soa => "SOA",
            RrsType::Srv => "SRV",
            RrsType::Txt => "TXT",
            RrsType::Other(other) => other,
        }
    }
}

impl From<&str> for RrsType {
    fn from(value: &str) -> Self {
        // ARM reports types as "Microsoft.Network/dnszones/A"
        let short = value.rsplit('/').next().unwrap_or(value);
        match short.to_ascii_uppercase().as_str() {
            "A" => RrsType::A,
            "AAAA" => RrsType::Aaaa,
            "CAA" => RrsType::Caa,
            "CNAME" => RrsType::Cname,
            "MX" => RrsType::Mx,
            "NS" => RrsType::Ns,
            "PTR" => RrsType::Ptr,
            "SOA" => RrsType::Soa,
            "SRV" => RrsType::Srv,
            "TXT" => RrsType::Txt,
            _ => RrsType::Other(short.to_string()),
        }
    }
}

impl From<String> for RrsType {
    fn from(value: String) -> Self {
        RrsType::from(value.as_str())
    }
}

impl From<RrsType> for String {
    fn from(value: RrsType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for RrsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record set in backend-neutral form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecordSet {
    /// Fully-qualified name without the trailing root dot, e.g. `www.example.com`
    pub name: String,
    /// Record type
    pub rrs_type: RrsType,
    /// TTL in seconds
    pub ttl: i64,
    /// Record data in order (IPv4 addresses for A record sets)
    pub rrdatas: Vec<String>,
}

impl ResourceRecordSet {
    #[must_use]
    pub fn new(name: impl Into<String>, rrdatas: Vec<String>, ttl: i64, rrs_type: RrsType) -> Self {
        Self {
            name: name.into(),
            rrs_type,
            ttl,
            rrdatas,
        }
    }
}

/// A DNS zone as known to (or about to be created in) a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneInfo {
    /// Zone name, e.g. `example.com`
    pub name: String,
    /// ARM resource ID; `None` until the zone exists
    #[serde(default)]
    pub id: Option<String>,
    /// Public or private
    pub kind: ZoneKind,
    /// Tags on the zone resource
    #[serde(default)]
    pub tags: Tags,
    /// Virtual network ID the zone is linked to (private zones)
    #[serde(default)]
    pub virtual_network: Option<String>,
}

impl ZoneInfo {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ZoneKind) -> Self {
        Self {
            name: name.into(),
            id: None,
            kind,
            tags: Tags::new(),
            virtual_network: None,
        }
    }
}

/// Compare two DNS names ignoring ASCII case and a trailing root dot.
#[must_use]
pub fn names_equal(a: &str, b: &str) -> bool {
    a.trim_end_matches('.')
        .eq_ignore_ascii_case(b.trim_end_matches('.'))
}
