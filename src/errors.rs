// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for armsync.
//!
//! This module provides the error taxonomy shared by every layer:
//! - [`BackendError`] - a single ARM call failed (surfaced verbatim, never retried)
//! - [`DiscoveryError`] - `find` could not list the remote resources
//! - [`ValidationError`] - `check_changes` rejected a transition
//! - [`ApplyError`] - `render` or a changeset `apply` failed
//!
//! Absence of a resource is never an error at the discovery layer; it is reported as
//! `Ok(None)`. Only the adapter-level `delete` reports absence, as [`BackendError::NotFound`].

use thiserror::Error;

/// Errors returned by a single Azure Resource Manager call.
///
/// Every variant carries the operation name and the resource it targeted so that a failure
/// can be diagnosed without retry logic at this layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// ARM answered with a non-success status code
    #[error("{operation} on {resource} failed (HTTP {status}, {code}): {message}")]
    Api {
        /// Logical operation (e.g. "CreateOrUpdate", "Delete")
        operation: &'static str,
        /// Resource path or name the call targeted
        resource: String,
        /// HTTP status code returned by ARM
        status: u16,
        /// ARM error code from the response body, or the mapped reason when absent
        code: String,
        /// ARM error message from the response body
        message: String,
    },

    /// The targeted resource does not exist.
    ///
    /// DNS record set deletes answer `204 No Content` in this case; the adapters turn that
    /// into this variant so callers can tell "removed" from "was never there".
    #[error("{operation} on {resource}: resource not found")]
    NotFound {
        /// Logical operation
        operation: &'static str,
        /// Resource path or name the call targeted
        resource: String,
    },

    /// The request never produced an HTTP response (DNS, TLS, connection reset, ...)
    #[error("{operation} on {resource}: transport error: {reason}")]
    Transport {
        /// Logical operation
        operation: &'static str,
        /// Resource path or name the call targeted
        resource: String,
        /// Underlying client error
        reason: String,
    },

    /// The response body could not be decoded
    #[error("{operation} on {resource}: invalid response body: {reason}")]
    Decode {
        /// Logical operation
        operation: &'static str,
        /// Resource path or name the call targeted
        resource: String,
        /// Decoder error
        reason: String,
    },

    /// A long-running operation reached a terminal state other than `Succeeded`
    #[error("long-running {operation} on {resource} finished with status {status}")]
    OperationFailed {
        /// Logical operation
        operation: &'static str,
        /// Resource path or name the call targeted
        resource: String,
        /// Terminal status reported by ARM (`Failed`, `Canceled`, ...)
        status: String,
    },

    /// A request URL could not be built
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl {
        /// The offending URL or base
        url: String,
        /// Parser error
        reason: String,
    },

    /// No access token could be obtained
    #[error("credential error: {reason}")]
    Credential {
        /// Why the credential failed
        reason: String,
    },
}

impl BackendError {
    /// True when the error means "the resource does not exist".
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            BackendError::NotFound { .. } | BackendError::Api { status: 404, .. }
        )
    }

    /// HTTP status code, when the error came from an HTTP response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Api { status, .. } => Some(*status),
            BackendError::NotFound { .. } => Some(204),
            _ => None,
        }
    }
}

/// `find` failed because the underlying list call failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to discover {kind} '{name}': {source}")]
pub struct DiscoveryError {
    /// Resource kind (e.g. "DNSZone")
    pub kind: &'static str,
    /// Name of the resource being looked up
    pub name: String,
    /// The failing list call
    pub source: BackendError,
}

/// `check_changes` rejected the transition from actual to desired.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A field needed to create the resource is absent
    #[error("field is required: {0}")]
    RequiredField(&'static str),

    /// An immutable field differs between actual and desired
    #[error("field cannot be changed: {0}")]
    CannotChangeField(&'static str),
}

/// `render` or a changeset `apply` failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    /// The create-or-update call for a reconciled resource failed
    #[error("failed to apply {kind} '{name}': {source}")]
    Backend {
        /// Resource kind
        kind: &'static str,
        /// Resource name
        name: String,
        /// The failing call
        source: BackendError,
    },

    /// A record set mutation inside a changeset failed; the changeset stopped there
    #[error("changeset {operation} of record set '{name}' failed: {source}")]
    RecordSet {
        /// "remove", "add" or "upsert"
        operation: &'static str,
        /// Fully-qualified record set name
        name: String,
        /// The failing call
        source: BackendError,
    },

    /// Only A record sets can be written
    #[error("record type {rrs_type} is not supported for record set '{name}'")]
    UnsupportedRecordType {
        /// Fully-qualified record set name
        name: String,
        /// The rejected type
        rrs_type: String,
    },

    /// A field required to render is absent
    #[error("{kind} is missing required field {field}")]
    MissingField {
        /// Resource kind
        kind: &'static str,
        /// Missing field
        field: &'static str,
    },
}

/// Any failure of one reconciliation pass for one resource.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error("invalid change to {kind} '{name}': {source}")]
    Validation {
        /// Resource kind
        kind: &'static str,
        /// Resource name (empty when the name itself is missing)
        name: String,
        /// The rejected transition
        source: ValidationError,
    },

    #[error(transparent)]
    Apply(#[from] ApplyError),
}

/// Errors constructing a DNS provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// No provider is registered under the requested name
    #[error("unknown DNS provider '{0}'")]
    UnknownProvider(String),

    /// Credentials could not be obtained; fatal for the process
    #[error("could not obtain Azure credentials: {0}")]
    Credentials(BackendError),

    /// The HTTP client could not be constructed
    #[error("could not construct Azure client: {0}")]
    Client(BackendError),
}

/// Errors loading [`crate::config::CloudConfig`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is unset or empty
    #[error("environment variable {0} must be set")]
    MissingVar(&'static str),

    /// An environment variable could not be parsed
    #[error("environment variable {name}={value} is invalid: {reason}")]
    InvalidVar {
        /// Variable name
        name: &'static str,
        /// Raw value
        value: String,
        /// Parse error
        reason: String,
    },
}

/// Errors loading a desired-state manifest.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManifestError {
    /// The manifest file could not be read
    #[error("failed to read manifest {path}: {reason}")]
    Read {
        /// Manifest path
        path: String,
        /// I/O error
        reason: String,
    },

    /// The manifest is not valid YAML for the expected shape
    #[error("failed to parse manifest {path}: {reason}")]
    Parse {
        /// Manifest path, or `<inline>` for in-memory input
        path: String,
        /// Parser error, including the location
        reason: String,
    },
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
