// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! HTTP status code mapping for Azure Resource Manager responses.
//!
//! ARM usually returns `{"error": {"code": ..., "message": ...}}` on failure. When the body
//! is missing or unparseable the status code is all we have; this module turns it into a
//! stable reason string so log lines and [`crate::errors::BackendError::Api`] stay greppable.
//!
//! # Usage
//!
//! ```rust
//! use armsync::http_errors::map_http_error_to_reason;
//!
//! let (reason, message) = map_http_error_to_reason(404);
//! assert_eq!(reason, "ResourceNotFound");
//!
//! let (reason, message) = map_http_error_to_reason(429);
//! assert_eq!(reason, "Throttled");
//! ```

/// The request was malformed or failed ARM validation.
pub const REASON_BAD_REQUEST: &str = "BadRequest";

/// The bearer token is missing, expired or lacks the required role assignment.
pub const REASON_AUTH_FAILED: &str = "AuthorizationFailed";

/// The resource (or its parent) does not exist.
pub const REASON_NOT_FOUND: &str = "ResourceNotFound";

/// A concurrent operation holds the resource, or an etag precondition failed.
pub const REASON_CONFLICT: &str = "Conflict";

/// The subscription exceeded its request quota.
pub const REASON_THROTTLED: &str = "Throttled";

/// ARM or the resource provider failed internally.
pub const REASON_INTERNAL_ERROR: &str = "InternalServerError";

/// ARM could not reach the resource provider in time.
pub const REASON_GATEWAY_ERROR: &str = "GatewayError";

/// Any other status code.
pub const REASON_UNEXPECTED: &str = "UnexpectedStatus";

/// Map an HTTP status code to a reason and a human-readable message.
///
/// # HTTP Code Mapping
///
/// | HTTP Code | Reason |
/// |-----------|--------|
/// | 400 | `BadRequest` |
/// | 401, 403 | `AuthorizationFailed` |
/// | 404 | `ResourceNotFound` |
/// | 409, 412 | `Conflict` |
/// | 429 | `Throttled` |
/// | 500 | `InternalServerError` |
/// | 502, 503, 504 | `GatewayError` |
/// | Other | `UnexpectedStatus` |
#[must_use]
pub fn map_http_error_to_reason(status_code: u16) -> (&'static str, String) {
    match status_code {
        400 => (
            REASON_BAD_REQUEST,
            "Invalid request to Azure Resource Manager (400)".into(),
        ),
        401 => (
            REASON_AUTH_FAILED,
            "Azure authentication required (401)".into(),
        ),
        403 => (
            REASON_AUTH_FAILED,
            "Azure authorization failed (403)".into(),
        ),
        404 => (
            REASON_NOT_FOUND,
            "Resource not found in Azure (404)".into(),
        ),
        409 => (
            REASON_CONFLICT,
            "Conflicting operation in progress (409)".into(),
        ),
        412 => (
            REASON_CONFLICT,
            "Precondition failed (412)".into(),
        ),
        429 => (
            REASON_THROTTLED,
            "Too many requests to Azure Resource Manager (429)".into(),
        ),
        500 => (
            REASON_INTERNAL_ERROR,
            "Azure internal error (500)".into(),
        ),
        502 => (
            REASON_GATEWAY_ERROR,
            "Bad gateway reaching the resource provider (502)".into(),
        ),
        503 => (
            REASON_GATEWAY_ERROR,
            "Resource provider unavailable (503)".into(),
        ),
        504 => (
            REASON_GATEWAY_ERROR,
            "Gateway timeout reaching the resource provider (504)".into(),
        ),
        _ => (
            REASON_UNEXPECTED,
            format!("Unexpected HTTP status from Azure ({status_code})"),
        ),
    }
}

#[cfg(test)]
#[path = "http_errors_tests.rs"]
mod http_errors_tests;
