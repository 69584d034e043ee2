// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Conversion from fully-qualified record names to ARM relative record set names.

/// Relative record set name of `fqdn` inside `zone`.
///
/// Exactly one trailing `.{zone}` is stripped, compared case-insensitively. A single trailing
/// root dot on either argument is ignored. Names that do not end in `.{zone}` (including the
/// zone apex itself) are returned unchanged.
///
/// # Examples
///
/// ```
/// use armsync::dns::relative_name;
///
/// assert_eq!(relative_name("www.example.com", "example.com"), "www");
/// assert_eq!(relative_name("api.internal.example.com.", "example.com"), "api.internal");
/// assert_eq!(relative_name("www.other.org", "example.com"), "www.other.org");
/// ```
#[must_use]
pub fn relative_name(fqdn: &str, zone: &str) -> String {
    let name = fqdn.strip_suffix('.').unwrap_or(fqdn);
    let zone = zone.strip_suffix('.').unwrap_or(zone);

    if zone.is_empty() || name.len() <= zone.len() + 1 {
        return fqdn.to_string();
    }

    let split = name.len() - zone.len() - 1;
    if !name.is_char_boundary(split) {
        return fqdn.to_string();
    }

    let (head, tail) = name.split_at(split);
    match tail.strip_prefix('.') {
        Some(suffix) if suffix.eq_ignore_ascii_case(zone) => head.to_string(),
        _ => fqdn.to_string(),
    }
}
