//! Input validation and sanitization functions for fwtui
//!
//! This module provides centralized validation for everything the operator
//! types into the rule form. Nothing reaches a ufw command line without going
//! through one of these functions first.

use crate::core::rule::Protocol;
use ipnetwork::IpNetwork;
use std::fmt;

/// Validation failures surfaced to the operator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid port: {0}")]
    InvalidPort(String),

    #[error("invalid port range: {0}")]
    InvalidPortRange(String),

    #[error("invalid protocol for port range: {0}. Must be either TCP or UDP only")]
    RangeNeedsProtocol(String),

    #[error("invalid source IP: {0}")]
    InvalidSource(String),

    #[error("invalid destination IP: {0}")]
    InvalidDestination(String),

    #[error("invalid interface: {0}")]
    InvalidInterface(String),

    #[error("invalid profile name: {0}")]
    InvalidProfileName(String),
}

/// A validated port clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortSpec {
    Single(u16),
    Range { start: u16, end: u16 },
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortSpec::Single(port) => write!(f, "{port}"),
            PortSpec::Range { start, end } => write!(f, "{start}:{end}"),
        }
    }
}

/// Which side of the rule an address belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressField {
    Source,
    Destination,
}

/// Parses a single port number.
///
/// # Errors
///
/// Returns `Err` if the text is not an integer in `1..=65535`.
pub fn parse_port(text: &str) -> Result<u16, ValidationError> {
    text.parse::<u32>()
        .ok()
        .filter(|port| (1..=65_535).contains(port))
        .and_then(|port| u16::try_from(port).ok())
        .ok_or_else(|| ValidationError::InvalidPort(text.to_string()))
}

/// Validates a port range.
///
/// # Errors
///
/// Returns `Err` if start port is greater than end port.
pub fn validate_port_range(start: u16, end: u16, raw: &str) -> Result<PortSpec, ValidationError> {
    if start > end {
        Err(ValidationError::InvalidPortRange(raw.to_string()))
    } else {
        Ok(PortSpec::Range { start, end })
    }
}

/// Validates the port field of the rule form.
///
/// Accepts `N` or `A:B`. Ranges are protocol specific in ufw, so a range with
/// [`Protocol::Both`] is rejected before the endpoints are looked at.
///
/// # Errors
///
/// Returns `Err` on a malformed port, an out-of-range endpoint, a reversed
/// range, or a range without an explicit protocol.
pub fn validate_port_spec(text: &str, protocol: Protocol) -> Result<PortSpec, ValidationError> {
    match text.split_once(':') {
        Some((start, end)) => {
            if protocol == Protocol::Both {
                return Err(ValidationError::RangeNeedsProtocol(text.to_string()));
            }
            let start_port = parse_port(start)?;
            let end_port = parse_port(end)?;
            validate_port_range(start_port, end_port, text)
        }
        None => parse_port(text).map(PortSpec::Single),
    }
}

/// Validates a single address or CIDR block.
///
/// # Errors
///
/// Returns `Err` if the text is neither an IPv4/IPv6 address nor a CIDR block.
pub fn validate_address(text: &str, field: AddressField) -> Result<IpNetwork, ValidationError> {
    text.parse::<IpNetwork>().map_err(|_| match field {
        AddressField::Source => ValidationError::InvalidSource(text.to_string()),
        AddressField::Destination => ValidationError::InvalidDestination(text.to_string()),
    })
}

/// Quotes a rule comment as one single-quoted shell word.
///
/// Embedded single quotes become `'\''` so the rendered command stays a
/// single token when pasted into a shell.
///
/// # Examples
///
/// ```
/// use fwtui::validators::quote_comment;
///
/// assert_eq!(quote_comment("web"), "'web'");
/// assert_eq!(quote_comment("bob's box"), r"'bob'\''s box'");
/// ```
pub fn quote_comment(comment: &str) -> String {
    format!("'{}'", comment.replace('\'', r"'\''"))
}

/// Validates a network interface name.
///
/// Linux kernel interface name rules:
/// - Max 15 characters (IFNAMSIZ - 1)
/// - Alphanumeric, dot, dash, underscore only
/// - Cannot be "." or ".."
///
/// # Errors
///
/// Returns `Err` if interface name violates kernel constraints.
pub fn validate_interface(name: &str) -> Result<String, ValidationError> {
    if name.len() > 15
        || name.is_empty()
        || name == "."
        || name == ".."
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
    {
        return Err(ValidationError::InvalidInterface(name.to_string()));
    }

    Ok(name.to_string())
}

/// Validates an application profile name for filesystem safety.
///
/// Catalog names contain spaces ("Nginx Full"), so unlike interface names
/// spaces are allowed; path separators and brackets are not, because the
/// name becomes both a file name and the `[section]` header of the file.
///
/// # Errors
///
/// Returns `Err` if the name is empty, too long, a path component, or
/// contains a separator, bracket or control character.
pub fn validate_profile_name(name: &str) -> Result<(), ValidationError> {
    let invalid = name.trim().is_empty()
        || name.len() > 64
        || name == "."
        || name == ".."
        || name
            .chars()
            .any(|c| c.is_control() || matches!(c, '/' | '\\' | '[' | ']'));

    if invalid {
        Err(ValidationError::InvalidProfileName(name.to_string()))
    } else {
        Ok(())
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_parse_port_accepts_exactly_valid_range(port in 0u32..200_000) {
            let result = parse_port(&port.to_string());
            if (1..=65_535).contains(&port) {
                prop_assert_eq!(u32::from(result.unwrap()), port);
            } else {
                prop_assert!(result.is_err());
            }
        }

        #[test]
        fn test_port_range_consistency(start in 1u16..=65535, end in 1u16..=65535) {
            let raw = format!("{start}:{end}");
            let result = validate_port_spec(&raw, Protocol::Tcp);
            if start <= end {
                prop_assert_eq!(result.unwrap(), PortSpec::Range { start, end });
            } else {
                prop_assert!(result.is_err());
            }
        }

        #[test]
        fn test_range_with_both_always_rejected(start in 1u16..=65535, end in 1u16..=65535) {
            let raw = format!("{start}:{end}");
            prop_assert!(validate_port_spec(&raw, Protocol::Both).is_err());
        }

        #[test]
        fn test_quoted_comment_is_single_word(comment in "\\PC*") {
            let quoted = quote_comment(&comment);
            prop_assert!(quoted.starts_with('\''));
            prop_assert!(quoted.ends_with('\''));
            // Every quote inside the outer pair is part of an escape sequence
            let inner = &quoted[1..quoted.len() - 1];
            prop_assert_eq!(inner.replace(r"'\''", ""), comment.replace('\'', ""));
        }
    }
}
