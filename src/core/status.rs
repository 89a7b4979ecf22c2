//! Parsing of `ufw status` output
//!
//! Only the handful of facts the UI needs are extracted: whether the firewall
//! is active, whether logging is on, the default policies, and the rule rows
//! of the numbered listing. Everything else is displayed verbatim.

use crate::core::rule::{DefaultPolicy, TrafficDirection};
use std::str::FromStr;

/// Facts derived from `ufw status verbose`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FirewallStatus {
    pub active: bool,
    pub logging: bool,
}

impl FirewallStatus {
    pub fn parse(verbose: &str) -> Self {
        let mut status = Self::default();
        for line in verbose.lines() {
            if line.starts_with("Status: active") {
                status.active = true;
            }
            if let Some(rest) = line.strip_prefix("Logging:") {
                status.logging = rest.split_whitespace().next() == Some("on");
            }
        }
        status
    }
}

/// One default policy as reported by ufw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultPolicyEntry {
    pub direction: TrafficDirection,
    /// `None` when ufw reports the chain as `disabled`
    pub policy: Option<DefaultPolicy>,
}

/// Parses the `Default:` line of the verbose status, e.g.
/// `Default: deny (incoming), allow (outgoing), disabled (routed)`.
///
/// # Errors
///
/// Returns `Err` if the line is missing or any entry is malformed.
pub fn parse_default_policies(verbose: &str) -> Result<Vec<DefaultPolicyEntry>, String> {
    let line = verbose
        .lines()
        .find_map(|l| l.trim().strip_prefix("Default:"))
        .ok_or_else(|| "default policies not found in ufw status".to_string())?;

    line.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(parse_policy_entry)
        .collect()
}

fn parse_policy_entry(entry: &str) -> Result<DefaultPolicyEntry, String> {
    let malformed = || format!("malformed default policy entry: {entry}");

    let (policy, rest) = entry.split_once(' ').ok_or_else(malformed)?;
    let direction = rest
        .trim()
        .strip_prefix('(')
        .and_then(|r| r.strip_suffix(')'))
        .ok_or_else(malformed)?;
    let direction = TrafficDirection::from_str(direction).map_err(|_| malformed())?;

    let policy = match policy {
        "disabled" => None,
        other => Some(DefaultPolicy::from_str(other).map_err(|_| malformed())?),
    };

    Ok(DefaultPolicyEntry { direction, policy })
}

/// One row of the numbered rule listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRow {
    /// 1-based position, as `ufw delete <n>` expects
    pub position: usize,
    pub line: String,
}

/// Extracts the rule rows from `ufw status numbered`.
///
/// The body sits at a fixed offset: four header lines (status, blank, column
/// titles, dashes) and two trailing lines. Shorter output means no rules.
pub fn parse_numbered_rules(numbered: &str) -> Vec<RuleRow> {
    let lines: Vec<&str> = numbered.split('\n').collect();
    if lines.len() < 6 {
        return Vec::new();
    }

    lines[4..lines.len() - 2]
        .iter()
        .enumerate()
        .map(|(index, line)| RuleRow {
            position: index + 1,
            line: (*line).to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERBOSE_ACTIVE: &str = "Status: active\n\
Logging: on (low)\n\
Default: deny (incoming), allow (outgoing), disabled (routed)\n\
New profiles: skip\n\
\n\
To                         Action      From\n\
--                         ------      ----\n\
22/tcp                     ALLOW IN    Anywhere\n";

    const NUMBERED: &str = "Status: active\n\
\n\
     To                         Action      From\n\
     --                         ------      ----\n\
[ 1] 22/tcp                     ALLOW IN    Anywhere\n\
[ 2] 80/tcp                     ALLOW IN    Anywhere\n\
[ 3] 443/tcp                    ALLOW IN    Anywhere\n\
\n";

    #[test]
    fn test_parse_active_status() {
        let status = FirewallStatus::parse(VERBOSE_ACTIVE);
        assert!(status.active);
        assert!(status.logging);
    }

    #[test]
    fn test_parse_inactive_status() {
        let status = FirewallStatus::parse("Status: inactive\n");
        assert!(!status.active);
        assert!(!status.logging);
    }

    #[test]
    fn test_parse_logging_off() {
        let status = FirewallStatus::parse("Status: active\nLogging: off\n");
        assert!(status.active);
        assert!(!status.logging);
    }

    #[test]
    fn test_parse_default_policies() {
        let defaults = parse_default_policies(VERBOSE_ACTIVE).unwrap();
        assert_eq!(
            defaults,
            vec![
                DefaultPolicyEntry {
                    direction: TrafficDirection::Incoming,
                    policy: Some(DefaultPolicy::Deny),
                },
                DefaultPolicyEntry {
                    direction: TrafficDirection::Outgoing,
                    policy: Some(DefaultPolicy::Allow),
                },
                DefaultPolicyEntry {
                    direction: TrafficDirection::Routed,
                    policy: None,
                },
            ]
        );
    }

    #[test]
    fn test_parse_default_policies_missing() {
        assert!(parse_default_policies("Status: inactive\n").is_err());
    }

    #[test]
    fn test_parse_default_policies_malformed() {
        assert!(parse_default_policies("Default: deny incoming").is_err());
        assert!(parse_default_policies("Default: maybe (incoming)").is_err());
        assert!(parse_default_policies("Default: deny (sideways)").is_err());
    }

    #[test]
    fn test_parse_numbered_rules() {
        let rows = parse_numbered_rules(NUMBERED);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].position, 1);
        assert!(rows[0].line.starts_with("[ 1] 22/tcp"));
        assert_eq!(rows[2].position, 3);
        assert!(rows[2].line.contains("443/tcp"));
    }

    #[test]
    fn test_parse_numbered_rules_short_output() {
        assert!(parse_numbered_rules("Status: inactive\n").is_empty());
        assert!(parse_numbered_rules("").is_empty());
    }
}
