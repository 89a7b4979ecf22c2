//! Closed vocabularies for rules, policies and reports
//!
//! Every choice the operator can make is an enum here, so the form and the
//! menus can never hold a value ufw would not understand. Option lists for the
//! form come straight from [`strum::IntoEnumIterator`].

use serde::{Deserialize, Serialize};

/// Transport protocol of a rule
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Default,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
pub enum Protocol {
    #[default]
    #[strum(serialize = "tcp")]
    Tcp,
    #[strum(serialize = "udp")]
    Udp,
    /// No protocol qualifier: the rule matches TCP and UDP
    #[strum(serialize = "both")]
    Both,
}

impl Protocol {
    /// Qualifier for `proto <x>`, or `None` when the rule covers both.
    pub const fn proto_arg(self) -> Option<&'static str> {
        match self {
            Protocol::Tcp => Some("tcp"),
            Protocol::Udp => Some("udp"),
            Protocol::Both => None,
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
            Protocol::Both => "Both",
        }
    }
}

/// What ufw does with matching traffic
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Default,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
pub enum RuleAction {
    #[default]
    #[strum(serialize = "allow")]
    Allow,
    #[strum(serialize = "deny")]
    Deny,
    #[strum(serialize = "reject")]
    Reject,
    /// Allow, but rate-limit repeated connections
    #[strum(serialize = "limit")]
    Limit,
}

impl RuleAction {
    pub const fn display_name(self) -> &'static str {
        match self {
            RuleAction::Allow => "Allow",
            RuleAction::Deny => "Deny",
            RuleAction::Reject => "Reject",
            RuleAction::Limit => "Limit",
        }
    }
}

/// Traffic direction of a rule
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Default,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
pub enum Direction {
    #[default]
    #[strum(serialize = "in")]
    In,
    #[strum(serialize = "out")]
    Out,
}

impl Direction {
    pub const fn display_name(self) -> &'static str {
        match self {
            Direction::In => "In",
            Direction::Out => "Out",
        }
    }
}

/// Whole-firewall switches reachable from the home menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumIter)]
pub enum PolicyAction {
    #[strum(serialize = "enable")]
    Enable,
    #[strum(serialize = "disable")]
    Disable,
    #[strum(serialize = "reset")]
    Reset,
    #[strum(serialize = "logging on")]
    EnableLogging,
    #[strum(serialize = "logging off")]
    DisableLogging,
}

impl PolicyAction {
    /// Arguments passed to ufw. `--force` skips ufw's own y/n prompt, which
    /// would otherwise block on stdin.
    pub const fn ufw_args(self) -> &'static [&'static str] {
        match self {
            PolicyAction::Enable => &["--force", "enable"],
            PolicyAction::Disable => &["disable"],
            PolicyAction::Reset => &["--force", "reset"],
            PolicyAction::EnableLogging => &["logging", "on"],
            PolicyAction::DisableLogging => &["logging", "off"],
        }
    }
}

/// Default policy applied to traffic no rule matched
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
pub enum DefaultPolicy {
    #[strum(serialize = "allow")]
    Allow,
    #[strum(serialize = "deny")]
    Deny,
    #[strum(serialize = "reject")]
    Reject,
}

/// Chain a default policy applies to
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
pub enum TrafficDirection {
    #[strum(serialize = "incoming")]
    Incoming,
    #[strum(serialize = "outgoing")]
    Outgoing,
    #[strum(serialize = "routed")]
    Routed,
}

impl TrafficDirection {
    pub const fn display_name(self) -> &'static str {
        match self {
            TrafficDirection::Incoming => "Incoming",
            TrafficDirection::Outgoing => "Outgoing",
            TrafficDirection::Routed => "Routed",
        }
    }
}

/// Reports available through `ufw show`
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
pub enum ReportKind {
    #[strum(serialize = "raw")]
    Raw,
    #[strum(serialize = "added")]
    Added,
    #[strum(serialize = "listening")]
    Listening,
    #[strum(serialize = "builtins")]
    Builtins,
}

impl ReportKind {
    pub const fn display_name(self) -> &'static str {
        match self {
            ReportKind::Raw => "Raw",
            ReportKind::Added => "Added",
            ReportKind::Listening => "Listening",
            ReportKind::Builtins => "Builtins",
        }
    }
}
