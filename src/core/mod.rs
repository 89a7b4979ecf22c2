//! Core firewall management functionality
//!
//! This module contains the core types for driving ufw. It provides:
//!
//! - [`rule`]: Closed vocabularies for rules, policies and reports
//! - [`status`]: Parsing of `ufw status` output
//! - [`ufw`]: The [`ufw::Firewall`] collaborator and its process-backed implementation
//! - [`profiles`]: Application profile catalog and installation
//! - [`error`]: Error types for firewall operations

pub mod error;
pub mod profiles;
pub mod rule;
pub mod status;
pub mod ufw;
