//! fwtui - terminal front-end for ufw
//!
//! An interactive menu over the Uncomplicated Firewall: enable or reset it,
//! build rules from a validated form, delete rules by position, manage
//! application profiles and default policies, and read `ufw show` reports.
//!
//! # Architecture
//!
//! - [`app`] - State machine: messages in, effects out, pure rendering
//! - [`core`] - ufw collaborator, status parsing, profiles, errors
//! - [`terminal`] - crossterm session and the event loop
//! - [`validators`] - Form input validation
//! - [`config`] - Configuration persistence
//! - [`audit`] - Audit log of every mutating ufw action
//! - [`utils`] - XDG directories and interface discovery

// Allow pedantic clippy warnings that are not worth fixing for this codebase
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::needless_lifetimes)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::missing_errors_doc)]

pub mod app;
pub mod audit;
pub mod config;
pub mod core;
pub mod terminal;
pub mod utils;
pub mod validators;

#[cfg(test)]
mod test_helpers;

// Re-export commonly used types
pub use core::error::{Error, Result};
pub use core::ufw::{Firewall, UfwCli, UfwCommand};
