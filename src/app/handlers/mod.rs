//! Key and completion handlers organized by view
//!
//! Each module owns the per-view screen state it needs and the handlers that
//! drive it. Handlers take the root [`State`](crate::app::State) and return
//! the follow-up [`Effect`](crate::app::Effect).

pub mod confirm;
pub mod home;
pub mod profiles;
pub mod rules;
pub mod settings;
pub mod show;

#[cfg(test)]
pub mod test_utils;

pub use profiles::{ProfilePane, ProfilesScreen};
pub use settings::{DefaultRow, DefaultsScreen};
pub use show::{Report, ShowScreen};

pub(crate) use confirm::*;
pub(crate) use home::*;
pub(crate) use profiles::*;
pub(crate) use rules::*;
pub(crate) use settings::*;
pub(crate) use show::*;

/// Text to notify for a successful command: its trimmed output, or
/// `fallback` when ufw printed nothing.
pub(crate) fn output_notice(output: &str, fallback: &str) -> String {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}
