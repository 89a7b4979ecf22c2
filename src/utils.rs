//! Utility functions for directory management and system integration
//!
//! This module provides helper functions following the XDG Base Directory specification
//! for portable configuration and state storage across Linux distributions.
//!
//! # Directory Structure
//!
//! - Config: `~/.config/fwtui/` - User configuration file
//! - State: `~/.local/state/fwtui/` - Log file and audit log
//!
//! fwtui runs as root, so these normally resolve under `/root`.
//!
//! # Example
//!
//! ```
//! use fwtui::utils::{get_state_dir, ensure_dirs};
//!
//! // Ensure directories exist before use
//! ensure_dirs().expect("Failed to create directories");
//!
//! if let Some(state_path) = get_state_dir() {
//!     // Open log files under state_path
//! }
//! ```

use directories::ProjectDirs;
use std::path::{Path, PathBuf};

const SYS_CLASS_NET: &str = "/sys/class/net";

pub fn get_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "fwtui", "fwtui").map(|pd| pd.config_dir().to_path_buf())
}

pub fn get_state_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "fwtui", "fwtui")
        .and_then(|pd| pd.state_dir().map(Path::to_path_buf))
}

pub fn ensure_dirs() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use std::fs::DirBuilder;
        use std::os::unix::fs::DirBuilderExt;

        let mut builder = DirBuilder::new();
        builder.mode(0o700); // User read/write/execute only
        builder.recursive(true);

        if let Some(dir) = get_config_dir() {
            builder.create(dir)?;
        }
        if let Some(dir) = get_state_dir() {
            builder.create(dir)?;
        }
    }

    #[cfg(not(unix))]
    {
        if let Some(dir) = get_config_dir() {
            std::fs::create_dir_all(dir)?;
        }
        if let Some(dir) = get_state_dir() {
            std::fs::create_dir_all(dir)?;
        }
    }

    Ok(())
}

/// Interfaces a rule can be bound to, sorted by name.
pub fn list_interfaces() -> Vec<String> {
    list_interfaces_in(Path::new(SYS_CLASS_NET))
}

/// Same as [`list_interfaces`] over an arbitrary sysfs-style directory.
///
/// Loopback is skipped, and so is anything whose `operstate` reads `down`.
/// A missing or unreadable `operstate` keeps the interface.
pub fn list_interfaces_in(root: &Path) -> Vec<String> {
    let mut interfaces = Vec::new();
    if let Ok(entries) = std::fs::read_dir(root) {
        for entry in entries.flatten() {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name == "lo" {
                continue;
            }
            let operstate = std::fs::read_to_string(entry.path().join("operstate"));
            if operstate.is_ok_and(|state| state.trim() == "down") {
                continue;
            }
            interfaces.push(name);
        }
    }
    interfaces.sort();
    interfaces
}

/// Truncates a string to a maximum length and adds an ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        // Find the nearest character boundary to avoid splitting multi-byte characters
        let end = s
            .char_indices()
            .map(|(idx, _)| idx)
            .take_while(|&idx| idx <= max_len.saturating_sub(3))
            .last()
            .unwrap_or(0);
        format!("{}...", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fake_interface(root: &Path, name: &str, operstate: Option<&str>) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        if let Some(state) = operstate {
            fs::write(dir.join("operstate"), format!("{state}\n")).unwrap();
        }
    }

    #[test]
    fn test_list_interfaces_filters_lo_and_down() {
        let root = tempfile::tempdir().unwrap();
        fake_interface(root.path(), "lo", Some("unknown"));
        fake_interface(root.path(), "eth0", Some("up"));
        fake_interface(root.path(), "docker0", Some("down"));
        fake_interface(root.path(), "wg0", Some("unknown"));
        fake_interface(root.path(), "br0", None);

        assert_eq!(list_interfaces_in(root.path()), vec!["br0", "eth0", "wg0"]);
    }

    #[test]
    fn test_list_interfaces_missing_root() {
        assert!(list_interfaces_in(Path::new("/nonexistent/fwtui-net")).is_empty());
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("a longer line of text", 10), "a longe...");
        assert_eq!(truncate_string("ééééééé", 8), "éé...");
    }
}
