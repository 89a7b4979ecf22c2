//! Shared test utilities
//!
//! This module is only compiled in test mode.

use std::sync::Mutex;

/// Mutex for tests that need exclusive access to environment variables.
///
/// # Example
///
/// ```ignore
/// let _guard = ENV_VAR_MUTEX.lock().unwrap();
/// unsafe {
///     std::env::set_var("FWTUI_UFW_COMMAND", "/tmp/mock-ufw");
/// }
/// // ... test with custom env state ...
/// unsafe {
///     std::env::remove_var("FWTUI_UFW_COMMAND");
/// }
/// ```
pub static ENV_VAR_MUTEX: Mutex<()> = Mutex::new(());
