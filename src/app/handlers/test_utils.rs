//! Shared test utilities for handler modules
//!
//! Provides common test helpers to avoid duplication across handler test suites.

use crate::app::{Effect, Message, Snapshot, State, Task};
use crate::config::AppConfig;
use crate::core::error::{Error, Result};
use crate::core::status::RuleRow;
use crate::core::ufw::Firewall;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Mutex;

pub const ACTIVE_STATUS: &str = "Status: active\n\
Logging: on (low)\n\
Default: deny (incoming), allow (outgoing), disabled (routed)\n\
New profiles: skip\n\
\n\
To                         Action      From\n\
--                         ------      ----\n\
22/tcp                     ALLOW IN    Anywhere\n\
80/tcp                     ALLOW IN    Anywhere\n\
443                        DENY IN     10.0.0.0/8\n";

pub const NUMBERED_STATUS: &str = "Status: active\n\
\n\
     To                         Action      From\n\
     --                         ------      ----\n\
[ 1] 22/tcp                     ALLOW IN    Anywhere\n\
[ 2] 80/tcp                     ALLOW IN    Anywhere\n\
[ 3] 443                        DENY IN     10.0.0.0/8\n\
\n";

/// Home screen over an active firewall with three rules and one interface.
pub fn create_test_state() -> State {
    let (mut state, _) = State::new(&AppConfig::default());
    state.apply_snapshot(active_snapshot());
    state
}

pub fn active_snapshot() -> Snapshot {
    Snapshot {
        status_text: ACTIVE_STATUS.to_string(),
        rules: rule_rows(3),
        interfaces: vec!["eth0".to_string()],
    }
}

/// `count` rows at positions `1..=count`.
pub fn rule_rows(count: usize) -> Vec<RuleRow> {
    (1..=count)
        .map(|position| RuleRow {
            position,
            line: format!("[{position:>2}] {}/tcp                     ALLOW IN    Anywhere", 1000 + position),
        })
        .collect()
}

pub fn key(code: KeyCode) -> Message {
    Message::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

pub fn ctrl(c: char) -> Message {
    Message::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
}

/// Types `text` into whatever has focus.
pub fn type_text(state: &mut State, text: &str) {
    for c in text.chars() {
        state.update(key(KeyCode::Char(c)));
    }
}

pub fn refresh_count(effect: &Effect) -> usize {
    effect
        .tasks()
        .into_iter()
        .filter(|task| **task == Task::Refresh)
        .count()
}

/// Firewall double that records every invocation
///
/// Status queries answer with the fixtures above; everything else succeeds
/// with a short message unless its argument string starts with `fail_on`.
#[derive(Default)]
pub struct FakeFirewall {
    calls: Mutex<Vec<String>>,
    fail_on: Option<String>,
}

impl FakeFirewall {
    pub fn failing_on(prefix: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: Some(prefix.to_string()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Firewall for FakeFirewall {
    fn execute(&self, args: &[&str]) -> Result<String> {
        let joined = args.join(" ");
        self.calls.lock().unwrap().push(joined.clone());

        if self.fail_on.as_ref().is_some_and(|p| joined.starts_with(p.as_str())) {
            return Err(Error::Ufw {
                message: format!("ufw {joined} failed"),
                stderr: Some("ERROR: You need to be root to run this script".to_string()),
                exit_code: Some(1),
            });
        }

        Ok(match args {
            ["status", "verbose"] => ACTIVE_STATUS.to_string(),
            ["status", "numbered"] => NUMBERED_STATUS.to_string(),
            ["app", "list"] => "Available applications:\n  OpenSSH\n".to_string(),
            ["app", "info", name] => {
                format!("Profile: {name}\nTitle: Secure shell\nDescription: ssh\n\nPort:\n  22/tcp\n")
            }
            ["--force", "delete", position] => format!("Deleting rule {position}\nRule deleted\n"),
            _ => format!("{joined} ok\n"),
        })
    }
}
