//! Default policy editor
//!
//! One row per chain ufw reports a policy for. Left/right edits the focused
//! row locally; Enter applies that single row with `ufw default`.

use crate::app::handlers::output_notice;
use crate::app::lists::SelectableList;
use crate::app::{Effect, Screen, State, Task};
use crate::core::rule::{DefaultPolicy, TrafficDirection};
use crate::core::status::DefaultPolicyEntry;
use crossterm::event::{KeyCode, KeyEvent};
use strum::IntoEnumIterator;
use tracing::{info, warn};

pub const DEFAULTS_HELP: &str = "↑↓ to navigate, ←→ to change policy, Enter to apply, Esc to cancel";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultRow {
    pub direction: TrafficDirection,
    pub policy: DefaultPolicy,
}

impl DefaultRow {
    fn cycle(&mut self, forward: bool) {
        let all: Vec<DefaultPolicy> = DefaultPolicy::iter().collect();
        let current = all.iter().position(|p| *p == self.policy).unwrap_or(0);
        let next = if forward {
            (current + 1) % all.len()
        } else {
            (current + all.len() - 1) % all.len()
        };
        self.policy = all[next];
    }
}

#[derive(Debug, Clone, Default)]
pub struct DefaultsScreen {
    pub rows: SelectableList<DefaultRow>,
}

impl DefaultsScreen {
    /// Editable rows for the reported policies. Disabled chains (routing
    /// on most hosts) are left out.
    pub fn new(entries: Vec<DefaultPolicyEntry>) -> Self {
        let rows = entries
            .into_iter()
            .filter_map(|entry| {
                entry.policy.map(|policy| DefaultRow {
                    direction: entry.direction,
                    policy,
                })
            })
            .collect();
        Self {
            rows: SelectableList::new(rows),
        }
    }
}

pub(crate) fn handle_defaults_key(state: &mut State, key: &KeyEvent) -> Effect {
    let Screen::SetDefaults(screen) = &mut state.screen else {
        return Effect::None;
    };

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => screen.rows.prev(),
        KeyCode::Down | KeyCode::Char('j') => screen.rows.next(),
        KeyCode::Left | KeyCode::Right => {
            if let Some(row) = screen.rows.focused_mut() {
                row.cycle(key.code == KeyCode::Right);
            }
        }
        KeyCode::Enter => {
            if let Some(row) = screen.rows.focused().copied() {
                info!("Setting default {} policy to {}", row.direction, row.policy);
                return state.spawn(Task::SetDefault {
                    direction: row.direction,
                    policy: row.policy,
                });
            }
        }
        _ => {}
    }
    Effect::None
}

pub(crate) fn handle_defaults_updated(state: &mut State, result: Result<String, String>) -> Effect {
    match result {
        Ok(output) => {
            let refresh = state.spawn(Task::Refresh);
            let notice = state.set_notification(output_notice(&output, "Default policy updated"));
            Effect::batch([refresh, notice])
        }
        Err(e) => {
            warn!("Setting default policy failed: {}", e);
            state.set_notification(e)
        }
    }
}
