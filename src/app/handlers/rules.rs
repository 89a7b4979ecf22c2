//! Rule creation and deletion
//!
//! - The create view feeds keys into its [`RuleForm`](crate::app::rule_form::RuleForm)
//!   and submits on Enter.
//! - The delete view deletes either the focused row or every selected row.
//!   ufw renumbers the remaining rules after each deletion, so positions are
//!   always deleted from the highest down.

use crate::app::dialog::ConfirmDialog;
use crate::app::handlers::output_notice;
use crate::app::lists::MultiSelectableList;
use crate::app::{Effect, Screen, State, Task};
use crate::core::status::RuleRow;
use crossterm::event::{KeyCode, KeyEvent};
use tracing::{debug, info, warn};

pub(crate) fn handle_create_rule_key(state: &mut State, key: &KeyEvent) -> Effect {
    let Screen::CreateRule(form) = &mut state.screen else {
        return Effect::None;
    };

    if key.code != KeyCode::Enter {
        form.handle_key(key);
        return Effect::None;
    }

    match form.build_command() {
        Ok(command) => {
            info!("Adding rule: {}", command);
            state.spawn(Task::AddRule(command))
        }
        Err(e) => {
            debug!("Rule form rejected: {}", e);
            state.set_notification(e.to_string())
        }
    }
}

pub(crate) fn handle_rule_created(state: &mut State, result: Result<String, String>) -> Effect {
    match result {
        Ok(output) => {
            state.screen = Screen::home();
            let refresh = state.spawn(Task::Refresh);
            let notice = state.set_notification(output_notice(&output, "Rule added"));
            Effect::batch([refresh, notice])
        }
        Err(e) => {
            // The form stays open so the operator can correct it
            warn!("Rule creation failed: {}", e);
            state.set_notification(e)
        }
    }
}

pub(crate) fn handle_delete_rule_key(state: &mut State, key: &KeyEvent) -> Effect {
    let Screen::DeleteRule {
        rules,
        dialog,
        pending,
    } = &mut state.screen
    else {
        return Effect::None;
    };

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => rules.prev(),
        KeyCode::Down | KeyCode::Char('j') => rules.next(),
        KeyCode::Char(' ') => rules.toggle(),
        KeyCode::Char('d') if !rules.is_empty() => {
            let prompt = if rules.none_selected() {
                "Are you sure you want to delete this rule?"
            } else {
                "Are you sure you want to delete selected rules?"
            };
            // A refresh may replace the rows before the answer arrives
            *pending = deletion_positions(rules);
            *dialog = Some(ConfirmDialog::new(prompt));
        }
        _ => {}
    }
    Effect::None
}

/// Positions to delete, highest first: the selected rows, or the focused
/// row when nothing is selected.
pub fn deletion_positions(rules: &MultiSelectableList<RuleRow>) -> Vec<usize> {
    if rules.none_selected() {
        return rules.focused().map(|row| vec![row.position]).unwrap_or_default();
    }

    let mut positions: Vec<usize> = rules
        .selected_indexes()
        .into_iter()
        .filter_map(|index| rules.items().get(index))
        .map(|row| row.position)
        .collect();
    positions.sort_unstable_by(|a, b| b.cmp(a));
    positions
}

pub(crate) fn handle_rules_deleted(state: &mut State, result: Result<String, String>) -> Effect {
    if let Screen::DeleteRule { rules, .. } = &mut state.screen {
        rules.focus_first();
    }

    // Refresh even on failure: earlier deletions in the batch may have landed
    let refresh = state.spawn(Task::Refresh);
    let notice = match result {
        Ok(output) => state.set_notification(output_notice(&output, "Rules deleted")),
        Err(e) => {
            warn!("Rule deletion failed: {}", e);
            state.set_notification(e)
        }
    };
    Effect::batch([refresh, notice])
}
