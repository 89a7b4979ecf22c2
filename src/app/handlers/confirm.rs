//! Routing for the modal confirmation dialogs
//!
//! Home owns the reset confirmation; the delete view owns the deletion
//! confirmation. While either is open it receives every non-global key.

use crate::app::dialog::{ConfirmDialog, DialogOutcome};
use crate::app::{Effect, Screen, State, Task};
use crate::core::rule::PolicyAction;
use crossterm::event::KeyEvent;
use tracing::{debug, info};

pub(crate) fn handle_dialog_key(state: &mut State, key: &KeyEvent) -> Effect {
    let (outcome, task) = match &mut state.screen {
        Screen::Home { dialog } => match resolve(dialog, key) {
            Some(outcome) => (outcome, Some(Task::Policy(PolicyAction::Reset))),
            None => return Effect::None,
        },
        Screen::DeleteRule {
            dialog, pending, ..
        } => match resolve(dialog, key) {
            Some(outcome) => {
                let positions = std::mem::take(pending);
                let task = (!positions.is_empty()).then_some(Task::DeleteRules(positions));
                (outcome, task)
            }
            None => return Effect::None,
        },
        _ => return Effect::None,
    };

    debug!("Dialog resolved: {:?}", outcome);
    if outcome != DialogOutcome::Yes {
        return Effect::None;
    }

    match task {
        Some(task) => {
            info!("Confirmed: {:?}", task);
            state.spawn(task)
        }
        None => Effect::None,
    }
}

/// Feeds `key` to the open dialog. Resolved dialogs are dropped so they are
/// never queried again.
fn resolve(slot: &mut Option<ConfirmDialog>, key: &KeyEvent) -> Option<DialogOutcome> {
    let outcome = slot.as_mut()?.handle_key(key)?;
    *slot = None;
    Some(outcome)
}
