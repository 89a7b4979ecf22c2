//! Home menu and whole-firewall policy switches

use crate::app::dialog::ConfirmDialog;
use crate::app::handlers::output_notice;
use crate::app::handlers::{DefaultsScreen, ProfilesScreen, ShowScreen};
use crate::app::lists::MultiSelectableList;
use crate::app::menu::MenuItem;
use crate::app::rule_form::RuleForm;
use crate::app::{Effect, Screen, State, Task};
use crate::core::rule::PolicyAction;
use crate::core::status::parse_default_policies;
use crossterm::event::{KeyCode, KeyEvent};
use tracing::{debug, info, warn};

pub(crate) fn handle_home_key(state: &mut State, key: &KeyEvent) -> Effect {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => state.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => state.menu.next(),
        KeyCode::Enter => return activate_menu_item(state),
        _ => {}
    }
    Effect::None
}

fn activate_menu_item(state: &mut State) -> Effect {
    let Some(item) = state.menu.focused().copied() else {
        return Effect::None;
    };
    debug!("Menu item selected: {:?}", item);

    match item {
        MenuItem::Reset => {
            state.screen = Screen::Home {
                dialog: Some(ConfirmDialog::new("Are you sure you want to reset UFW?")),
            };
            Effect::None
        }
        MenuItem::Enable => state.spawn(Task::Policy(PolicyAction::Enable)),
        MenuItem::Disable => state.spawn(Task::Policy(PolicyAction::Disable)),
        MenuItem::EnableLogging => state.spawn(Task::Policy(PolicyAction::EnableLogging)),
        MenuItem::DisableLogging => state.spawn(Task::Policy(PolicyAction::DisableLogging)),
        MenuItem::CreateRule => {
            state.screen = Screen::CreateRule(RuleForm::new(&state.interfaces));
            Effect::None
        }
        MenuItem::DeleteRule => {
            state.screen = Screen::DeleteRule {
                rules: MultiSelectableList::new(state.rules.clone()),
                dialog: None,
                pending: Vec::new(),
            };
            Effect::None
        }
        MenuItem::SetDefaults => match parse_default_policies(&state.status_text) {
            Ok(entries) => {
                state.screen = Screen::SetDefaults(DefaultsScreen::new(entries));
                Effect::None
            }
            Err(e) => {
                warn!("Cannot open default policies: {}", e);
                state.set_notification(e)
            }
        },
        MenuItem::Profiles => {
            state.screen = Screen::Profiles(ProfilesScreen::default());
            state.spawn(Task::LoadProfiles)
        }
        MenuItem::Show => {
            state.screen = Screen::ShowOutput(ShowScreen::default());
            Effect::None
        }
        MenuItem::Quit => Effect::Quit,
    }
}

pub(crate) fn handle_policy_applied(
    state: &mut State,
    action: PolicyAction,
    result: Result<String, String>,
) -> Effect {
    match result {
        Ok(output) => {
            info!("ufw {} succeeded", action);
            if action == PolicyAction::Disable {
                state.menu.focus_first();
            }
            let refresh = state.spawn(Task::Refresh);
            let notice = state.set_notification(output_notice(&output, &format!("ufw {action} done")));
            Effect::batch([refresh, notice])
        }
        Err(e) => {
            warn!("ufw {} failed: {}", action, e);
            state.set_notification(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::handlers::test_utils::{create_test_state, key, refresh_count};
    use crate::app::{Message, View};

    #[test]
    fn test_menu_navigation_wraps() {
        let mut state = create_test_state();
        state.update(key(KeyCode::Up));
        assert_eq!(state.menu.focused(), Some(&MenuItem::Quit));
        state.update(key(KeyCode::Char('j')));
        assert_eq!(state.menu.focused(), Some(&MenuItem::Disable));
    }

    #[test]
    fn test_policy_items_spawn_blocking_tasks() {
        let mut state = create_test_state();
        state.menu.focus_item(&MenuItem::DisableLogging);
        let effect = state.update(key(KeyCode::Enter));
        assert_eq!(
            effect,
            Effect::Spawn(Task::Policy(PolicyAction::DisableLogging))
        );
        assert!(state.is_busy());
    }

    #[test]
    fn test_create_rule_gets_fresh_form() {
        let mut state = create_test_state();
        state.menu.focus_item(&MenuItem::CreateRule);
        state.update(key(KeyCode::Enter));
        state.update(key(KeyCode::Char('8')));
        state.update(key(KeyCode::Esc));

        state.update(key(KeyCode::Enter));
        let Screen::CreateRule(form) = &state.screen else {
            panic!("expected the rule form");
        };
        assert_eq!(*form, RuleForm::new(&state.interfaces));
    }

    #[test]
    fn test_set_defaults_with_unparseable_status() {
        let mut state = create_test_state();
        state.status_text = "Status: active\n".to_string();
        state.menu.focus_item(&MenuItem::SetDefaults);

        let effect = state.update(key(KeyCode::Enter));
        assert_eq!(state.view(), View::Home);
        assert!(matches!(effect, Effect::ExpireNotification(_)));
        assert!(state.notification.contains("default policies"));
    }

    #[test]
    fn test_quit_item() {
        let mut state = create_test_state();
        state.menu.focus_item(&MenuItem::Quit);
        assert_eq!(state.update(key(KeyCode::Enter)), Effect::Quit);
    }

    #[test]
    fn test_disable_completion_refocuses_and_refreshes() {
        let mut state = create_test_state();
        state.menu.focus_item(&MenuItem::Disable);
        state.update(key(KeyCode::Enter));
        state.menu.focus_item(&MenuItem::Show);

        let effect = state.update(Message::PolicyApplied {
            action: PolicyAction::Disable,
            result: Ok("Firewall stopped and disabled on system startup\n".to_string()),
        });
        assert_eq!(state.pending_commands, 0);
        assert_eq!(state.menu.focus_index(), Some(0));
        assert_eq!(refresh_count(&effect), 1);
        assert_eq!(
            state.notification,
            "Firewall stopped and disabled on system startup"
        );
    }

    #[test]
    fn test_policy_failure_notifies_without_refresh() {
        let mut state = create_test_state();
        state.pending_commands = 1;
        let effect = state.update(Message::PolicyApplied {
            action: PolicyAction::Enable,
            result: Err("Insufficient permissions".to_string()),
        });
        assert_eq!(refresh_count(&effect), 0);
        assert_eq!(state.notification, "Insufficient permissions");
        assert!(!state.is_busy());
    }

    #[test]
    fn test_empty_output_uses_fallback_notice() {
        let mut state = create_test_state();
        state.pending_commands = 1;
        state.update(Message::PolicyApplied {
            action: PolicyAction::EnableLogging,
            result: Ok(String::new()),
        });
        assert_eq!(state.notification, "ufw logging on done");
    }
}
