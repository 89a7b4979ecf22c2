//! Interactive state machine
//!
//! [`State`] owns everything the screen shows. Input and task completions
//! arrive as [`Message`]s; [`State::update`] applies one message and returns
//! an [`Effect`] describing the follow-up work. Effects never run here: the
//! [`runner::TaskRunner`] executes them and feeds results back as messages,
//! so the whole controller is testable without a terminal or a firewall.

pub mod dialog;
pub mod handlers;
pub mod lists;
pub mod menu;
pub mod rule_form;
pub mod runner;
pub mod view;

use crate::config::AppConfig;
use crate::core::profiles::UfwProfile;
use crate::core::rule::{DefaultPolicy, PolicyAction, ReportKind, TrafficDirection};
use crate::core::status::{FirewallStatus, RuleRow};
use crate::core::ufw::UfwCommand;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use dialog::ConfirmDialog;
use handlers::{DefaultsScreen, ProfilesScreen, ShowScreen};
use lists::{MultiSelectableList, SelectableList};
use menu::{MenuItem, build_menu};
use rule_form::RuleForm;
use std::time::Duration;
use tracing::{debug, warn};

/// Result of a refresh: everything derived from live firewall state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub status_text: String,
    pub rules: Vec<RuleRow>,
    pub interfaces: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum Message {
    Key(KeyEvent),
    Resize,
    Refreshed(Result<Snapshot, String>),
    PolicyApplied {
        action: PolicyAction,
        result: Result<String, String>,
    },
    RuleCreated(Result<String, String>),
    RulesDeleted(Result<String, String>),
    ProfilesLoaded(Result<Vec<UfwProfile>, String>),
    ProfileChanged(Result<String, String>),
    DefaultsUpdated(Result<String, String>),
    ReportLoaded {
        kind: ReportKind,
        result: Result<String, String>,
    },
    NotificationExpired,
}

impl Message {
    /// Outcome of a finished command, for completions that carry one.
    pub fn command_result(&self) -> Option<&Result<String, String>> {
        match self {
            Message::PolicyApplied { result, .. }
            | Message::RuleCreated(result)
            | Message::RulesDeleted(result)
            | Message::ProfileChanged(result)
            | Message::DefaultsUpdated(result)
            | Message::ReportLoaded { result, .. } => Some(result),
            Message::Key(_)
            | Message::Resize
            | Message::Refreshed(_)
            | Message::ProfilesLoaded(_)
            | Message::NotificationExpired => None,
        }
    }
}

/// External work requested by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Re-read status, numbered rules and interfaces
    Refresh,
    Policy(PolicyAction),
    AddRule(UfwCommand),
    /// 1-based positions, already in the order they must be deleted
    DeleteRules(Vec<usize>),
    LoadProfiles,
    InstallProfile(UfwProfile),
    DeleteProfile(String),
    SetDefault {
        direction: TrafficDirection,
        policy: DefaultPolicy,
    },
    ShowReport(ReportKind),
}

impl Task {
    /// Blocking tasks raise the busy indicator until their completion
    /// arrives. Plain reads do not.
    pub fn is_blocking(&self) -> bool {
        !matches!(self, Task::Refresh | Task::LoadProfiles)
    }
}

/// Follow-up work returned by [`State::update`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    Spawn(Task),
    /// Deliver [`Message::NotificationExpired`] after the delay
    ExpireNotification(Duration),
    Batch(Vec<Effect>),
}

impl Effect {
    /// Combines effects, dropping `None`s and flattening nested batches.
    pub fn batch(effects: impl IntoIterator<Item = Effect>) -> Effect {
        let mut flat: Vec<Effect> = effects
            .into_iter()
            .flat_map(Effect::into_vec)
            .collect();
        match flat.len() {
            0 => Effect::None,
            1 => flat.pop().unwrap_or(Effect::None),
            _ => Effect::Batch(flat),
        }
    }

    /// The leaf effects, in order.
    pub fn into_vec(self) -> Vec<Effect> {
        match self {
            Effect::None => Vec::new(),
            Effect::Batch(effects) => effects.into_iter().flat_map(Effect::into_vec).collect(),
            other => vec![other],
        }
    }

    pub fn tasks(&self) -> Vec<&Task> {
        match self {
            Effect::Spawn(task) => vec![task],
            Effect::Batch(effects) => effects.iter().flat_map(Effect::tasks).collect(),
            Effect::None | Effect::Quit | Effect::ExpireNotification(_) => Vec::new(),
        }
    }
}

/// Kind of the active screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    CreateRule,
    DeleteRule,
    Profiles,
    SetDefaults,
    ShowOutput,
}

/// The active screen and the state that lives only as long as it does
#[derive(Debug, Clone)]
pub enum Screen {
    Home {
        dialog: Option<ConfirmDialog>,
    },
    CreateRule(RuleForm),
    DeleteRule {
        rules: MultiSelectableList<RuleRow>,
        dialog: Option<ConfirmDialog>,
        /// Positions fixed when the confirmation opened
        pending: Vec<usize>,
    },
    Profiles(ProfilesScreen),
    SetDefaults(DefaultsScreen),
    ShowOutput(ShowScreen),
}

impl Screen {
    pub fn home() -> Self {
        Screen::Home { dialog: None }
    }

    pub fn view(&self) -> View {
        match self {
            Screen::Home { .. } => View::Home,
            Screen::CreateRule(_) => View::CreateRule,
            Screen::DeleteRule { .. } => View::DeleteRule,
            Screen::Profiles(_) => View::Profiles,
            Screen::SetDefaults(_) => View::SetDefaults,
            Screen::ShowOutput(_) => View::ShowOutput,
        }
    }

    pub fn dialog(&self) -> Option<&ConfirmDialog> {
        match self {
            Screen::Home { dialog } | Screen::DeleteRule { dialog, .. } => dialog.as_ref(),
            _ => None,
        }
    }
}

pub struct State {
    pub screen: Screen,
    pub menu: SelectableList<MenuItem>,
    pub status_text: String,
    pub firewall_status: FirewallStatus,
    pub rules: Vec<RuleRow>,
    pub interfaces: Vec<String>,
    pub pending_commands: usize,
    pub notification: String,
    pub running_notifications: usize,
    pub notification_timeout: Duration,
}

impl State {
    /// Fresh state plus the initial refresh.
    pub fn new(config: &AppConfig) -> (Self, Effect) {
        let state = Self {
            screen: Screen::home(),
            menu: SelectableList::new(build_menu(FirewallStatus::default())),
            status_text: String::new(),
            firewall_status: FirewallStatus::default(),
            rules: Vec::new(),
            interfaces: Vec::new(),
            pending_commands: 0,
            notification: String::new(),
            running_notifications: 0,
            notification_timeout: config.notification_timeout(),
        };
        (state, Effect::Spawn(Task::Refresh))
    }

    pub fn view(&self) -> View {
        self.screen.view()
    }

    pub fn is_busy(&self) -> bool {
        self.pending_commands > 0
    }

    pub fn update(&mut self, message: Message) -> Effect {
        match message {
            Message::Key(key) => self.handle_key(&key),
            Message::Resize => Effect::None,
            Message::Refreshed(result) => self.handle_refreshed(result),
            Message::PolicyApplied { action, result } => {
                self.finish_command();
                handlers::handle_policy_applied(self, action, result)
            }
            Message::RuleCreated(result) => {
                self.finish_command();
                handlers::handle_rule_created(self, result)
            }
            Message::RulesDeleted(result) => {
                self.finish_command();
                handlers::handle_rules_deleted(self, result)
            }
            Message::ProfilesLoaded(result) => handlers::handle_profiles_loaded(self, result),
            Message::ProfileChanged(result) => {
                self.finish_command();
                handlers::handle_profile_changed(self, result)
            }
            Message::DefaultsUpdated(result) => {
                self.finish_command();
                handlers::handle_defaults_updated(self, result)
            }
            Message::ReportLoaded { kind, result } => {
                self.finish_command();
                handlers::handle_report_loaded(self, kind, result)
            }
            Message::NotificationExpired => {
                self.running_notifications = self.running_notifications.saturating_sub(1);
                if self.running_notifications == 0 {
                    self.notification.clear();
                }
                Effect::None
            }
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Effect {
        if key.kind == KeyEventKind::Release {
            return Effect::None;
        }

        if is_quit_key(key) {
            return Effect::Quit;
        }

        if self.is_busy() {
            return Effect::None;
        }

        if self.screen.dialog().is_some() {
            return handlers::handle_dialog_key(self, key);
        }

        if key.code == KeyCode::Esc && self.view() != View::Home {
            return self.go_home();
        }

        match self.view() {
            View::Home => handlers::handle_home_key(self, key),
            View::CreateRule => handlers::handle_create_rule_key(self, key),
            View::DeleteRule => handlers::handle_delete_rule_key(self, key),
            View::Profiles => handlers::handle_profiles_key(self, key),
            View::SetDefaults => handlers::handle_defaults_key(self, key),
            View::ShowOutput => handlers::handle_show_key(self, key),
        }
    }

    fn handle_refreshed(&mut self, result: Result<Snapshot, String>) -> Effect {
        match result {
            Ok(snapshot) => {
                self.apply_snapshot(snapshot);
                Effect::None
            }
            Err(e) => {
                warn!("Refresh failed: {}", e);
                self.set_notification(e)
            }
        }
    }

    /// Recomputes everything derived from the firewall's live state.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.firewall_status = FirewallStatus::parse(&snapshot.status_text);
        self.menu.set_items(build_menu(self.firewall_status));
        self.status_text = snapshot.status_text;
        self.interfaces = snapshot.interfaces;
        if let Screen::DeleteRule { rules, .. } = &mut self.screen {
            rules.set_items(snapshot.rules.clone());
        }
        self.rules = snapshot.rules;
    }

    /// Leaves the current screen for Home and refreshes shared state once.
    pub fn go_home(&mut self) -> Effect {
        debug!("Leaving {:?} for Home", self.view());
        self.screen = Screen::home();
        self.spawn(Task::Refresh)
    }

    /// Wraps `task` in an effect, counting it as running if it blocks.
    pub fn spawn(&mut self, task: Task) -> Effect {
        if task.is_blocking() {
            self.pending_commands += 1;
        }
        Effect::Spawn(task)
    }

    fn finish_command(&mut self) {
        if self.pending_commands == 0 {
            tracing::error!("Command completion without a running command");
        }
        self.pending_commands = self.pending_commands.saturating_sub(1);
    }

    /// Shows `text` and schedules its expiry. Overlapping notifications keep
    /// the line visible until the last one expires.
    pub fn set_notification(&mut self, text: impl Into<String>) -> Effect {
        self.notification = text.into();
        self.running_notifications += 1;
        Effect::ExpireNotification(self.notification_timeout)
    }
}

fn is_quit_key(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c' | 'd' | 'q'))
}
