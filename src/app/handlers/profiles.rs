//! Application profile management
//!
//! Two panes share the view: profiles ufw already knows about, and catalog
//! entries that are not installed yet. Both lists are rebuilt from every
//! [`Message::ProfilesLoaded`](crate::app::Message::ProfilesLoaded).

use crate::app::handlers::output_notice;
use crate::app::lists::SelectableList;
use crate::app::{Effect, Screen, State, Task};
use crate::core::profiles::{UfwProfile, installable};
use crossterm::event::{KeyCode, KeyEvent};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProfilePane {
    #[default]
    Available,
    Installed,
}

impl ProfilePane {
    pub const fn title(self) -> &'static str {
        match self {
            ProfilePane::Available => "Available profiles",
            ProfilePane::Installed => "Installed profiles",
        }
    }

    const fn other(self) -> Self {
        match self {
            ProfilePane::Available => ProfilePane::Installed,
            ProfilePane::Installed => ProfilePane::Available,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProfilesScreen {
    pub pane: ProfilePane,
    pub installed: SelectableList<UfwProfile>,
    pub available: SelectableList<UfwProfile>,
    /// False until the first listing arrives
    pub loaded: bool,
}

impl ProfilesScreen {
    /// Replaces both panes from the installed set.
    pub fn set_installed(&mut self, profiles: Vec<UfwProfile>) {
        self.available.set_items(installable(&profiles));
        self.installed.set_items(profiles);
        self.loaded = true;
    }

    fn active_list(&mut self) -> &mut SelectableList<UfwProfile> {
        match self.pane {
            ProfilePane::Available => &mut self.available,
            ProfilePane::Installed => &mut self.installed,
        }
    }
}

pub(crate) fn handle_profiles_key(state: &mut State, key: &KeyEvent) -> Effect {
    let Screen::Profiles(screen) = &mut state.screen else {
        return Effect::None;
    };

    let task = match key.code {
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
            screen.pane = screen.pane.other();
            debug!("Profiles pane: {:?}", screen.pane);
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            screen.active_list().prev();
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            screen.active_list().next();
            None
        }
        KeyCode::Enter if screen.pane == ProfilePane::Available => {
            screen.available.focused().cloned().map(Task::InstallProfile)
        }
        KeyCode::Char('d') if screen.pane == ProfilePane::Installed => screen
            .installed
            .focused()
            .map(|profile| Task::DeleteProfile(profile.name.clone())),
        _ => None,
    };

    match task {
        Some(task) => {
            info!("Profile action: {:?}", task);
            state.spawn(task)
        }
        None => Effect::None,
    }
}

pub(crate) fn handle_profiles_loaded(
    state: &mut State,
    result: Result<Vec<UfwProfile>, String>,
) -> Effect {
    match result {
        Ok(profiles) => {
            // A listing that lands after the operator left the view is stale
            if let Screen::Profiles(screen) = &mut state.screen {
                debug!("Loaded {} installed profiles", profiles.len());
                screen.set_installed(profiles);
            }
            Effect::None
        }
        Err(e) => {
            warn!("Listing profiles failed: {}", e);
            state.set_notification(e)
        }
    }
}

pub(crate) fn handle_profile_changed(state: &mut State, result: Result<String, String>) -> Effect {
    let notice = match result {
        Ok(output) => state.set_notification(output_notice(&output, "Profiles updated")),
        Err(e) => {
            warn!("Profile change failed: {}", e);
            state.set_notification(e)
        }
    };

    if state.view() == crate::app::View::Profiles {
        Effect::batch([notice, state.spawn(Task::LoadProfiles)])
    } else {
        notice
    }
}
