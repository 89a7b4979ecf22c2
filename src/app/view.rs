//! Text projection of [`State`]
//!
//! [`render`] is pure: the same state always yields the same lines. Fitting
//! the lines to the terminal is the painter's job.

use crate::app::handlers::{DefaultsScreen, ProfilePane, ProfilesScreen, ShowScreen};
use crate::app::lists::MultiSelectableList;
use crate::app::rule_form::RuleForm;
use crate::app::{Screen, State};
use crate::core::status::RuleRow;

pub const BUSY_TEXT: &str = "Running command, please wait...";
pub const DELETE_HELP: &str = "↑↓ to navigate, d to delete, Space to select, Esc to cancel";
pub const PROFILES_HELP: &str =
    "Tab to switch pane, ↑↓ to navigate, Enter to install, d to delete, Esc to cancel";
pub const SHOW_HELP: &str = "↑↓ to navigate, Enter to select, Esc to cancel";
pub const REPORT_HELP: &str = "↑↓ PgUp PgDn to scroll, q to close, Esc to cancel";

/// Width of the menu column on the home screen
const MENU_WIDTH: usize = 30;

fn focus_prefix(focused: bool) -> &'static str {
    if focused { "> " } else { "  " }
}

pub fn render(state: &State) -> Vec<String> {
    if state.is_busy() {
        return vec![BUSY_TEXT.to_string()];
    }

    let mut lines = match (&state.screen, state.screen.dialog()) {
        (_, Some(dialog)) => dialog.render(),
        (Screen::Home { .. }, None) => render_home(state),
        (Screen::CreateRule(form), None) => render_form(form),
        (Screen::DeleteRule { rules, .. }, None) => render_delete(rules),
        (Screen::Profiles(screen), None) => render_profiles(screen),
        (Screen::SetDefaults(screen), None) => render_defaults(screen),
        (Screen::ShowOutput(screen), None) => render_show(screen),
    };

    if !state.notification.is_empty() {
        // ufw output spans several lines; each gets its own row
        lines.push(String::new());
        lines.extend(state.notification.lines().map(ToString::to_string));
    }
    lines
}

fn render_home(state: &State) -> Vec<String> {
    let mut menu = vec![String::new(), "UFW Firewall Menu:".to_string(), String::new()];
    menu.extend(
        state
            .menu
            .iter_focus()
            .map(|(item, focused)| format!("{}{}", focus_prefix(focused), item.title())),
    );

    let status: Vec<&str> = state.status_text.lines().collect();
    let height = menu.len().max(status.len());

    (0..height)
        .map(|row| {
            let left = menu.get(row).map_or("", String::as_str);
            let right = status.get(row).copied().unwrap_or_default();
            format!("{left:<width$} | {right}", width = MENU_WIDTH).trim_end().to_string()
        })
        .collect()
}

fn render_form(form: &RuleForm) -> Vec<String> {
    let mut lines = vec!["Create rule:".to_string(), String::new()];
    lines.extend(form.render());
    lines
}

fn render_delete(rules: &MultiSelectableList<RuleRow>) -> Vec<String> {
    let mut lines = vec!["Focus rule to delete:".to_string(), String::new()];
    if rules.is_empty() {
        lines.push("No rules".to_string());
    }
    lines.extend(rules.iter_marks().map(|(row, focused, selected)| {
        let mark = if selected { "* " } else { "  " };
        format!("{}{mark}{}", focus_prefix(focused), row.line)
    }));
    lines.push(String::new());
    lines.push(DELETE_HELP.to_string());
    lines
}

fn render_profiles(screen: &ProfilesScreen) -> Vec<String> {
    if !screen.loaded {
        return vec!["Loading profiles...".to_string()];
    }

    let mut lines = Vec::new();
    for (pane, list) in [
        (ProfilePane::Installed, &screen.installed),
        (ProfilePane::Available, &screen.available),
    ] {
        let active = screen.pane == pane;
        let marker = if active { " [active]" } else { "" };
        lines.push(format!("{}:{marker}", pane.title()));
        if list.is_empty() {
            lines.push("  (none)".to_string());
        }
        lines.extend(list.iter_focus().map(|(profile, focused)| {
            format!(
                "{}{} - {} ({})",
                focus_prefix(active && focused),
                profile.name,
                profile.title,
                profile.ports_label()
            )
        }));
        lines.push(String::new());
    }
    lines.push(PROFILES_HELP.to_string());
    lines
}

fn render_defaults(screen: &DefaultsScreen) -> Vec<String> {
    let mut lines = vec!["Default policies:".to_string(), String::new()];
    lines.extend(screen.rows.iter_focus().map(|(row, focused)| {
        format!(
            "{}{}: {}",
            focus_prefix(focused),
            row.direction.display_name(),
            row.policy
        )
    }));
    lines.push(String::new());
    lines.push(crate::app::handlers::settings::DEFAULTS_HELP.to_string());
    lines
}

fn render_show(screen: &ShowScreen) -> Vec<String> {
    if let Some(report) = &screen.report {
        let mut lines = vec![format!("ufw show {}:", report.kind), String::new()];
        lines.extend(report.lines.iter().skip(report.scroll).cloned());
        lines.push(String::new());
        lines.push(REPORT_HELP.to_string());
        return lines;
    }

    let mut lines = vec!["Select show type:".to_string(), String::new()];
    lines.extend(
        screen
            .options
            .iter_focus()
            .map(|(kind, focused)| format!("{}{}", focus_prefix(focused), kind.display_name())),
    );
    lines.push(String::new());
    lines.push(SHOW_HELP.to_string());
    lines
}
