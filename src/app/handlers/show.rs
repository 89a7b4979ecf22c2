//! `ufw show` reports
//!
//! The options list picks a report; its output opens as a scrollable page
//! inside the same view. `q` closes the page, Esc leaves the view.

use crate::app::lists::SelectableList;
use crate::app::{Effect, Screen, State, Task};
use crate::core::rule::ReportKind;
use crossterm::event::{KeyCode, KeyEvent};
use strum::IntoEnumIterator;
use tracing::{info, warn};

/// Lines moved by PageUp/PageDown
const PAGE: isize = 10;

/// Output of one report, scrolled by whole lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub kind: ReportKind,
    pub lines: Vec<String>,
    /// Index of the first visible line
    pub scroll: usize,
}

impl Report {
    pub fn new(kind: ReportKind, output: &str) -> Self {
        Self {
            kind,
            lines: output.trim_end().lines().map(ToString::to_string).collect(),
            scroll: 0,
        }
    }

    fn scroll_by(&mut self, delta: isize) {
        let max = self.lines.len().saturating_sub(1);
        self.scroll = self.scroll.saturating_add_signed(delta).min(max);
    }
}

#[derive(Debug, Clone)]
pub struct ShowScreen {
    pub options: SelectableList<ReportKind>,
    pub report: Option<Report>,
}

impl Default for ShowScreen {
    fn default() -> Self {
        Self {
            options: SelectableList::new(ReportKind::iter().collect()),
            report: None,
        }
    }
}

pub(crate) fn handle_show_key(state: &mut State, key: &KeyEvent) -> Effect {
    let Screen::ShowOutput(screen) = &mut state.screen else {
        return Effect::None;
    };

    if let Some(report) = &mut screen.report {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => report.scroll_by(-1),
            KeyCode::Down | KeyCode::Char('j') => report.scroll_by(1),
            KeyCode::PageUp => report.scroll_by(-PAGE),
            KeyCode::PageDown => report.scroll_by(PAGE),
            KeyCode::Char('q') => screen.report = None,
            _ => {}
        }
        return Effect::None;
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => screen.options.prev(),
        KeyCode::Down | KeyCode::Char('j') => screen.options.next(),
        KeyCode::Enter => {
            if let Some(kind) = screen.options.focused().copied() {
                info!("Loading ufw show {}", kind);
                return state.spawn(Task::ShowReport(kind));
            }
        }
        _ => {}
    }
    Effect::None
}

pub(crate) fn handle_report_loaded(
    state: &mut State,
    kind: ReportKind,
    result: Result<String, String>,
) -> Effect {
    match result {
        Ok(output) => {
            if let Screen::ShowOutput(screen) = &mut state.screen {
                screen.report = Some(Report::new(kind, &output));
            }
            Effect::None
        }
        Err(e) => {
            warn!("ufw show {} failed: {}", kind, e);
            state.set_notification(e)
        }
    }
}
