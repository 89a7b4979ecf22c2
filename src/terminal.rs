//! Terminal session and the interactive event loop
//!
//! The loop is the single consumer of an unbounded [`Message`] channel fed by
//! two producers: a std thread blocking on crossterm input, and the
//! [`TaskRunner`]'s completions. Each message is applied to [`State`] to
//! completion, its effect dispatched, and the screen repainted.

use crate::app::runner::TaskRunner;
use crate::app::view::render;
use crate::app::{Message, State};
use crate::audit::AuditLog;
use crate::config::AppConfig;
use crate::core::profiles::ProfileStore;
use crate::core::ufw::Firewall;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event};
use crossterm::style::Print;
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
};
use crossterm::{execute, queue};
use std::io::{self, Write};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Raw mode plus alternate screen, restored on drop
pub struct TerminalSession;

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        Ok(Self)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        // Always restore terminal to normal mode
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// Forwards terminal input until the loop goes away or input fails.
fn spawn_input_thread(sender: mpsc::UnboundedSender<Message>) {
    std::thread::spawn(move || {
        loop {
            let message = match event::read() {
                Ok(Event::Key(key)) => Message::Key(key),
                Ok(Event::Resize(..)) => Message::Resize,
                Ok(_) => continue,
                Err(e) => {
                    warn!("Reading terminal input failed: {}", e);
                    break;
                }
            };
            if sender.send(message).is_err() {
                break;
            }
        }
    });
}

/// Clips `line` to `width` characters.
fn fit_width(line: &str, width: u16) -> String {
    line.chars().take(usize::from(width)).collect()
}

/// Redraws the whole screen from `lines`, clipped to `size` (columns, rows).
pub fn paint(out: &mut impl Write, lines: &[String], size: (u16, u16)) -> io::Result<()> {
    let (width, height) = size;
    queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;
    for (row, line) in (0..height).zip(lines) {
        queue!(out, MoveTo(0, row), Print(fit_width(line, width)))?;
    }
    out.flush()
}

/// Runs the interactive session until the operator quits.
pub async fn run(
    config: &AppConfig,
    firewall: Arc<dyn Firewall>,
    profiles: Arc<dyn ProfileStore>,
    audit: Option<AuditLog>,
) -> io::Result<()> {
    let (sender, mut receiver) = mpsc::unbounded_channel();
    let runner = TaskRunner::new(firewall, profiles, audit, sender.clone());
    let (mut state, initial) = State::new(config);

    let _session = TerminalSession::enter()?;
    spawn_input_thread(sender);
    let mut out = io::stdout();

    info!("Interactive session started");
    paint(&mut out, &render(&state), terminal::size()?)?;
    if runner.dispatch(initial).is_break() {
        return Ok(());
    }

    while let Some(message) = receiver.recv().await {
        let effect = state.update(message);
        if runner.dispatch(effect).is_break() {
            debug!("Quit requested");
            break;
        }
        paint(&mut out, &render(&state), terminal::size()?)?;
    }

    info!("Interactive session ended");
    Ok(())
}
