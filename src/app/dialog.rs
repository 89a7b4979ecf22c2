//! Yes/no confirmation prompt

use crossterm::event::{KeyCode, KeyEvent};

/// Terminal state of a [`ConfirmDialog`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    Yes,
    No,
    Cancelled,
}

/// A modal yes/no/cancel prompt
///
/// Starts pending. The first `y`, `n` or `Esc` resolves it and is reported
/// exactly once; after that every key is ignored. Owners drop the dialog as
/// soon as they see an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDialog {
    prompt: String,
    outcome: Option<DialogOutcome>,
}

impl ConfirmDialog {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            outcome: None,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn is_pending(&self) -> bool {
        self.outcome.is_none()
    }

    /// Returns the outcome on the key that resolves the dialog, `None`
    /// otherwise.
    pub fn handle_key(&mut self, key: &KeyEvent) -> Option<DialogOutcome> {
        if self.outcome.is_some() {
            return None;
        }

        let outcome = match key.code {
            KeyCode::Char('y' | 'Y') => DialogOutcome::Yes,
            KeyCode::Char('n' | 'N') => DialogOutcome::No,
            KeyCode::Esc => DialogOutcome::Cancelled,
            _ => return None,
        };
        self.outcome = Some(outcome);
        Some(outcome)
    }

    pub fn render(&self) -> Vec<String> {
        vec![
            self.prompt.clone(),
            String::new(),
            "y to confirm, n to decline, Esc to cancel".to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_outcomes() {
        for (code, expected) in [
            (KeyCode::Char('y'), DialogOutcome::Yes),
            (KeyCode::Char('Y'), DialogOutcome::Yes),
            (KeyCode::Char('n'), DialogOutcome::No),
            (KeyCode::Esc, DialogOutcome::Cancelled),
        ] {
            let mut dialog = ConfirmDialog::new("Sure?");
            assert_eq!(dialog.handle_key(&key(code)), Some(expected));
            assert!(!dialog.is_pending());
        }
    }

    #[test]
    fn test_other_keys_keep_pending() {
        let mut dialog = ConfirmDialog::new("Sure?");
        assert_eq!(dialog.handle_key(&key(KeyCode::Enter)), None);
        assert_eq!(dialog.handle_key(&key(KeyCode::Char('x'))), None);
        assert!(dialog.is_pending());
    }

    #[test]
    fn test_first_outcome_only() {
        let mut dialog = ConfirmDialog::new("Are you sure you want to reset UFW?");
        assert_eq!(
            dialog.handle_key(&key(KeyCode::Char('n'))),
            Some(DialogOutcome::No)
        );
        assert_eq!(dialog.handle_key(&key(KeyCode::Char('y'))), None);
        assert_eq!(dialog.handle_key(&key(KeyCode::Esc)), None);
    }
}
