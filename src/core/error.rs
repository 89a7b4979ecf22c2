use thiserror::Error;

/// Core error types for fwtui
#[derive(Debug, Error)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// ufw exited unsuccessfully
    #[error("ufw error: {message}")]
    Ufw {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    /// Input validation failed
    #[error(transparent)]
    Validation(#[from] crate::validators::ValidationError),

    /// Application profile operation failed
    #[error(transparent)]
    Profile(#[from] crate::core::profiles::ProfileError),

    /// Internal logic error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Short text suitable for the notification line.
    ///
    /// ufw failures are run through [`UfwErrorPattern`] so the operator sees
    /// what to do rather than a raw stderr dump.
    pub fn user_message(&self) -> String {
        match self {
            Error::Ufw {
                message, stderr, ..
            } => {
                let raw = stderr.as_deref().unwrap_or(message);
                UfwErrorPattern::match_error(raw).summary()
            }
            other => other.to_string(),
        }
    }
}

/// Represents a translated error with helpful context
#[derive(Debug, Clone)]
pub struct ErrorTranslation {
    pub user_message: String,
    pub suggestions: Vec<String>,
}

impl ErrorTranslation {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            user_message: message.into(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Message plus the first suggestion, on one line.
    pub fn summary(&self) -> String {
        match self.suggestions.first() {
            Some(hint) => format!("{} ({hint})", self.user_message),
            None => self.user_message.clone(),
        }
    }
}

/// Known ufw failure messages and their translations
pub struct UfwErrorPattern;

impl UfwErrorPattern {
    /// Matches an error message against known patterns and returns a user-friendly translation.
    pub fn match_error(msg: &str) -> ErrorTranslation {
        let lower = msg.to_lowercase();

        if lower.contains("you need to be root") || lower.contains("permission denied") {
            return ErrorTranslation::new("Insufficient permissions to modify the firewall")
                .with_suggestion("Run fwtui with sudo")
                .with_suggestion("Check that the ufw binary is owned by root");
        }

        if lower.contains("could not find a profile matching") {
            return ErrorTranslation::new("Application profile not found")
                .with_suggestion("Install the profile from the Profiles view first")
                .with_suggestion("List known profiles: ufw app list");
        }

        if lower.contains("bad port") || lower.contains("invalid port") {
            return ErrorTranslation::new("Invalid port or port range")
                .with_suggestion("Port numbers must be between 1 and 65535")
                .with_suggestion("Port ranges need an explicit protocol (TCP or UDP)");
        }

        if lower.contains("could not find executable") || lower.contains("command not found") {
            return ErrorTranslation::new("ufw is not installed or not found in PATH")
                .with_suggestion("Install ufw: sudo apt install ufw  (Debian/Ubuntu)")
                .with_suggestion("Or set ufw_command in the fwtui config file");
        }

        if lower.contains("problem running") {
            return ErrorTranslation::new("ufw failed to load the rule set")
                .with_suggestion("Inspect /etc/ufw/user.rules for syntax errors")
                .with_suggestion("Check the kernel log: dmesg | grep -i ufw");
        }

        if lower.contains("skipping") {
            return ErrorTranslation::new("Rule already exists, nothing changed");
        }

        if lower.contains("invalid") && (lower.contains("address") || lower.contains("ip")) {
            return ErrorTranslation::new("Invalid IP address or network")
                .with_suggestion("Use 192.168.1.1 or 192.168.1.0/24 (IPv6: 2001:db8::/32)");
        }

        if lower.contains("interface") {
            return ErrorTranslation::new("Network interface rejected by ufw")
                .with_suggestion("Check available interfaces: ip link show");
        }

        let first_line = msg.lines().next().unwrap_or(msg).trim();
        ErrorTranslation::new(format!("ufw error: {first_line}"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
