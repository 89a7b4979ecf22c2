//! ufw process boundary
//!
//! [`Firewall`] is the seam between the interactive engine and the real
//! firewall tool. Every operation reduces to one invocation of the tool with
//! an explicit argument vector; nothing is ever passed through a shell.
//!
//! [`UfwCli`] is the process-backed implementation. Calls block, so callers on
//! the async side run them through `tokio::task::spawn_blocking`.

use crate::core::error::{Error, Result};
use crate::core::rule::{DefaultPolicy, PolicyAction, ReportKind, TrafficDirection};
use crate::validators::quote_comment;
use std::fmt;
use std::process::Command;
use tracing::{debug, warn};

/// A synthesized ufw command line
///
/// Arguments are stored unquoted and handed to the process as-is. The
/// `Display` form is the shell-safe rendering shown to the operator: the
/// argument following `comment` is single-quoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UfwCommand {
    args: Vec<String>,
}

impl UfwCommand {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for UfwCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ufw")?;
        let mut previous: Option<&str> = None;
        for arg in &self.args {
            if previous == Some("comment") {
                write!(f, " {}", quote_comment(arg))?;
            } else {
                write!(f, " {arg}")?;
            }
            previous = Some(arg);
        }
        Ok(())
    }
}

/// Firewall collaborator
///
/// Implementors only provide [`Firewall::execute`]; the named operations are
/// fixed argument vectors on top of it.
pub trait Firewall: Send + Sync {
    /// Runs ufw with `args` and returns its combined output.
    fn execute(&self, args: &[&str]) -> Result<String>;

    fn verbose_status(&self) -> Result<String> {
        self.execute(&["status", "verbose"])
    }

    fn numbered_rules(&self) -> Result<String> {
        self.execute(&["status", "numbered"])
    }

    /// Deletes the rule at 1-based `position` without ufw's y/n prompt.
    fn delete_rule(&self, position: usize) -> Result<String> {
        let position = position.to_string();
        self.execute(&["--force", "delete", &position])
    }

    fn apply_policy(&self, action: PolicyAction) -> Result<String> {
        self.execute(action.ufw_args())
    }

    fn set_default(&self, direction: TrafficDirection, policy: DefaultPolicy) -> Result<String> {
        self.execute(&["default", policy.as_ref(), direction.as_ref()])
    }

    fn run(&self, command: &UfwCommand) -> Result<String> {
        let args: Vec<&str> = command.args().iter().map(String::as_str).collect();
        self.execute(&args)
    }

    fn show(&self, kind: ReportKind) -> Result<String> {
        self.execute(&["show", kind.as_ref()])
    }

    /// Raw `ufw app list` output.
    fn profile_names(&self) -> Result<String> {
        self.execute(&["app", "list"])
    }

    /// Raw `ufw app info <name>` output.
    fn profile_info(&self, name: &str) -> Result<String> {
        self.execute(&["app", "info", name])
    }

    /// Makes ufw pick up a freshly written profile file.
    fn reload_profile(&self, name: &str) -> Result<String> {
        self.execute(&["app", "update", name])
    }
}

/// Runs the real ufw binary
#[derive(Debug, Clone)]
pub struct UfwCli {
    program: String,
}

impl UfwCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for UfwCli {
    fn default() -> Self {
        Self::new("ufw")
    }
}

impl Firewall for UfwCli {
    fn execute(&self, args: &[&str]) -> Result<String> {
        debug!("Running {} {}", self.program, args.join(" "));

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::Ufw {
                        message: format!("could not find executable '{}'", self.program),
                        stderr: None,
                        exit_code: None,
                    }
                } else {
                    Error::Io(e)
                }
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if output.status.success() {
            Ok(combined)
        } else {
            warn!(
                "{} {} exited with {}",
                self.program,
                args.join(" "),
                output.status
            );
            Err(Error::Ufw {
                message: format!("{} {} failed ({})", self.program, args.join(" "), output.status),
                stderr: Some(combined.trim().to_string()),
                exit_code: output.status.code(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every argument vector it is asked to run
    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl Firewall for Recorder {
        fn execute(&self, args: &[&str]) -> Result<String> {
            self.calls
                .lock()
                .unwrap()
                .push(args.iter().map(ToString::to_string).collect());
            Ok(String::new())
        }
    }

    #[test]
    fn test_display_quotes_comment_only() {
        let cmd = UfwCommand::new(["allow", "from", "any", "to", "any", "port", "22", "comment", "it's ssh"]);
        assert_eq!(
            cmd.to_string(),
            r"ufw allow from any to any port 22 comment 'it'\''s ssh'"
        );
        // The process still receives the raw comment
        assert_eq!(cmd.args().last().unwrap(), "it's ssh");
    }

    #[test]
    fn test_named_operations_argument_vectors() {
        let fw = Recorder::default();
        fw.delete_rule(7).unwrap();
        fw.apply_policy(PolicyAction::Reset).unwrap();
        fw.set_default(TrafficDirection::Incoming, DefaultPolicy::Deny)
            .unwrap();
        fw.show(ReportKind::Listening).unwrap();
        fw.reload_profile("Nginx Full").unwrap();

        let calls = fw.calls.lock().unwrap();
        assert_eq!(calls[0], ["--force", "delete", "7"]);
        assert_eq!(calls[1], ["--force", "reset"]);
        assert_eq!(calls[2], ["default", "deny", "incoming"]);
        assert_eq!(calls[3], ["show", "listening"]);
        assert_eq!(calls[4], ["app", "update", "Nginx Full"]);
    }

    #[test]
    fn test_missing_binary_is_reported_as_ufw_error() {
        let fw = UfwCli::new("/nonexistent/fwtui-test-ufw");
        let err = fw.verbose_status().unwrap_err();
        assert!(matches!(err, Error::Ufw { .. }));
        assert!(err.user_message().contains("not installed"));
    }
}
