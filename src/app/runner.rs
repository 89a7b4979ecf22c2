//! Effect execution
//!
//! [`TaskRunner`] is the only place the interactive loop touches the outside
//! world. Every [`Task`] runs on tokio's blocking pool and comes back as
//! exactly one completion [`Message`]. Tasks hold a shared gate while they run,
//! so two ufw invocations never overlap and a refresh queued behind a mutation
//! always observes its result.

use crate::app::{Effect, Message, Snapshot, Task};
use crate::audit::{AuditLog, EventType};
use crate::core::error::Result;
use crate::core::profiles::ProfileStore;
use crate::core::status::parse_numbered_rules;
use crate::core::ufw::Firewall;
use crate::utils;
use serde_json::json;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};

pub struct TaskRunner {
    firewall: Arc<dyn Firewall>,
    profiles: Arc<dyn ProfileStore>,
    audit: Option<AuditLog>,
    sender: mpsc::UnboundedSender<Message>,
    gate: Arc<Mutex<()>>,
}

impl TaskRunner {
    pub fn new(
        firewall: Arc<dyn Firewall>,
        profiles: Arc<dyn ProfileStore>,
        audit: Option<AuditLog>,
        sender: mpsc::UnboundedSender<Message>,
    ) -> Self {
        Self {
            firewall,
            profiles,
            audit,
            sender,
            gate: Arc::new(Mutex::new(())),
        }
    }

    /// Starts the work `effect` describes. Breaks when the session should end.
    pub fn dispatch(&self, effect: Effect) -> ControlFlow<()> {
        for leaf in effect.into_vec() {
            match leaf {
                Effect::Quit => return ControlFlow::Break(()),
                Effect::Spawn(task) => self.spawn_task(task),
                Effect::ExpireNotification(delay) => self.schedule_expiry(delay),
                Effect::None | Effect::Batch(_) => {}
            }
        }
        ControlFlow::Continue(())
    }

    fn spawn_task(&self, task: Task) {
        info!("Dispatching {:?}", task);
        let firewall = Arc::clone(&self.firewall);
        let profiles = Arc::clone(&self.profiles);
        let audit = self.audit.clone();
        let sender = self.sender.clone();
        let gate = Arc::clone(&self.gate);

        tokio::spawn(async move {
            let _guard = gate.lock().await;
            let audit_entry = audit_entry(&task);
            let pending = task.clone();

            let message = match tokio::task::spawn_blocking(move || {
                execute(firewall.as_ref(), profiles.as_ref(), task)
            })
            .await
            {
                Ok(message) => message,
                Err(e) => failed(pending, format!("Internal error: {e}")),
            };

            if let (Some(audit), Some((event_type, details))) = (audit, audit_entry)
                && let Some(result) = message.command_result()
            {
                audit
                    .record(event_type, result.is_ok(), details, result.clone().err())
                    .await;
            }

            if sender.send(message).is_err() {
                debug!("Event loop closed; dropping completion");
            }
        });
    }

    fn schedule_expiry(&self, delay: Duration) {
        let sender = self.sender.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The loop may already be gone on quit
            let _ = sender.send(Message::NotificationExpired);
        });
    }
}

fn stringify<T>(result: Result<T>) -> std::result::Result<T, String> {
    result.map_err(|e| {
        warn!("{}", e);
        e.user_message()
    })
}

/// Runs `task` to completion on the current thread.
pub fn execute(firewall: &dyn Firewall, profiles: &dyn ProfileStore, task: Task) -> Message {
    match task {
        Task::Refresh => Message::Refreshed(stringify(refresh(firewall))),
        Task::Policy(action) => Message::PolicyApplied {
            action,
            result: stringify(firewall.apply_policy(action)),
        },
        Task::AddRule(command) => Message::RuleCreated(stringify(firewall.run(&command))),
        Task::DeleteRules(positions) => {
            Message::RulesDeleted(stringify(delete_rules(firewall, &positions)))
        }
        Task::LoadProfiles => Message::ProfilesLoaded(stringify(profiles.installed())),
        Task::InstallProfile(profile) => Message::ProfileChanged(stringify(profiles.create(&profile))),
        Task::DeleteProfile(name) => Message::ProfileChanged(stringify(profiles.delete(&name))),
        Task::SetDefault { direction, policy } => {
            Message::DefaultsUpdated(stringify(firewall.set_default(direction, policy)))
        }
        Task::ShowReport(kind) => Message::ReportLoaded {
            kind,
            result: stringify(firewall.show(kind)),
        },
    }
}

fn refresh(firewall: &dyn Firewall) -> Result<Snapshot> {
    let status_text = firewall.verbose_status()?;
    let numbered = firewall.numbered_rules()?;
    Ok(Snapshot {
        status_text,
        rules: parse_numbered_rules(&numbered),
        interfaces: utils::list_interfaces(),
    })
}

/// Deletes in the given order, stopping at the first failure. Output of every
/// completed deletion is kept.
fn delete_rules(firewall: &dyn Firewall, positions: &[usize]) -> Result<String> {
    let mut output = String::new();
    for &position in positions {
        debug!("Deleting rule {}", position);
        output.push_str(&firewall.delete_rule(position)?);
    }
    Ok(output)
}

/// Completion for a task whose worker died before producing one.
fn failed(task: Task, error: String) -> Message {
    match task {
        Task::Refresh => Message::Refreshed(Err(error)),
        Task::Policy(action) => Message::PolicyApplied {
            action,
            result: Err(error),
        },
        Task::AddRule(_) => Message::RuleCreated(Err(error)),
        Task::DeleteRules(_) => Message::RulesDeleted(Err(error)),
        Task::LoadProfiles => Message::ProfilesLoaded(Err(error)),
        Task::InstallProfile(_) | Task::DeleteProfile(_) => Message::ProfileChanged(Err(error)),
        Task::SetDefault { .. } => Message::DefaultsUpdated(Err(error)),
        Task::ShowReport(kind) => Message::ReportLoaded {
            kind,
            result: Err(error),
        },
    }
}

/// Audit classification; reads are not audited.
fn audit_entry(task: &Task) -> Option<(EventType, serde_json::Value)> {
    match task {
        Task::Refresh | Task::LoadProfiles | Task::ShowReport(_) => None,
        Task::Policy(action) => Some((
            EventType::PolicyAction,
            json!({ "action": action.to_string() }),
        )),
        Task::AddRule(command) => Some((
            EventType::AddRule,
            json!({ "command": command.to_string() }),
        )),
        Task::DeleteRules(positions) => Some((
            EventType::DeleteRules,
            json!({ "positions": positions }),
        )),
        Task::InstallProfile(profile) => Some((
            EventType::CreateProfile,
            json!({ "name": profile.name, "ports": profile.ports }),
        )),
        Task::DeleteProfile(name) => Some((EventType::DeleteProfile, json!({ "name": name }))),
        Task::SetDefault { direction, policy } => Some((
            EventType::SetDefault,
            json!({ "direction": direction.as_ref(), "policy": policy.as_ref() }),
        )),
    }
}
