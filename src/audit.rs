//! Audit trail of firewall mutations
//!
//! Each policy switch, rule change, default-policy change and profile
//! install or removal becomes one JSON line in `<state dir>/audit.log`.
//! Reads (`status`, `show`, profile listings) are not recorded.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    PolicyAction,
    AddRule,
    DeleteRules,
    SetDefault,
    CreateProfile,
    DeleteProfile,
}

/// One line of the audit log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub event_type: EventType,
    pub success: bool,
    /// Task arguments: the command line, positions or profile name
    pub details: serde_json::Value,
    /// ufw's translated failure text
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AuditLog {
    file: PathBuf,
}

impl AuditLog {
    /// The log in the XDG state directory
    pub fn new() -> std::io::Result<Self> {
        crate::utils::get_state_dir()
            .map(|dir| Self::at(dir.join("audit.log")))
            .ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::NotFound, "State directory not found")
            })
    }

    pub fn at(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into() }
    }

    /// Appends one event stamped now. A failed write never fails the task
    /// that produced it, so it is only logged.
    pub async fn record(
        &self,
        event_type: EventType,
        success: bool,
        details: serde_json::Value,
        error: Option<String>,
    ) {
        let event = AuditEvent {
            timestamp: chrono::Utc::now(),
            event_type,
            success,
            details,
            error,
        };
        if let Err(e) = self.append(&event).await {
            tracing::warn!("Failed to write audit log {}: {}", self.file.display(), e);
        }
    }

    async fn append(&self, event: &AuditEvent) -> std::io::Result<()> {
        let mut line = serde_json::to_vec(event)?;
        line.push(b'\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file)
            .await?;
        // One write per event keeps lines whole
        file.write_all(&line).await?;
        file.sync_all().await
    }
}

/// Every event in the log at `file`, oldest first.
#[cfg(test)]
pub(crate) async fn read_events(file: &std::path::Path) -> Vec<AuditEvent> {
    tokio::fs::read_to_string(file)
        .await
        .unwrap_or_default()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}
