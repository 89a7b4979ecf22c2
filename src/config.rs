use crate::utils::get_config_dir;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that replaces [`AppConfig::ufw_command`]
pub const UFW_COMMAND_ENV: &str = "FWTUI_UFW_COMMAND";

const CONFIG_FILE: &str = "config.json";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// Program invoked for every firewall operation
    #[serde(default = "default_ufw_command")]
    pub ufw_command: String,
    /// Where installed application profiles are written
    #[serde(default = "default_profiles_dir")]
    pub profiles_dir: PathBuf,
    /// How long a notification stays visible (default: 10s, clamped to 1..=300)
    #[serde(default = "default_notification_timeout")]
    pub notification_timeout_secs: u64,
    /// Append every mutating action to the audit log
    #[serde(default = "default_true")]
    pub enable_audit_log: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ufw_command: default_ufw_command(),
            profiles_dir: default_profiles_dir(),
            notification_timeout_secs: default_notification_timeout(),
            enable_audit_log: true,
        }
    }
}

impl AppConfig {
    pub fn notification_timeout(&self) -> Duration {
        Duration::from_secs(self.notification_timeout_secs.clamp(1, 300))
    }

    /// Applies `FWTUI_UFW_COMMAND` if it is set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(command) = std::env::var(UFW_COMMAND_ENV)
            && !command.trim().is_empty()
        {
            self.ufw_command = command;
        }
        self
    }
}

fn default_ufw_command() -> String {
    "ufw".to_string()
}

fn default_profiles_dir() -> PathBuf {
    PathBuf::from("/etc/ufw/applications.d")
}

fn default_notification_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

pub fn config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Saves the config to `path` using an atomic write pattern.
/// 1. Writes to a temporary file.
/// 2. Sets restrictive permissions (0o600).
/// 3. Atomically renames to the target path.
///
/// # Async
/// Uses `tokio::fs` for non-blocking I/O to avoid blocking the event loop.
pub async fn save_config_to(config: &AppConfig, path: &Path) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(config)?;

    let mut temp_path = path.to_path_buf();
    temp_path.set_extension("json.tmp");

    // Create file with restrictive permissions from the start to prevent
    // race condition where file is briefly world-readable
    #[cfg(unix)]
    {
        use tokio::fs::OpenOptions;
        use tokio::io::AsyncWriteExt;

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .mode(0o600) // Set permissions BEFORE any data is written
            .open(&temp_path)
            .await?;

        file.write_all(json.as_bytes()).await?;
        file.sync_all().await?;
    }

    #[cfg(not(unix))]
    {
        use tokio::io::AsyncWriteExt;

        let mut file = tokio::fs::File::create(&temp_path).await?;
        file.write_all(json.as_bytes()).await?;
        file.sync_all().await?;
    }

    tokio::fs::rename(temp_path, path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::StorageFull {
            std::io::Error::new(
                std::io::ErrorKind::StorageFull,
                "Disk full: cannot save configuration. Free up space and try again.",
            )
        } else {
            e
        }
    })
}

/// Loads the config from `path`, falling back to defaults when the file is
/// missing or malformed.
pub async fn load_config_from(path: &Path) -> AppConfig {
    match tokio::fs::read_to_string(path).await {
        Ok(json) => serde_json::from_str::<AppConfig>(&json).unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed config {}: {}", path.display(), e);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

/// Loads the user config (with environment overrides applied).
///
/// On first run the defaults are written out so the operator has a file to
/// edit.
pub async fn load_config() -> AppConfig {
    let Some(path) = config_path() else {
        return AppConfig::default().with_env_overrides();
    };

    let config = load_config_from(&path).await;
    if !tokio::fs::try_exists(&path).await.unwrap_or(true)
        && let Err(e) = save_config_to(&config, &path).await
    {
        tracing::warn!("Could not write default config to {}: {}", path.display(), e);
    }

    config.with_env_overrides()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::ENV_VAR_MUTEX;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.ufw_command, "ufw");
        assert_eq!(config.profiles_dir, PathBuf::from("/etc/ufw/applications.d"));
        assert_eq!(config.notification_timeout(), Duration::from_secs(10));
        assert!(config.enable_audit_log);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"ufw_command": "/usr/sbin/ufw"}"#).unwrap();
        assert_eq!(config.ufw_command, "/usr/sbin/ufw");
        assert_eq!(config.notification_timeout_secs, 10);
        assert!(config.enable_audit_log);
    }

    #[test]
    fn test_notification_timeout_is_clamped() {
        let mut config = AppConfig {
            notification_timeout_secs: 0,
            ..AppConfig::default()
        };
        assert_eq!(config.notification_timeout(), Duration::from_secs(1));
        config.notification_timeout_secs = 100_000;
        assert_eq!(config.notification_timeout(), Duration::from_secs(300));
    }

    #[test]
    fn test_env_override() {
        let _guard = ENV_VAR_MUTEX.lock().unwrap();
        unsafe {
            std::env::set_var(UFW_COMMAND_ENV, "/tmp/mock-ufw");
        }
        let config = AppConfig::default().with_env_overrides();
        unsafe {
            std::env::remove_var(UFW_COMMAND_ENV);
        }
        assert_eq!(config.ufw_command, "/tmp/mock-ufw");
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = AppConfig {
            ufw_command: "/opt/ufw".to_string(),
            notification_timeout_secs: 3,
            ..AppConfig::default()
        };

        save_config_to(&config, &path).await.unwrap();
        assert_eq!(load_config_from(&path).await, config);
        assert!(!dir.path().join("config.json.tmp").exists());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[tokio::test]
    async fn test_malformed_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_config_from(&path).await, AppConfig::default());
    }
}
