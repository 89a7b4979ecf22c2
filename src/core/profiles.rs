//! ufw application profiles
//!
//! Installed profiles are discovered through `ufw app list` / `ufw app info`.
//! New ones are written as small INI-style files into ufw's applications
//! directory (normally `/etc/ufw/applications.d`) and then registered with
//! `ufw app update`.

use crate::core::error::Result;
use crate::core::ufw::Firewall;
use crate::validators::{ValidationError, validate_profile_name};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Error type for profile operations
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error(transparent)]
    InvalidName(#[from] ValidationError),

    #[error("profile {0} already exists")]
    AlreadyExists(String),

    #[error("Profile with title '{0}' not found")]
    NotFound(String),
}

/// One application profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UfwProfile {
    pub name: String,
    pub title: String,
    /// ufw port specs such as `80,443/tcp`
    pub ports: Vec<String>,
}

impl UfwProfile {
    pub fn new(name: &str, title: &str, ports: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            ports: ports.iter().map(ToString::to_string).collect(),
        }
    }

    /// Contents of the profile file ufw reads.
    pub fn to_file_contents(&self) -> String {
        format!(
            "[{name}]\ntitle={name}\ndescription={title}\nports={ports}\n",
            name = self.name,
            title = self.title,
            ports = self.ports.join("|")
        )
    }

    pub fn ports_label(&self) -> String {
        self.ports.join(", ")
    }
}

/// Well-known services offered for installation
pub fn catalog() -> Vec<UfwProfile> {
    vec![
        // Common access
        UfwProfile::new("OpenSSH", "Secure shell access (SSH)", &["22/tcp"]),
        UfwProfile::new("HTTP", "Generic HTTP service", &["80/tcp"]),
        UfwProfile::new("HTTPS", "Generic HTTPS service", &["443/tcp"]),
        // Web servers
        UfwProfile::new("Nginx HTTP", "Nginx web server (HTTP only)", &["80/tcp"]),
        UfwProfile::new("Nginx HTTPS", "Nginx web server (HTTPS only)", &["443/tcp"]),
        UfwProfile::new("Nginx Full", "Nginx web server (HTTP and HTTPS)", &["80,443/tcp"]),
        UfwProfile::new("Apache", "Apache web server (HTTP only)", &["80/tcp"]),
        UfwProfile::new("Apache Secure", "Apache web server (HTTPS only)", &["443/tcp"]),
        UfwProfile::new("Apache Full", "Apache web server (HTTP and HTTPS)", &["80,443/tcp"]),
        // Databases
        UfwProfile::new("PostgreSQL", "PostgreSQL database server", &["5432/tcp"]),
        UfwProfile::new("MySQL", "MySQL database server", &["3306/tcp"]),
        UfwProfile::new("MongoDB", "MongoDB database", &["27017/tcp"]),
        UfwProfile::new("Redis", "Redis key-value store", &["6379/tcp"]),
        UfwProfile::new("InfluxDB", "InfluxDB time series database", &["8086/tcp"]),
        UfwProfile::new("Elasticsearch", "Elasticsearch search engine", &["9200,9300/tcp"]),
        // Containers
        UfwProfile::new("Docker Remote API", "Docker remote API", &["2375,2376/tcp"]),
        UfwProfile::new("Kubernetes API", "Kubernetes API server", &["6443/tcp"]),
        UfwProfile::new(
            "Docker Swarm",
            "Docker Swarm cluster communication",
            &["2377,7946/tcp", "7946,4789/udp"],
        ),
        // VPN
        UfwProfile::new("WireGuard", "WireGuard VPN", &["51820/udp"]),
        UfwProfile::new("OpenVPN", "OpenVPN", &["1194/udp"]),
        // Mail
        UfwProfile::new("SMTP", "Simple Mail Transfer Protocol", &["25/tcp"]),
        UfwProfile::new("SMTPS", "SMTP over SSL", &["465/tcp"]),
        UfwProfile::new("Submission", "Mail Submission Agent", &["587/tcp"]),
        UfwProfile::new("IMAPS", "IMAP over SSL", &["993/tcp"]),
        UfwProfile::new("POP3S", "POP3 over SSL", &["995/tcp"]),
        // DNS
        UfwProfile::new("DNS", "Domain name System", &["53/tcp", "53/udp"]),
        // File sharing
        UfwProfile::new(
            "Samba",
            "Windows file/printer sharing (Samba)",
            &["137,138/udp", "139,445/tcp"],
        ),
        UfwProfile::new("NFS", "Network File System", &["111,2049/tcp", "111,2049/udp"]),
        // Misc
        UfwProfile::new("CUPS", "Common Unix Printing System", &["631/tcp"]),
        UfwProfile::new("VNC", "Virtual Network Computing (remote desktop)", &["5900/tcp"]),
        UfwProfile::new("Deluge", "Deluge BitTorrent client", &["6881/tcp", "6881/udp"]),
        UfwProfile::new("Prometheus", "Prometheus monitoring", &["9090/tcp"]),
        UfwProfile::new("Grafana", "Grafana dashboards", &["3000/tcp"]),
        UfwProfile::new("RabbitMQ", "RabbitMQ message broker", &["5672,15672/tcp"]),
        UfwProfile::new("Mosquitto", "Mosquitto MQTT broker", &["1883,8883/tcp"]),
    ]
}

/// Catalog entries whose name is not already installed.
pub fn installable(installed: &[UfwProfile]) -> Vec<UfwProfile> {
    catalog()
        .into_iter()
        .filter(|candidate| !installed.iter().any(|p| p.name == candidate.name))
        .collect()
}

/// Profile names from `ufw app list`. The first line is a heading.
pub fn parse_app_list(output: &str) -> Vec<String> {
    output
        .trim()
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Builds a profile from `ufw app info <name>`.
///
/// Port specs are the non-empty lines following the `Ports:` (or `Port:`)
/// heading.
pub fn parse_app_info(name: &str, output: &str) -> UfwProfile {
    let mut profile = UfwProfile {
        name: name.to_string(),
        title: String::new(),
        ports: Vec::new(),
    };

    let mut lines = output.lines().map(str::trim);
    while let Some(line) = lines.next() {
        if let Some(rest) = line.strip_prefix("Profile:") {
            profile.name = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix("Title:") {
            profile.title = rest.trim().to_string();
        } else if line.starts_with("Ports:") || line.starts_with("Port:") {
            profile.ports = lines
                .by_ref()
                .take_while(|l| !l.is_empty())
                .map(ToString::to_string)
                .collect();
        }
    }

    profile
}

/// Installed-profile collaborator
pub trait ProfileStore: Send + Sync {
    fn installed(&self) -> Result<Vec<UfwProfile>>;

    /// Installs `profile`; returns the text to notify.
    fn create(&self, profile: &UfwProfile) -> Result<String>;

    /// Removes the profile called `name`; returns the text to notify.
    fn delete(&self, name: &str) -> Result<String>;
}

/// Profile files in ufw's applications directory
pub struct FsProfileStore {
    dir: PathBuf,
    firewall: Arc<dyn Firewall>,
}

impl FsProfileStore {
    pub fn new(dir: impl Into<PathBuf>, firewall: Arc<dyn Firewall>) -> Self {
        Self {
            dir: dir.into(),
            firewall,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn profile_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.profile"))
    }
}

impl ProfileStore for FsProfileStore {
    fn installed(&self) -> Result<Vec<UfwProfile>> {
        let names = parse_app_list(&self.firewall.profile_names()?);
        let mut profiles = Vec::with_capacity(names.len());
        for name in names {
            match self.firewall.profile_info(&name) {
                Ok(info) => profiles.push(parse_app_info(&name, &info)),
                Err(e) => warn!("Skipping profile '{}': {}", name, e),
            }
        }
        Ok(profiles)
    }

    fn create(&self, profile: &UfwProfile) -> Result<String> {
        validate_profile_name(&profile.name).map_err(ProfileError::from)?;
        let path = self.profile_path(&profile.name);

        // create_new makes the existence check and the creation one step
        let mut options = fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }

        let mut file = match options.open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(ProfileError::AlreadyExists(profile.name.clone()).into());
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(profile.to_file_contents().as_bytes())?;
        file.sync_all()?;

        info!("Wrote profile file {}", path.display());
        self.firewall.reload_profile(&profile.name)?;
        Ok(format!("Profile {} created", profile.name))
    }

    fn delete(&self, name: &str) -> Result<String> {
        let header = format!("[{name}]");

        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Ok(contents) = fs::read_to_string(&path) else {
                continue;
            };
            if contents.lines().any(|line| line.trim() == header) {
                fs::remove_file(&path)?;
                info!("Removed profile file {}", path.display());
                return Ok(format!("Profile with title '{name}' deleted"));
            }
        }

        Err(ProfileError::NotFound(name.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Error;
    use std::sync::Mutex;

    const APP_LIST: &str = "Available applications:\n  CUPS\n  OpenSSH\n\n";

    const APP_INFO: &str = "Profile: OpenSSH\n\
Title: Secure shell server, an rshd replacement\n\
Description: OpenSSH is a free implementation of the Secure Shell protocol.\n\
\n\
Port:\n  22/tcp\n";

    struct ScriptedFirewall {
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedFirewall {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    impl Firewall for ScriptedFirewall {
        fn execute(&self, args: &[&str]) -> Result<String> {
            self.calls.lock().unwrap().push(args.join(" "));
            match args {
                ["app", "list"] => Ok(APP_LIST.to_string()),
                ["app", "info", "OpenSSH"] => Ok(APP_INFO.to_string()),
                ["app", "info", _] => Err(Error::Internal("no info".to_string())),
                _ => Ok(String::new()),
            }
        }
    }

    #[test]
    fn test_file_contents() {
        let profile = UfwProfile::new("Nginx Full", "Nginx web server", &["80,443/tcp", "8080/tcp"]);
        assert_eq!(
            profile.to_file_contents(),
            "[Nginx Full]\ntitle=Nginx Full\ndescription=Nginx web server\nports=80,443/tcp|8080/tcp\n"
        );
    }

    #[test]
    fn test_parse_app_list_skips_heading() {
        assert_eq!(parse_app_list(APP_LIST), vec!["CUPS", "OpenSSH"]);
        assert!(parse_app_list("Available applications:\n").is_empty());
    }

    #[test]
    fn test_parse_app_info() {
        let profile = parse_app_info("OpenSSH", APP_INFO);
        assert_eq!(profile.name, "OpenSSH");
        assert_eq!(profile.title, "Secure shell server, an rshd replacement");
        assert_eq!(profile.ports, vec!["22/tcp"]);
    }

    #[test]
    fn test_installable_excludes_installed() {
        let installed = vec![UfwProfile::new("OpenSSH", "", &["22/tcp"])];
        let available = installable(&installed);
        assert!(!available.iter().any(|p| p.name == "OpenSSH"));
        assert_eq!(available.len(), catalog().len() - 1);
    }

    #[test]
    fn test_catalog_names_are_valid_file_names() {
        for profile in catalog() {
            assert!(validate_profile_name(&profile.name).is_ok(), "{}", profile.name);
        }
    }

    #[test]
    fn test_installed_skips_profiles_without_info() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsProfileStore::new(dir.path(), ScriptedFirewall::new());
        let installed = store.installed().unwrap();
        assert_eq!(installed.len(), 1);
        assert_eq!(installed[0].name, "OpenSSH");
    }

    #[test]
    fn test_create_writes_file_and_registers() {
        let dir = tempfile::tempdir().unwrap();
        let firewall = ScriptedFirewall::new();
        let store = FsProfileStore::new(dir.path(), firewall.clone());
        let profile = UfwProfile::new("Redis", "Redis key-value store", &["6379/tcp"]);

        let message = store.create(&profile).unwrap();
        assert_eq!(message, "Profile Redis created");

        let written = fs::read_to_string(dir.path().join("Redis.profile")).unwrap();
        assert!(written.starts_with("[Redis]\n"));
        assert_eq!(
            firewall.calls.lock().unwrap().last().unwrap(),
            "app update Redis"
        );
    }

    #[test]
    fn test_create_existing_profile_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsProfileStore::new(dir.path(), ScriptedFirewall::new());
        let profile = UfwProfile::new("Redis", "Redis", &["6379/tcp"]);

        store.create(&profile).unwrap();
        let err = store.create(&profile).unwrap_err();
        assert!(matches!(err, Error::Profile(ProfileError::AlreadyExists(_))));
    }

    #[test]
    fn test_create_rejects_traversal_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsProfileStore::new(dir.path(), ScriptedFirewall::new());
        let profile = UfwProfile::new("../evil", "x", &["1/tcp"]);
        assert!(matches!(
            store.create(&profile),
            Err(Error::Profile(ProfileError::InvalidName(_)))
        ));
    }

    #[test]
    fn test_delete_finds_file_by_header() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("custom-name"), "[Grafana]\ntitle=Grafana\n").unwrap();
        fs::write(dir.path().join("other"), "[Redis]\ntitle=Redis\n").unwrap();
        let store = FsProfileStore::new(dir.path(), ScriptedFirewall::new());

        store.delete("Grafana").unwrap();
        assert!(!dir.path().join("custom-name").exists());
        assert!(dir.path().join("other").exists());
    }

    #[test]
    fn test_delete_missing_profile() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsProfileStore::new(dir.path(), ScriptedFirewall::new());
        assert!(matches!(
            store.delete("Nope"),
            Err(Error::Profile(ProfileError::NotFound(_)))
        ));
    }
}
