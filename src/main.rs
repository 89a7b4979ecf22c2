//! fwtui - terminal front-end for ufw
//!
//! # Usage
//!
//! ```bash
//! # Run the interactive UI (requires root)
//! sudo fwtui
//!
//! # CLI commands
//! fwtui status     # Print `ufw status verbose`
//! fwtui rules      # Print the numbered rule rows
//! fwtui profiles   # Print installed and installable application profiles
//! ```

use clap::{Parser, Subcommand};
use fwtui::audit::AuditLog;
use fwtui::config::{self, AppConfig};
use fwtui::core::profiles::{FsProfileStore, ProfileStore, UfwProfile, installable};
use fwtui::core::status::parse_numbered_rules;
use fwtui::{Firewall, UfwCli, terminal, utils};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};

shadow_rs::shadow!(build);

#[derive(Parser)]
#[command(name = "fwtui")]
#[command(version, about = "Interactive terminal front-end for ufw", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show firewall status, logging and default policies
    Status,
    /// List the numbered rules
    Rules,
    /// List installed and installable application profiles
    Profiles,
}

fn main() -> ExitCode {
    let dirs_result = utils::ensure_dirs();
    let cli = Cli::parse();
    init_logging(cli.command.is_none());
    if let Err(e) = dirs_result {
        warn!("Failed to create fwtui directories: {}", e);
    }
    info!(
        "fwtui {} ({}, built {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BUILD_TIME
    );

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start the async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };
    let config = runtime.block_on(config::load_config());
    let firewall: Arc<dyn Firewall> = Arc::new(UfwCli::new(config.ufw_command.clone()));

    let result = match cli.command {
        Some(command) => handle_cli(command, &config, &firewall),
        None => runtime.block_on(launch_tui(&config, firewall)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Where the log goes for this run
#[derive(Debug, PartialEq, Eq)]
enum LogTarget {
    Stderr,
    File(PathBuf),
    Discard,
}

/// The interactive UI owns the terminal, so its log goes to a file. Without
/// one the log is discarded rather than written over the screen.
fn log_target(interactive: bool, state_dir: Option<PathBuf>) -> LogTarget {
    match (interactive, state_dir) {
        (false, _) => LogTarget::Stderr,
        (true, Some(dir)) => LogTarget::File(dir.join("fwtui.log")),
        (true, None) => LogTarget::Discard,
    }
}

fn init_logging(interactive: bool) {
    let target = match log_target(interactive, utils::get_state_dir()) {
        LogTarget::File(path) => match std::fs::File::create(&path) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .with_writer(file)
                    .with_ansi(false)
                    .init();
                return;
            }
            Err(e) => {
                // The terminal is not in raw mode yet
                eprintln!("Warning: cannot open {}: {e}; logging disabled", path.display());
                LogTarget::Discard
            }
        },
        other => other,
    };

    if target == LogTarget::Stderr {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt().with_writer(std::io::sink).init();
    }
}

fn handle_cli(
    command: Commands,
    config: &AppConfig,
    firewall: &Arc<dyn Firewall>,
) -> Result<(), Box<dyn std::error::Error>> {
    let user_error = |e: fwtui::Error| e.user_message();

    match command {
        Commands::Status => {
            print!("{}", firewall.verbose_status().map_err(user_error)?);
        }
        Commands::Rules => {
            let rows = parse_numbered_rules(&firewall.numbered_rules().map_err(user_error)?);
            if rows.is_empty() {
                println!("No rules");
            }
            for row in rows {
                println!("{}", row.line);
            }
        }
        Commands::Profiles => {
            let store = FsProfileStore::new(config.profiles_dir.clone(), Arc::clone(firewall));
            let installed = store.installed().map_err(user_error)?;
            let print_row = |profile: &UfwProfile| {
                println!(
                    "  {:<24} {:<40} {}",
                    profile.name,
                    utils::truncate_string(&profile.title, 40),
                    profile.ports_label()
                );
            };
            println!("Installed profiles:");
            installed.iter().for_each(print_row);
            println!("Available profiles:");
            installable(&installed).iter().for_each(print_row);
        }
    }
    Ok(())
}

async fn launch_tui(
    config: &AppConfig,
    firewall: Arc<dyn Firewall>,
) -> Result<(), Box<dyn std::error::Error>> {
    if !nix::unistd::geteuid().is_root() {
        return Err("fwtui must be run as root (try: sudo fwtui)".into());
    }

    // Fail before taking over the terminal if ufw cannot run at all
    if let Err(e) = firewall.verbose_status() {
        return Err(e.user_message().into());
    }

    let audit = if config.enable_audit_log {
        AuditLog::new()
            .inspect_err(|e| warn!("Audit log disabled: {}", e))
            .ok()
    } else {
        None
    };

    let profiles: Arc<dyn ProfileStore> = Arc::new(FsProfileStore::new(
        config.profiles_dir.clone(),
        Arc::clone(&firewall),
    ));

    terminal::run(config, firewall, profiles, audit).await?;
    Ok(())
}
