//! The `start-servers` and `kill-servers` flows.
//!
//! Each flow has a thin entry point wiring in the real system and a
//! `*_with` variant taking the collaborators explicitly.
use crate::cli::{KillArgs, StartArgs};
use crate::config::{Config, LauncherSettings, validate_config};
use crate::confirm::Confirm;
use crate::error::{Error, Result};
use crate::install_root;
use crate::process::{CommandProvisioner, ProcessTable, SystemProcessTable};
use crate::registry::PidRegistry;
use crate::router;
use crate::server::{ServerPool, ServerToolkit};
use crate::teardown::{TeardownOutcome, TeardownResolver};
use std::path::PathBuf;

/// Start every configured server against the real system.
pub async fn start_servers(args: &StartArgs, confirm: &dyn Confirm) -> Result<Vec<u32>> {
    let provisioner = match &args.provision_command {
        Some(template) => CommandProvisioner::from_template(template)?,
        None => CommandProvisioner::default(),
    };
    let toolkit = ServerToolkit::system(provisioner, &args.php);
    start_servers_with(args, confirm, toolkit).await
}

/// Start every configured server through `toolkit`.
///
/// Everything that can be checked up front (timeout, configuration document,
/// config files, PID file, install path, router) is checked before the first
/// server is touched. The PIDs of every server that got spawned are appended
/// to the PID file, also when a later server fails, unless the failed launch
/// was cleaned up. When the PID file cannot be written after a failed launch,
/// the launch error is returned and the unrecorded PIDs are logged.
#[tracing::instrument(skip_all, fields(config = %args.config.display()))]
pub async fn start_servers_with(
    args: &StartArgs,
    confirm: &dyn Confirm,
    toolkit: ServerToolkit,
) -> Result<Vec<u32>> {
    let mut settings = LauncherSettings::new(PathBuf::new(), PathBuf::new())
        .with_timeout_secs(args.timeout)?
        .with_cleanup_on_failure(args.cleanup_on_failure);

    let mut config = Config::from_file(&args.config)?;
    let cwd = std::env::current_dir()
        .map_err(|e| Error::Other(format!("Failed to determine working directory: {}", e)))?;
    validate_config(&mut config, &cwd)?;

    // An unreadable PID file must fail before anything is spawned, not after
    let registry = PidRegistry::new(&args.pid_file);
    let mut recorded = if registry.exists() { registry.load()? } else { Vec::new() };

    let router = match &args.router {
        Some(path) => Some(std::fs::canonicalize(path).map_err(|_| {
            Error::ConfigValidation(format!("Router script missing: {}", path.display()))
        })?),
        None => None,
    };

    settings.install_root = install_root::prepare(&args.install_path, confirm)?;
    settings.router = match router {
        Some(path) => path,
        None => router::materialize(&settings.install_root)?,
    };

    let mut pool = ServerPool::from_config(&config, settings, toolkit)?;
    let result = pool.start_all().await;

    let cleaned_up = result.is_err() && pool.settings().cleanup_on_failure;
    let pids = pool.pids();
    if !pids.is_empty() && !cleaned_up {
        recorded.extend_from_slice(&pids);
        match registry.save(&recorded) {
            Ok(()) => tracing::info!("PID's written to {}", registry.path().display()),
            Err(e) => {
                tracing::warn!(
                    pids = %crate::registry::encode(&pids),
                    error = %e,
                    "Failed to record PID's, kill these servers by hand"
                );
                // A launch error takes precedence over this one
                if result.is_ok() {
                    return Err(e);
                }
            }
        }
    }

    result
}

/// Kill the servers listed in the PID file using the system process table.
pub fn kill_servers(args: &KillArgs, confirm: &dyn Confirm) -> Result<TeardownOutcome> {
    kill_servers_with(args, confirm, SystemProcessTable)
}

/// Kill the servers listed in the PID file using `processes`.
pub fn kill_servers_with(
    args: &KillArgs,
    confirm: &dyn Confirm,
    processes: impl ProcessTable + 'static,
) -> Result<TeardownOutcome> {
    let mut resolver = TeardownResolver::new(processes);
    if let Some(needle) = &args.match_command {
        resolver = resolver.with_command_filter(needle.clone());
    }

    resolver.teardown(&PidRegistry::new(&args.pid_file), confirm)
}
