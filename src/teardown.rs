//! Teardown of servers from a previous launch.
//!
//! The resolver works from bare PIDs read out of the [`PidRegistry`]. Each
//! PID is checked against the live process table first: PIDs with no
//! process behind them are dropped, and with a command filter set, so are
//! PIDs that now belong to some unrelated process. Whatever survives is
//! shown to the operator and, once confirmed, signalled in a single call.
use crate::confirm::Confirm;
use crate::error::{Error, Result};
use crate::process::ProcessTable;
use crate::registry::PidRegistry;
use std::collections::HashSet;
use std::fmt::Write;
use std::sync::Arc;

/// A live process selected for termination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillTarget {
    /// Process ID
    pub pid: u32,
    /// Its current command line
    pub command: String,
}

/// How a teardown ended when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeardownOutcome {
    /// These PIDs were signalled and the registry was deleted.
    Terminated(Vec<u32>),
    /// The operator said no; nothing was signalled and the registry is untouched.
    Declined,
}

/// Turns a PID registry into one confirmed bulk termination.
pub struct TeardownResolver {
    processes: Arc<dyn ProcessTable>,
    command_filter: Option<String>,
}

impl TeardownResolver {
    /// Resolver looking PIDs up in `processes`
    pub fn new(processes: impl ProcessTable + 'static) -> Self {
        Self::from_arc(Arc::new(processes))
    }

    /// Resolver sharing an existing process table
    pub fn from_arc(processes: Arc<dyn ProcessTable>) -> Self {
        Self {
            processes,
            command_filter: None,
        }
    }

    /// Only consider processes whose command line contains `needle`.
    ///
    /// Guards against killing an unrelated process that inherited a PID
    /// after the original server exited.
    pub fn with_command_filter(mut self, needle: impl Into<String>) -> Self {
        self.command_filter = Some(needle.into());
        self
    }

    /// Look every PID up and keep the ones that name a live, matching process.
    ///
    /// Order is preserved and duplicates are dropped.
    pub fn resolve(&self, pids: &[u32]) -> Vec<KillTarget> {
        tracing::debug!("Fetching information about the PID's");
        let mut seen = HashSet::new();
        let mut targets = Vec::new();

        for &pid in pids {
            if !seen.insert(pid) {
                continue;
            }

            let Some(command) = self.processes.command_line(pid) else {
                tracing::debug!("PID does not exist: {}", pid);
                continue;
            };

            if let Some(needle) = &self.command_filter {
                if !command.contains(needle.as_str()) {
                    tracing::debug!(pid, command = %command, "PID belongs to an unrelated process, skipping");
                    continue;
                }
            }

            targets.push(KillTarget { pid, command });
        }

        targets
    }

    /// Run the whole teardown against `registry`.
    ///
    /// # Errors
    ///
    /// * [`Error::RegistryMissing`] when the registry file does not exist
    /// * [`Error::StaleRegistry`] when no listed PID is live; the registry is
    ///   deleted before this is returned
    #[tracing::instrument(skip(self, confirm), fields(registry = %registry.path().display()))]
    pub fn teardown(&self, registry: &PidRegistry, confirm: &dyn Confirm) -> Result<TeardownOutcome> {
        let pids = registry.load()?;
        let targets = self.resolve(&pids);

        if targets.is_empty() {
            registry.remove()?;
            return Err(Error::StaleRegistry(registry.path().to_path_buf()));
        }

        if !confirm.confirm(&prompt(&targets), true)? {
            tracing::info!("Aborted, nothing was killed");
            return Ok(TeardownOutcome::Declined);
        }

        let victims: Vec<u32> = targets.iter().map(|target| target.pid).collect();
        tracing::info!("Killing PID's");
        tracing::debug!(pids = ?victims, "Sending termination signal");
        if let Err(e) = self.processes.terminate(&victims) {
            tracing::warn!(error = %e, "Termination was not clean");
        }

        registry.remove()?;
        Ok(TeardownOutcome::Terminated(victims))
    }
}

/// The confirmation question listing what is about to be killed.
pub fn prompt(targets: &[KillTarget]) -> String {
    let mut question = String::from("You are about to kill the following processes:\n\n");
    for target in targets {
        let _ = writeln!(question, "{}: {}", target.pid, target.command);
    }
    question.push_str("\nContinue? [Yn] ");
    question
}
