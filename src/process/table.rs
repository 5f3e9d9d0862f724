use crate::error::Result;
use sysinfo::{Pid, ProcessStatus, Signal, System};

/// View of the operating system's process table.
///
/// Used where the only handle on a server is its bare PID: to find out
/// whether the PID still names a live process, what that process is, and
/// to signal it.
pub trait ProcessTable: Send + Sync {
    /// Command line of the live process with `pid`, or `None` when there is none.
    fn command_line(&self, pid: u32) -> Option<String>;

    /// Send a termination signal to every PID in `pids` in one go.
    ///
    /// Best effort: there is no check that the processes actually exit.
    fn terminate(&self, pids: &[u32]) -> Result<()>;
}

/// [`ProcessTable`] backed by `sysinfo`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessTable;

impl SystemProcessTable {
    fn snapshot() -> System {
        let mut system = System::new();
        system.refresh_processes();
        system
    }
}

impl ProcessTable for SystemProcessTable {
    fn command_line(&self, pid: u32) -> Option<String> {
        let system = Self::snapshot();
        let process = system.process(Pid::from_u32(pid))?;

        if process.status() == ProcessStatus::Zombie {
            return None;
        }

        let command = process.cmd().join(" ");
        if command.is_empty() {
            Some(process.name().to_string())
        } else {
            Some(command)
        }
    }

    fn terminate(&self, pids: &[u32]) -> Result<()> {
        let system = Self::snapshot();
        let mut missing = Vec::new();

        for &pid in pids {
            match system.process(Pid::from_u32(pid)) {
                Some(process) => {
                    let delivered = process.kill_with(Signal::Term).unwrap_or_else(|| process.kill());
                    if !delivered {
                        tracing::warn!(pid, "Failed to deliver termination signal");
                    }
                }
                None => missing.push(pid),
            }
        }

        if !missing.is_empty() {
            tracing::warn!(?missing, "Some processes were already gone");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;
    use std::time::Duration;

    #[test]
    fn looks_up_and_terminates_a_live_process() {
        let mut child = Command::new("sleep").arg("30").spawn().unwrap();
        let pid = child.id();

        let table = SystemProcessTable;
        let command = table.command_line(pid).expect("sleep should be live");
        assert!(command.contains("sleep"));

        table.terminate(&[pid]).unwrap();
        let status = child.wait().unwrap();
        assert!(!status.success());

        std::thread::sleep(Duration::from_millis(50));
        assert!(table.command_line(pid).is_none());
    }

    #[test]
    fn unknown_pid_has_no_command_line() {
        // Linux caps PIDs well below this
        assert!(SystemProcessTable.command_line(u32::MAX - 1).is_none());
    }
}
