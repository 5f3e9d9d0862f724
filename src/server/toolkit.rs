use crate::process::{
    CommandProvisioner, PhpServerLauncher, ProcessLauncher, ProcessTable, Prober, Provisioner,
    SystemProcessTable, TcpProber,
};
use std::sync::Arc;

/// The external collaborators a server instance works through.
///
/// Cloning is cheap; every instance in a pool holds a clone of the pool's toolkit.
#[derive(Clone)]
pub struct ServerToolkit {
    /// Readiness / port-in-use checks
    pub prober: Arc<dyn Prober>,
    /// Code tree materialization
    pub provisioner: Arc<dyn Provisioner>,
    /// Detached server spawning
    pub launcher: Arc<dyn ProcessLauncher>,
    /// PID lookups and termination signals
    pub processes: Arc<dyn ProcessTable>,
}

impl ServerToolkit {
    /// Toolkit from explicit collaborators.
    pub fn new(
        prober: impl Prober + 'static,
        provisioner: impl Provisioner + 'static,
        launcher: impl ProcessLauncher + 'static,
        processes: impl ProcessTable + 'static,
    ) -> Self {
        Self {
            prober: Arc::new(prober),
            provisioner: Arc::new(provisioner),
            launcher: Arc::new(launcher),
            processes: Arc::new(processes),
        }
    }

    /// Toolkit talking to the real system with the given provisioner and `php` binary.
    pub fn system(provisioner: CommandProvisioner, php_binary: &str) -> Self {
        Self::new(
            TcpProber,
            provisioner,
            PhpServerLauncher::new(php_binary),
            SystemProcessTable,
        )
    }
}

impl Default for ServerToolkit {
    fn default() -> Self {
        Self::system(CommandProvisioner::default(), "php")
    }
}

impl std::fmt::Debug for ServerToolkit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerToolkit").finish_non_exhaustive()
    }
}
