//! External process plumbing.
//!
//! Everything the launcher does outside its own address space goes through
//! one of the traits in this module, so the orchestration logic can be
//! driven against fakes in tests:
//!
//! * [`Prober`] - is anything listening on host:port?
//! * [`Provisioner`] - materialize the code tree for a version
//! * [`ProcessLauncher`] - spawn a detached server and report its PID
//! * [`ProcessTable`] - look up PIDs and signal them
mod launcher;
mod probe;
mod provision;
mod table;

pub use launcher::{LaunchRequest, PhpServerLauncher, ProcessLauncher};
pub use probe::{Prober, TcpProber};
pub use provision::{CommandProvisioner, Provisioner, DESTINATION_PLACEHOLDER, VERSION_PLACEHOLDER};
pub use table::{ProcessTable, SystemProcessTable};
