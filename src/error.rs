/// Error handling module for the version launcher.
///
/// This module defines the error types used throughout the library.
/// Every fatal condition the launcher can hit has its own variant so
/// callers (and the command-line front end) can tell them apart without
/// parsing messages.
///
/// # Example
///
/// ```
/// use version_launcher::error::{Error, Result};
///
/// fn handle_error(result: Result<Vec<u32>>) {
///     match result {
///         Ok(pids) => println!("Started {} servers", pids.len()),
///         Err(Error::PortInUse { host, port }) => println!("{}:{} is taken", host, port),
///         Err(Error::ReadinessTimeout { host, port, .. }) => println!("{}:{} never came up", host, port),
///         Err(e) => println!("Other error: {}", e),
///     }
/// }
/// ```
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur in the version-launcher library.
///
/// Each variant includes context information to help diagnose and handle
/// the error appropriately. None of them are recovered from locally; they
/// all propagate to the top-level invocation.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or parse the configuration document.
    ///
    /// This error occurs when:
    /// - The configuration file does not exist or cannot be read
    /// - The configuration JSON is malformed
    /// - The document does not have the `{"servers": [...]}` shape
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),

    /// Configuration is well-formed but contains invalid values.
    ///
    /// This error occurs when:
    /// - No servers are listed
    /// - A version or host is empty, or a port is out of range
    /// - Two servers claim the same host:port pair
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    /// A server's configuration file could not be resolved.
    #[error("Config validation error: {0}")]
    ConfigValidation(String),

    /// Something already answers connections on the target address.
    #[error("Something seems to be running on {host}:{port}, aborting")]
    PortInUse {
        /// Host the server was supposed to bind to
        host: String,
        /// Port the server was supposed to bind to
        port: u16,
    },

    /// The install step did not produce a usable code tree.
    ///
    /// This error occurs when:
    /// - The provisioning command fails to start or exits unsuccessfully
    /// - The provisioned tree lacks the document root
    /// - The configuration file cannot be linked into the tree
    #[error("Provisioning failed: {0}")]
    Provisioning(String),

    /// The server was spawned but never became connectable.
    ///
    /// The spawned process is left running.
    #[error("Could not connect to {host}:{port} within {timeout:?}, aborting")]
    ReadinessTimeout {
        /// Host that was polled
        host: String,
        /// Port that was polled
        port: u16,
        /// How long the poll waited
        timeout: Duration,
    },

    /// The PID registry file does not exist.
    #[error("File does not exist: {}", .0.display())]
    RegistryMissing(PathBuf),

    /// None of the PIDs in the registry belong to a live process.
    ///
    /// The registry file has already been deleted when this is returned.
    #[error("The PID's listed in {} do not exist. The file has been deleted", .0.display())]
    StaleRegistry(PathBuf),

    /// The PID registry could not be read, parsed or written.
    #[error("PID registry error: {0}")]
    Registry(String),

    /// The install root cannot be used.
    #[error("Install path error: {0}")]
    InstallRoot(String),

    /// Error when spawning, inspecting or signalling a process.
    #[error("Process error: {0}")]
    Process(String),

    /// The server has already been started.
    #[error("Already running")]
    AlreadyRunning,

    /// Any other error not covered by the above categories.
    #[error("Other error: {0}")]
    Other(String),
}

impl Error {
    /// Process exit code for this error kind.
    ///
    /// Every fatal condition maps to its own code so wrapper scripts can
    /// react to, say, a busy port differently from a provisioning failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ConfigParse(_) | Error::ConfigInvalid(_) | Error::ConfigValidation(_) => 2,
            Error::PortInUse { .. } => 3,
            Error::Provisioning(_) => 4,
            Error::ReadinessTimeout { .. } => 5,
            Error::RegistryMissing(_) => 6,
            Error::StaleRegistry(_) => 7,
            Error::Registry(_) => 8,
            Error::InstallRoot(_) => 9,
            Error::Process(_) | Error::AlreadyRunning | Error::Other(_) => 1,
        }
    }
}

/// Result type for version-launcher operations.
///
/// This is a convenience type alias for `std::result::Result` with the `Error` type
/// from this module.
pub type Result<T> = std::result::Result<T, Error>;
