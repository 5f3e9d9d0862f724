use crate::error::{Error, Result};
use async_process::{Command, Stdio};
use async_trait::async_trait;
use std::path::PathBuf;

/// What a spawned server should bind to and serve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    /// Host to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Directory to serve
    pub document_root: PathBuf,
    /// Router script resolving requests against the document root
    pub router: PathBuf,
}

impl LaunchRequest {
    /// Bind address in the form servers expect on the command line.
    ///
    /// IPv6 literals are bracketed.
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Spawns a server as a background process.
///
/// `spawn` returns as soon as the process exists; it does not wait for the
/// server to accept connections and it does not tie the process's lifetime
/// to the caller.
#[async_trait]
pub trait ProcessLauncher: Send + Sync {
    /// Start a server for `request` and return its PID.
    async fn spawn(&self, request: &LaunchRequest) -> Result<u32>;
}

/// [`ProcessLauncher`] backed by PHP's built-in web server.
///
/// Runs `php -S <host>:<port> -t <document_root> <router>` with all stdio
/// pointed at the null device.
#[derive(Debug, Clone)]
pub struct PhpServerLauncher {
    binary: String,
}

impl PhpServerLauncher {
    /// Launcher using the given `php` binary.
    pub fn new(binary: impl Into<String>) -> Self {
        Self { binary: binary.into() }
    }

    /// The arguments passed to the binary for `request`.
    pub fn args(&self, request: &LaunchRequest) -> Vec<String> {
        vec![
            "-S".to_string(),
            request.bind_address(),
            "-t".to_string(),
            request.document_root.display().to_string(),
            request.router.display().to_string(),
        ]
    }
}

impl Default for PhpServerLauncher {
    fn default() -> Self {
        Self::new("php")
    }
}

#[async_trait]
impl ProcessLauncher for PhpServerLauncher {
    async fn spawn(&self, request: &LaunchRequest) -> Result<u32> {
        let args = self.args(request);
        tracing::debug!("Executing command: {} {}", self.binary, args.join(" "));

        // Dropping the handle leaves the child running; it is only ever
        // addressed by PID from here on.
        let child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::Process(format!("Failed to start {}: {}", self.binary, e)))?;

        Ok(child.id())
    }
}
