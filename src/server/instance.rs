use crate::config::{LauncherSettings, ServerSpec};
use crate::error::{Error, Result};
use crate::process::LaunchRequest;
use crate::server::readiness::ReadinessCheck;
use crate::server::toolkit::ServerToolkit;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier for a server instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServerId(Uuid);

impl ServerId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a server instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerStatus {
    /// Built from its spec, nothing on disk yet
    Created,
    /// Code tree provisioned and config linked
    Installed,
    /// Process spawned and connectable
    Running,
    /// A step of `start` failed; partial state is left in place
    Failed,
    /// Termination signal sent
    Terminated,
}

/// One copy of the application bound to a version, host, port and config file.
///
/// `start` drives the instance through `Created -> Installed -> Running`.
/// Nothing is rolled back when a step fails: the install directory and any
/// spawned process stay around for inspection until [`cleanup`] is called.
///
/// [`cleanup`]: ServerInstance::cleanup
pub struct ServerInstance {
    id: ServerId,
    spec: ServerSpec,
    install_dir: PathBuf,
    pid: Option<u32>,
    status: ServerStatus,
    settings: Arc<LauncherSettings>,
    toolkit: ServerToolkit,
}

impl ServerInstance {
    /// Create an instance for `spec`; its install directory is `<install_root>/<version>`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigInvalid`] when the version would place the
    /// install directory anywhere but directly under the install root.
    pub fn new(
        spec: ServerSpec,
        settings: Arc<LauncherSettings>,
        toolkit: ServerToolkit,
    ) -> Result<Self> {
        let install_dir = settings.install_dir(&spec.version)?;
        Ok(Self {
            id: ServerId::new(),
            spec,
            install_dir,
            pid: None,
            status: ServerStatus::Created,
            settings,
            toolkit,
        })
    }

    /// Get the server ID
    pub fn id(&self) -> ServerId {
        self.id
    }

    /// The [`ServerSpec`] this instance was built from
    pub fn spec(&self) -> &ServerSpec {
        &self.spec
    }

    /// Where this instance's code tree lives
    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    /// PID of the spawned process, once there is one
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Get the server status
    pub fn status(&self) -> ServerStatus {
        self.status
    }

    /// Install and start the server.
    ///
    /// Refuses to touch anything if the target address already accepts
    /// connections.
    ///
    /// # Errors
    ///
    /// * [`Error::PortInUse`] if something already listens on host:port
    /// * [`Error::Provisioning`] if the install step fails
    /// * [`Error::ReadinessTimeout`] if the spawned server never becomes connectable
    #[tracing::instrument(skip(self), fields(version = %self.spec.version, address = %self.spec.address()))]
    pub async fn start(&mut self) -> Result<u32> {
        match self.status {
            ServerStatus::Created => {}
            ServerStatus::Running => return Err(Error::AlreadyRunning),
            other => {
                return Err(Error::Process(format!(
                    "Cannot start server {} from state {:?}",
                    self.spec.address(),
                    other
                )));
            }
        }

        if self
            .toolkit
            .prober
            .is_connectable(&self.spec.host, self.spec.port)
            .await
        {
            self.status = ServerStatus::Failed;
            return Err(Error::PortInUse {
                host: self.spec.host.clone(),
                port: self.spec.port,
            });
        }

        self.install().await?;
        self.run().await
    }

    /// Provision the version into the install directory and link the config file.
    pub async fn install(&mut self) -> Result<()> {
        if self.status != ServerStatus::Created {
            return Err(Error::Process(format!(
                "Server {} is {:?}, refusing to install over it",
                self.spec.address(),
                self.status
            )));
        }

        tracing::info!("Installing server ({})...", self.spec.version);
        let result = self.provision_tree().await;
        if result.is_err() {
            self.status = ServerStatus::Failed;
        }
        result?;

        self.status = ServerStatus::Installed;
        tracing::info!("Done!");
        Ok(())
    }

    async fn provision_tree(&self) -> Result<()> {
        self.toolkit
            .provisioner
            .provision(&self.spec.version, &self.install_dir)
            .await?;

        let document_root = self.settings.document_root_in(&self.install_dir);
        if !document_root.is_dir() {
            return Err(Error::Provisioning(format!(
                "Provisioned tree for {} has no {} directory",
                self.spec.version,
                document_root.display()
            )));
        }

        let link = self.settings.config_link_in(&self.install_dir);
        link_config(&self.spec.config, &link).await.map_err(|e| {
            Error::Provisioning(format!(
                "Failed to link {} to {}: {}",
                self.spec.config.display(),
                link.display(),
                e
            ))
        })
    }

    /// Spawn the server and wait until it accepts connections.
    ///
    /// The PID is recorded as soon as the process exists, so it is available
    /// even when the readiness wait times out.
    pub async fn run(&mut self) -> Result<u32> {
        if self.status != ServerStatus::Installed {
            return Err(Error::Process(format!(
                "Server {} must be installed before it can run (currently {:?})",
                self.spec.address(),
                self.status
            )));
        }

        tracing::info!("Starting server ({})...", self.spec.version);
        let request = LaunchRequest {
            host: self.spec.host.clone(),
            port: self.spec.port,
            document_root: self.settings.document_root_in(&self.install_dir),
            router: self.settings.router.clone(),
        };

        let pid = match self.toolkit.launcher.spawn(&request).await {
            Ok(pid) => pid,
            Err(e) => {
                self.status = ServerStatus::Failed;
                return Err(e);
            }
        };
        self.pid = Some(pid);
        tracing::debug!("PID {}", pid);

        tracing::info!("Trying to connect ({})...", self.spec.address());
        let check = ReadinessCheck::from(self.settings.as_ref());
        if let Err(e) = check
            .wait(self.toolkit.prober.as_ref(), &self.spec.host, self.spec.port)
            .await
        {
            self.status = ServerStatus::Failed;
            return Err(e);
        }

        self.status = ServerStatus::Running;
        tracing::info!("Done!");
        Ok(pid)
    }

    /// Send a termination signal to the server's process.
    ///
    /// Does nothing when no process was ever spawned or it was already
    /// signalled. Does not wait for the process to exit and leaves the
    /// install directory alone.
    pub fn kill(&mut self) -> Result<()> {
        let Some(pid) = self.pid else {
            return Ok(());
        };
        if self.status == ServerStatus::Terminated {
            return Ok(());
        }

        tracing::info!("Killing server with PID {}...", pid);
        self.toolkit.processes.terminate(&[pid])?;
        self.status = ServerStatus::Terminated;
        tracing::info!("Done!");
        Ok(())
    }

    /// Kill the process (if any) and remove the install directory.
    ///
    /// Never called implicitly by the instance itself.
    pub async fn cleanup(&mut self) -> Result<()> {
        self.kill()?;

        if tokio::fs::symlink_metadata(&self.install_dir).await.is_ok() {
            tracing::debug!("Removing directory: {}", self.install_dir.display());
            tokio::fs::remove_dir_all(&self.install_dir).await.map_err(|e| {
                Error::Other(format!(
                    "Failed to remove {}: {}",
                    self.install_dir.display(),
                    e
                ))
            })?;
        }

        if self.pid.is_none() {
            self.status = ServerStatus::Created;
        }
        Ok(())
    }
}

impl fmt::Debug for ServerInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerInstance")
            .field("id", &self.id)
            .field("spec", &self.spec)
            .field("install_dir", &self.install_dir)
            .field("pid", &self.pid)
            .field("status", &self.status)
            .finish()
    }
}

async fn link_config(config: &Path, link: &Path) -> std::io::Result<()> {
    if let Some(parent) = link.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    if tokio::fs::symlink_metadata(link).await.is_ok() {
        tokio::fs::remove_file(link).await?;
    }

    tracing::debug!("Linking {} -> {}", link.display(), config.display());
    #[cfg(unix)]
    {
        tokio::fs::symlink(config, link).await
    }
    #[cfg(not(unix))]
    {
        tokio::fs::copy(config, link).await.map(|_| ())
    }
}
