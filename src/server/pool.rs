use crate::config::{Config, LauncherSettings, ServerSpec};
use crate::error::{Error, Result};
use crate::server::instance::{ServerId, ServerInstance};
use crate::server::toolkit::ServerToolkit;
use std::sync::Arc;

/// Ordered collection of server instances started as one launch.
///
/// Servers start one at a time in insertion order and the first failure
/// stops the launch. Servers that already started keep running and their
/// PIDs stay available through [`ServerPool::pids`].
///
/// # Examples
///
/// ```no_run
/// use version_launcher::config::{Config, LauncherSettings};
/// use version_launcher::server::{ServerPool, ServerToolkit};
///
/// #[tokio::main]
/// async fn main() -> version_launcher::Result<()> {
///     let config = Config::from_file("servers.json")?;
///     let settings = LauncherSettings::new("/tmp/launch", "/tmp/launch/.router.php");
///     let mut pool = ServerPool::from_config(&config, settings, ServerToolkit::default())?;
///
///     let pids = pool.start_all().await?;
///     println!("Started {:?}", pids);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct ServerPool {
    settings: Arc<LauncherSettings>,
    toolkit: ServerToolkit,
    servers: Vec<ServerInstance>,
}

impl ServerPool {
    /// Create an empty pool
    pub fn new(settings: LauncherSettings, toolkit: ServerToolkit) -> Self {
        Self {
            settings: Arc::new(settings),
            toolkit,
            servers: Vec::new(),
        }
    }

    /// Create a pool holding one instance per server in `config`, in order
    #[tracing::instrument(skip_all, fields(num_servers = config.servers.len()))]
    pub fn from_config(
        config: &Config,
        settings: LauncherSettings,
        toolkit: ServerToolkit,
    ) -> Result<Self> {
        let mut pool = Self::new(settings, toolkit);
        for spec in &config.servers {
            pool.add_server(spec.clone())?;
        }
        Ok(pool)
    }

    /// Append a server to the pool
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigInvalid`] when the version is not a usable
    /// directory name or another server in the pool already claims it.
    pub fn add_server(&mut self, spec: ServerSpec) -> Result<ServerId> {
        if self.servers.iter().any(|s| s.spec().version == spec.version) {
            return Err(Error::ConfigInvalid(format!(
                "Version {} is already in the pool",
                spec.version
            )));
        }

        let server = ServerInstance::new(spec, Arc::clone(&self.settings), self.toolkit.clone())?;
        let id = server.id();
        tracing::debug!(server_id = %id, version = %server.spec().version, "Added server to pool");
        self.servers.push(server);
        Ok(id)
    }

    /// Settings shared by every server in the pool
    pub fn settings(&self) -> &LauncherSettings {
        &self.settings
    }

    /// Servers in startup order
    pub fn servers(&self) -> &[ServerInstance] {
        &self.servers
    }

    /// Number of servers in the pool
    pub fn len(&self) -> usize {
        self.servers.len()
    }

    /// Whether the pool holds no servers
    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// PIDs of every server that got as far as spawning a process, in pool order.
    ///
    /// Includes servers that spawned but then failed the readiness check.
    pub fn pids(&self) -> Vec<u32> {
        self.servers.iter().filter_map(ServerInstance::pid).collect()
    }

    /// Start every server in order and return their PIDs in the same order.
    ///
    /// Stops at the first failure. With `cleanup_on_failure` set, every
    /// server touched so far is then cleaned up before the error is returned.
    #[tracing::instrument(skip(self), fields(num_servers = self.servers.len()))]
    pub async fn start_all(&mut self) -> Result<Vec<u32>> {
        tracing::info!("Starting all configured servers");
        let mut pids = Vec::with_capacity(self.servers.len());
        let mut failure = None;

        for (index, server) in self.servers.iter_mut().enumerate() {
            match server.start().await {
                Ok(pid) => pids.push(pid),
                Err(e) => {
                    tracing::error!(
                        index,
                        version = %server.spec().version,
                        address = %server.spec().address(),
                        error = %e,
                        "Failed to start server"
                    );
                    failure = Some(e);
                    break;
                }
            }
        }

        if let Some(e) = failure {
            if self.settings.cleanup_on_failure {
                tracing::warn!("Cleaning up after failed launch");
                if let Err(cleanup_error) = self.cleanup().await {
                    tracing::warn!(error = %cleanup_error, "Cleanup after failed launch was incomplete");
                }
            }
            return Err(e);
        }

        tracing::info!(num_started = pids.len(), "Finished starting all servers");
        Ok(pids)
    }

    /// Kill every spawned server and remove every install directory.
    ///
    /// Keeps going past individual failures and returns the first one.
    #[tracing::instrument(skip(self))]
    pub async fn cleanup(&mut self) -> Result<()> {
        let mut errors: Vec<Error> = Vec::new();

        for server in &mut self.servers {
            if let Err(e) = server.cleanup().await {
                tracing::warn!(version = %server.spec().version, error = %e, "Failed to clean up server");
                errors.push(e);
            }
        }

        match errors.into_iter().next() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
