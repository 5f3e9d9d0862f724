/// Server management module for the version launcher.
///
/// This module handles the lifecycle of the servers under test: installing a
/// version, spawning it, waiting for it to accept connections, and tearing
/// it down again. All public components are instrumented with `tracing`.
///
/// # Components
///
/// * `instance` - One server: install, run, readiness, kill, cleanup
/// * `pool` - Ordered, fail-fast startup of many servers
/// * `readiness` - Bounded poll until a server is connectable
/// * `toolkit` - The external collaborators an instance works through
///
/// # Examples
///
/// Starting a single server:
///
/// ```no_run
/// use version_launcher::config::{LauncherSettings, ServerSpec};
/// use version_launcher::server::{ServerInstance, ServerToolkit};
/// use std::sync::Arc;
///
/// # async fn example() -> version_launcher::Result<()> {
/// let settings = Arc::new(LauncherSettings::new("/tmp/launch", "/tmp/launch/.router.php"));
/// let spec = ServerSpec {
///     version: "1.0".to_string(),
///     host: "localhost".to_string(),
///     port: 9001,
///     config: "/tmp/c.cfg".into(),
/// };
///
/// let mut server = ServerInstance::new(spec, settings, ServerToolkit::default())?;
/// let pid = server.start().await?;
/// println!("Server running as PID {}", pid);
/// server.kill()?;
/// # Ok(())
/// # }
/// ```
pub mod instance;
pub mod pool;
pub mod readiness;
mod toolkit;

pub use instance::{ServerId, ServerInstance, ServerStatus};
pub use pool::ServerPool;
pub use readiness::ReadinessCheck;
pub use toolkit::ServerToolkit;
