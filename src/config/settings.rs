use crate::error::{Error, Result};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

/// Default number of seconds to wait for a started server to accept connections.
pub const DEFAULT_TIMEOUT_SECS: u64 = 2;

/// Default pause between two readiness probes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Default location of the PID registry.
pub const DEFAULT_PID_FILE: &str = "/tmp/version-launcher-pids";

/// Run-time settings shared by every server in one launch.
///
/// These are the knobs that apply to the launch as a whole rather than to a
/// single server. The pool receives them once and hands the same value to
/// every instance it builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherSettings {
    /// Absolute directory under which each version gets its own subdirectory.
    pub install_root: PathBuf,

    /// Router script passed to every spawned server.
    pub router: PathBuf,

    /// How long a started server gets to become connectable.
    pub timeout: Duration,

    /// Pause between readiness probes.
    pub poll_interval: Duration,

    /// Subpath of a provisioned tree that is served.
    pub document_root: PathBuf,

    /// Subpath of a provisioned tree where the config file is linked.
    pub config_link: PathBuf,

    /// Remove install directories and kill started servers when a launch fails.
    pub cleanup_on_failure: bool,
}

impl LauncherSettings {
    /// Settings with defaults for everything but the install root and router.
    pub fn new(install_root: impl Into<PathBuf>, router: impl Into<PathBuf>) -> Self {
        Self {
            install_root: install_root.into(),
            router: router.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            poll_interval: DEFAULT_POLL_INTERVAL,
            document_root: PathBuf::from("public"),
            config_link: PathBuf::from("config/config.php"),
            cleanup_on_failure: false,
        }
    }

    /// Set the readiness timeout in whole seconds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigInvalid`] when `secs` is zero.
    pub fn with_timeout_secs(mut self, secs: u64) -> Result<Self> {
        if secs == 0 {
            return Err(Error::ConfigInvalid(
                "The timeout value must be a positive integer".to_string(),
            ));
        }
        self.timeout = Duration::from_secs(secs);
        Ok(self)
    }

    /// Set the pause between readiness probes.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Enable or disable cleanup of partial state on failure.
    pub fn with_cleanup_on_failure(mut self, enabled: bool) -> Self {
        self.cleanup_on_failure = enabled;
        self
    }

    /// Install directory for a version: `<install_root>/<version>`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigInvalid`] when `version` does not name a single
    /// directory directly under the install root.
    pub fn install_dir(&self, version: &str) -> Result<PathBuf> {
        if !is_version_dir_name(version) {
            return Err(Error::ConfigInvalid(format!(
                "Version {:?} cannot be used as a directory name under {}",
                version,
                self.install_root.display()
            )));
        }
        Ok(self.install_root.join(version))
    }

    /// Directory served for a provisioned tree.
    pub fn document_root_in(&self, install_dir: &Path) -> PathBuf {
        install_dir.join(&self.document_root)
    }

    /// Where the config file is linked inside a provisioned tree.
    pub fn config_link_in(&self, install_dir: &Path) -> PathBuf {
        install_dir.join(&self.config_link)
    }
}

/// Whether `version` names exactly one plain directory, so joining it onto
/// the install root can never leave the root.
pub fn is_version_dir_name(version: &str) -> bool {
    if version.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(version).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
