use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One server entry of the configuration document.
///
/// Each entry pins one released version of the application to a host, a
/// port and the configuration file it should run with. Several entries may
/// share a configuration file, but never a version or a host:port pair.
///
/// # Examples
///
/// ```
/// use version_launcher::config::ServerSpec;
///
/// let spec = ServerSpec {
///     version: "0.3.2".to_string(),
///     host: "localhost".to_string(),
///     port: 8082,
///     config: "configs/config.php".into(),
/// };
/// assert_eq!(spec.address(), "localhost:8082");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSpec {
    /// Version to install, for instance `"dev-develop"` or `"0.3.2"`.
    pub version: String,

    /// Host name the server binds to.
    pub host: String,

    /// Port the server binds to.
    pub port: u16,

    /// Path to the configuration file for this server.
    /// Relative paths are resolved against the working directory.
    pub config: PathBuf,
}

impl ServerSpec {
    /// `host:port` as used in log lines and error messages.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// The configuration document consumed by the launcher.
///
/// # JSON Schema
///
/// ```json
/// {
///   "servers": [
///     {
///       "version": "dev-develop",
///       "host": "localhost",
///       "port": 8081,
///       "config": "configs/config.php"
///     },
///     {
///       "version": "0.3.2",
///       "host": "localhost",
///       "port": 8082,
///       "config": "configs/someSpecialConfig.php"
///     }
///   ]
/// }
/// ```
///
/// Unknown keys are rejected at both levels. The order of `servers` is
/// the order in which they are started and in which their PIDs are reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Servers to start, in declaration order.
    pub servers: Vec<ServerSpec>,
}

impl Config {
    /// Loads a configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] if:
    /// * The file does not exist or cannot be read
    /// * The file contents are not valid JSON
    /// * The JSON does not conform to the expected shape
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::ConfigParse(format!(
                "Configuration file does not exist: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigParse(format!("Failed to read config file: {}", e)))?;

        Self::parse_from_str(&content).map_err(|e| match e {
            Error::ConfigParse(msg) => {
                Error::ConfigParse(format!("{} ({})", msg, path.display()))
            }
            other => other,
        })
    }

    /// Parses a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] if the string is not valid JSON or does
    /// not conform to the expected shape.
    pub fn parse_from_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| {
            if e.is_data() {
                Error::ConfigParse(format!("Configuration does not match the expected shape: {}", e))
            } else {
                Error::ConfigParse(format!("Badly formatted configuration file: {}", e))
            }
        })
    }
}
