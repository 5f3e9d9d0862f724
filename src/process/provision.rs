use crate::error::{Error, Result};
use async_process::{Command, Stdio};
use async_trait::async_trait;
use std::path::Path;

/// Placeholder replaced by the destination directory in provisioning arguments.
pub const DESTINATION_PLACEHOLDER: &str = "{destination}";

/// Placeholder replaced by the version in provisioning arguments.
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Materializes a runnable code tree for a version.
///
/// After a successful call `destination` holds a tree with a document root
/// to serve and a directory for configuration.
#[async_trait]
pub trait Provisioner: Send + Sync {
    /// Populate `destination` with `version`.
    async fn provision(&self, version: &str, destination: &Path) -> Result<()>;
}

/// [`Provisioner`] that runs an external command.
///
/// The argument list is a template: `{destination}` and `{version}` are
/// substituted per call.
///
/// # Examples
///
/// ```
/// use version_launcher::process::CommandProvisioner;
/// use std::path::Path;
///
/// let provisioner = CommandProvisioner::default();
/// let args = provisioner.args("0.3.2", Path::new("/srv/0.3.2"));
/// assert_eq!(args, ["create-project", "-n", "imbo/imbo", "/srv/0.3.2", "0.3.2"]);
/// ```
#[derive(Debug, Clone)]
pub struct CommandProvisioner {
    program: String,
    args: Vec<String>,
}

impl CommandProvisioner {
    /// Provisioner running `program` with the templated `args`.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build a provisioner from a whitespace-separated command line template.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigInvalid`] for an empty template.
    pub fn from_template(template: &str) -> Result<Self> {
        let mut parts = template.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| Error::ConfigInvalid("Provisioning command is empty".to_string()))?;
        Ok(Self::new(program, parts.collect()))
    }

    /// Arguments for one call, with placeholders substituted.
    pub fn args(&self, version: &str, destination: &Path) -> Vec<String> {
        let destination = destination.display().to_string();
        self.args
            .iter()
            .map(|arg| {
                arg.replace(DESTINATION_PLACEHOLDER, &destination)
                    .replace(VERSION_PLACEHOLDER, version)
            })
            .collect()
    }
}

impl Default for CommandProvisioner {
    fn default() -> Self {
        Self::new(
            "composer",
            ["create-project", "-n", "imbo/imbo", DESTINATION_PLACEHOLDER, VERSION_PLACEHOLDER]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }
}

#[async_trait]
impl Provisioner for CommandProvisioner {
    async fn provision(&self, version: &str, destination: &Path) -> Result<()> {
        let args = self.args(version, destination);
        tracing::debug!("Executing command: {} {}", self.program, args.join(" "));

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                Error::Provisioning(format!("Failed to run {}: {}", self.program, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Provisioning(format!(
                "{} exited with {} while installing {}: {}",
                self.program,
                output.status,
                version,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_substitution() {
        let provisioner =
            CommandProvisioner::from_template("git clone --branch {version} repo {destination}")
                .unwrap();
        assert_eq!(
            provisioner.args("v2", Path::new("/srv/v2")),
            vec!["clone", "--branch", "v2", "repo", "/srv/v2"]
        );
    }

    #[test]
    fn empty_template_is_rejected() {
        assert!(matches!(
            CommandProvisioner::from_template("   "),
            Err(Error::ConfigInvalid(_))
        ));
    }

    #[tokio::test]
    async fn failing_command_is_a_provisioning_error() {
        let provisioner = CommandProvisioner::new("false", vec![]);
        let err = provisioner
            .provision("1.0", Path::new("/nonexistent"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Provisioning(_)));
    }
}
