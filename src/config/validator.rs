use crate::config::settings::is_version_dir_name;
use crate::config::{Config, ServerSpec};
use crate::error::{Error, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Validates a single server entry
pub fn validate_server_spec(index: usize, spec: &ServerSpec) -> Result<()> {
    if spec.version.trim().is_empty() {
        return Err(Error::ConfigInvalid(format!("Server #{} has an empty version", index)));
    }

    // The version doubles as the install directory name
    if !is_version_dir_name(&spec.version) {
        return Err(Error::ConfigInvalid(format!(
            "Server #{} has version {:?}, which is not a plain directory name",
            index, spec.version
        )));
    }

    if spec.host.trim().is_empty() {
        return Err(Error::ConfigInvalid(format!("Server #{} has an empty host", index)));
    }

    // u16 already caps the upper bound
    if spec.port == 0 {
        return Err(Error::ConfigInvalid(format!(
            "Server #{} ({}) has port 0, expected 1-65535",
            index, spec.version
        )));
    }

    if spec.config.as_os_str().is_empty() {
        return Err(Error::ConfigInvalid(format!("Server #{} has an empty config path", index)));
    }

    Ok(())
}

/// Validates the list of server entries
pub fn validate_server_specs(specs: &[ServerSpec]) -> Result<()> {
    if specs.is_empty() {
        return Err(Error::ConfigInvalid("No servers configured".to_string()));
    }

    let mut addresses = HashSet::new();
    let mut versions = HashSet::new();
    for (index, spec) in specs.iter().enumerate() {
        validate_server_spec(index, spec)?;

        if !versions.insert(spec.version.as_str()) {
            return Err(Error::ConfigInvalid(format!(
                "Server #{} repeats version {}; every version is installed into its own directory",
                index, spec.version
            )));
        }

        if !addresses.insert((spec.host.to_lowercase(), spec.port)) {
            return Err(Error::ConfigInvalid(format!(
                "Server #{} uses {} which is already claimed by another server",
                index,
                spec.address()
            )));
        }
    }

    Ok(())
}

/// Resolves a server's config path against `base` to an absolute path of an existing file
pub fn resolve_config_path(spec: &ServerSpec, base: &Path) -> Result<PathBuf> {
    let candidate = base.join(&spec.config);

    match std::fs::canonicalize(&candidate) {
        Ok(path) if path.is_file() => Ok(path),
        _ => Err(Error::ConfigValidation(format!(
            "config file missing: {}",
            spec.config.display()
        ))),
    }
}

/// Full configuration validation
///
/// Checks the document shape, then rewrites every server's `config` to the
/// absolute path it resolves to. Nothing is spawned if this fails.
pub fn validate_config(config: &mut Config, base: &Path) -> Result<()> {
    validate_server_specs(&config.servers)?;

    for spec in &mut config.servers {
        let resolved = resolve_config_path(spec, base)?;
        tracing::debug!(version = %spec.version, config = %resolved.display(), "Resolved config file");
        spec.config = resolved;
    }

    Ok(())
}
