//! PID registry.
//!
//! The registry is the only state that outlives a launch: a single text
//! file holding the PIDs of started servers as one comma-separated line,
//! e.g. `111,222,333`. A later, separate invocation reads it back to find
//! the servers it should tear down.
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// File-backed list of server PIDs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PidRegistry {
    path: PathBuf,
}

impl PidRegistry {
    /// Registry stored at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the registry file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the registry file exists
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the PIDs back in the order they were written.
    ///
    /// # Errors
    ///
    /// * [`Error::RegistryMissing`] when the file does not exist
    /// * [`Error::Registry`] when it cannot be read or holds something other than PIDs
    pub fn load(&self) -> Result<Vec<u32>> {
        if !self.exists() {
            return Err(Error::RegistryMissing(self.path.clone()));
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            Error::Registry(format!("Failed to read {}: {}", self.path.display(), e))
        })?;

        decode(&content)
    }

    /// Overwrite the registry with `pids`.
    pub fn save(&self, pids: &[u32]) -> Result<()> {
        tracing::debug!(path = %self.path.display(), ?pids, "Writing PID registry");
        std::fs::write(&self.path, encode(pids)).map_err(|e| {
            Error::Registry(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }

    /// Add `pids` after whatever the registry already holds.
    ///
    /// Creates the registry when it does not exist yet.
    pub fn append(&self, pids: &[u32]) -> Result<()> {
        let mut all = if self.exists() { self.load()? } else { Vec::new() };
        all.extend_from_slice(pids);
        self.save(&all)
    }

    /// Delete the registry file. A registry that is already gone is fine.
    pub fn remove(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Registry(format!(
                "Failed to delete {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

/// Serialize PIDs as a comma-joined line.
pub fn encode(pids: &[u32]) -> String {
    pids.iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse a comma-joined line of PIDs.
///
/// Whitespace around entries and empty entries are ignored.
pub fn decode(content: &str) -> Result<Vec<u32>> {
    content
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry
                .parse::<u32>()
                .map_err(|_| Error::Registry(format!("Not a PID: {:?}", entry)))
        })
        .collect()
}
