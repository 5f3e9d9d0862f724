//! Preparation of the shared install root.
//!
//! Every launch provisions into an empty directory. This module makes sure
//! the directory exists and is writable, and empties it (after asking)
//! when a previous launch left something behind.
use crate::confirm::Confirm;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Make `path` an existing, writable, empty directory and return its absolute form.
///
/// A missing directory is created when its parent is writable. A non-empty
/// one is emptied only if `confirm` agrees; the directory itself is kept.
///
/// # Errors
///
/// Returns [`Error::InstallRoot`] when the directory cannot be created or
/// written, or when the operator declines to empty it.
#[tracing::instrument(skip(confirm), fields(path = %path.display()))]
pub fn prepare(path: &Path, confirm: &dyn Confirm) -> Result<PathBuf> {
    if !path.exists() {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !is_writable_dir(&parent) {
            return Err(Error::InstallRoot(format!(
                "Install path does not exist or is not writable: {}",
                path.display()
            )));
        }
        tracing::debug!("Creating install path {}", path.display());
        std::fs::create_dir(path).map_err(|e| {
            Error::InstallRoot(format!("Failed to create {}: {}", path.display(), e))
        })?;
    }

    let absolute = std::fs::canonicalize(path)
        .map_err(|e| Error::InstallRoot(format!("Failed to resolve {}: {}", path.display(), e)))?;

    if !is_writable_dir(&absolute) {
        return Err(Error::InstallRoot(format!(
            "Install path exists but is not writable: {}",
            absolute.display()
        )));
    }

    if !is_empty(&absolute)? {
        let question = format!(
            "{} contains files and/or directories. Remove? [Yn] ",
            absolute.display()
        );
        if !confirm.confirm(&question, true)? {
            return Err(Error::InstallRoot(
                "The installation path is required to be empty. Aborting...".to_string(),
            ));
        }
        empty_dir(&absolute)?;
    }

    Ok(absolute)
}

/// Whether the current user can create files in `path`.
///
/// Permission bits alone do not answer that (ownership, ACLs, read-only
/// mounts), so a marker file is created and removed again.
fn is_writable_dir(path: &Path) -> bool {
    if !path.is_dir() {
        return false;
    }

    let marker = path.join(format!(".version-launcher-write-check-{}", std::process::id()));
    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&marker)
    {
        Ok(file) => {
            drop(file);
            if let Err(e) = std::fs::remove_file(&marker) {
                tracing::warn!("Failed to remove {}: {}", marker.display(), e);
            }
            true
        }
        Err(e) => {
            tracing::debug!("{} is not writable: {}", path.display(), e);
            false
        }
    }
}

fn is_empty(dir: &Path) -> Result<bool> {
    let mut entries = std::fs::read_dir(dir)
        .map_err(|e| Error::InstallRoot(format!("Failed to read {}: {}", dir.display(), e)))?;
    Ok(entries.next().is_none())
}

/// Remove everything inside `dir`, leaving `dir` itself in place.
pub fn empty_dir(dir: &Path) -> Result<()> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| Error::InstallRoot(format!("Failed to read {}: {}", dir.display(), e)))?;

    for entry in entries {
        let entry = entry.map_err(|e| Error::InstallRoot(e.to_string()))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| Error::InstallRoot(e.to_string()))?;

        let removed = if file_type.is_dir() {
            tracing::debug!("Removing directory: {}", path.display());
            std::fs::remove_dir_all(&path)
        } else {
            tracing::trace!("Removing file: {}", path.display());
            std::fs::remove_file(&path)
        };
        removed.map_err(|e| {
            Error::InstallRoot(format!("Failed to remove {}: {}", path.display(), e))
        })?;
    }

    Ok(())
}
