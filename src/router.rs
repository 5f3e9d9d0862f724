//! The request router handed to every spawned server.
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// File name of the router written into the install root.
pub const ROUTER_FILE_NAME: &str = ".router.php";

/// Router for PHP's built-in web server.
///
/// Existing files under the document root are served as they are. Every
/// other request goes through the front controller, with `SCRIPT_FILENAME`
/// pointing at it so the application resolves its own paths correctly.
pub const ROUTER_SCRIPT: &str = r#"<?php
if (file_exists($_SERVER['DOCUMENT_ROOT'] . $_SERVER['SCRIPT_NAME'])) {
    return false;
}

$_SERVER['SCRIPT_FILENAME'] = $_SERVER['DOCUMENT_ROOT'] . '/index.php';

require $_SERVER['DOCUMENT_ROOT'] . '/index.php';
"#;

/// Write the router into `install_root` and return its path.
pub fn materialize(install_root: &Path) -> Result<PathBuf> {
    let path = install_root.join(ROUTER_FILE_NAME);
    tracing::debug!("Writing router to {}", path.display());
    std::fs::write(&path, ROUTER_SCRIPT)
        .map_err(|e| Error::InstallRoot(format!("Failed to write {}: {}", path.display(), e)))?;
    Ok(path)
}
