//! Directory creation and permission hardening.

use crate::error::{PkiError, Result};
use std::fs;
use std::path::Path;

/// Permissions applied to every directory holding keys or certificates.
pub const DIR_MODE: u32 = 0o700;

/// Create the directory containing `file_path` and restrict it to the owner.
///
/// Permissions are applied even when the directory already exists. A bare
/// file name has no directory component and is left alone.
pub fn ensure_parent_dir(file_path: &Path) -> Result<()> {
    let dir = match file_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => return Ok(()),
    };

    create_dir(dir).map_err(|source| PkiError::DirectoryError {
        path: dir.to_path_buf(),
        source,
    })?;

    set_owner_only(dir).map_err(|source| PkiError::PermissionError {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(unix)]
fn create_dir(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new().recursive(true).mode(DIR_MODE).create(dir)
}

#[cfg(not(unix))]
fn create_dir(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)
}

#[cfg(unix)]
fn set_owner_only(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(dir, fs::Permissions::from_mode(DIR_MODE))
}

#[cfg(not(unix))]
fn set_owner_only(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}
