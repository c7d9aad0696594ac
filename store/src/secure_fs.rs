//! Owner-only permissions for the database file and any directory created for it.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Create the database's parent directory and file if needed, then tighten
/// permissions (Unix: 0o600 file and WAL/SHM sidecars, 0o700 on a parent
/// directory created here). An existing parent keeps its mode.
pub(crate) fn prepare_db_path(path: &Path) -> Result<()> {
    if let Some(parent) = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty() && !parent.exists())
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        #[cfg(unix)]
        restrict_dir(parent)?;
    }

    let mut options = OpenOptions::new();
    options.create(true).truncate(false).read(true).write(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options
        .open(path)
        .with_context(|| format!("Failed to create database file: {}", path.display()))?;

    #[cfg(unix)]
    restrict_db_files(path)?;
    Ok(())
}

#[cfg(unix)]
fn restrict_dir(dir: &Path) -> Result<()> {
    use std::os::unix::fs::{MetadataExt, PermissionsExt};

    let metadata = fs::metadata(dir)
        .with_context(|| format!("Failed to read directory metadata: {}", dir.display()))?;
    let our_uid = unsafe { libc::getuid() };
    if metadata.uid() != our_uid || metadata.permissions().mode() & 0o077 == 0 {
        return Ok(());
    }
    fs::set_permissions(dir, fs::Permissions::from_mode(0o700))
        .with_context(|| format!("Failed to set directory permissions: {}", dir.display()))
}

#[cfg(unix)]
fn restrict_db_files(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .with_context(|| format!("Failed to set database permissions: {}", path.display()))?;
    for sidecar in ["-wal", "-shm"].map(|suffix| sidecar_path(path, suffix)) {
        if sidecar.exists() {
            let _ = fs::set_permissions(&sidecar, fs::Permissions::from_mode(0o600));
        }
    }
    Ok(())
}

fn sidecar_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}
