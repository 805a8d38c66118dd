use std::fs;
use std::io;
use std::path::Path;

/// Removes a file or symlink; a dangling symlink counts as present.
pub fn remove_file_if_exists(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

pub fn remove_dir_all_if_exists(path: &Path) -> io::Result<bool> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Creates `path` and its parents. With `world_traversable` the leaf is
/// forced to mode 0755 regardless of the process umask.
pub fn ensure_dir(path: &Path, world_traversable: bool) -> io::Result<()> {
    fs::create_dir_all(path)?;
    if !world_traversable {
        return Ok(());
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    }
    Ok(())
}
