use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::fs_utils::remove_file_if_exists;
use crate::{LifecycleError, PrefixLayout};

const TEMP_LINK_ATTEMPTS: usize = 64;

static TEMP_LINK_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Points `link_path` at `target`.
///
/// The link is first created under a unique temporary name in the same
/// directory and then renamed over `link_path`, so an existing entry is
/// replaced in one step and `link_path` is never observed missing. An
/// existing directory at `link_path` is a [`LifecycleError::Conflict`] and is
/// left untouched.
pub fn publish_symlink(target: &Path, link_path: &Path) -> Result<(), LifecycleError> {
    if link_path.is_dir() {
        return Err(LifecycleError::Conflict {
            path: link_path.to_path_buf(),
        });
    }

    let temp_link = create_temp_symlink(target, link_path)?;
    if let Err(err) = replace_with(&temp_link, link_path) {
        let _ = remove_file_if_exists(&temp_link);
        return Err(err);
    }
    Ok(())
}

/// Removes `link_path`; returns whether anything was there.
pub fn retract_symlink(link_path: &Path) -> Result<bool, LifecycleError> {
    remove_file_if_exists(link_path).map_err(|err| {
        LifecycleError::io(
            format!("failed to remove exposed executable {}", link_path.display()),
            err,
        )
    })
}

/// System bin directories are assumed reachable: `sudo` sessions often do
/// not load the profile that would put them on PATH.
pub fn bin_dir_on_path(layout: &PrefixLayout, path_var: Option<&OsStr>) -> bool {
    if layout.scope().is_system() {
        return true;
    }
    let Some(path_var) = path_var else {
        return false;
    };
    std::env::split_paths(path_var).any(|entry| entry == layout.bin_dir())
}

pub fn path_remediation_command(layout: &PrefixLayout) -> String {
    format!(
        "echo 'export PATH=$PATH:{}' >> ~/.bashrc && source ~/.bashrc",
        layout.path_hint()
    )
}

fn replace_with(temp_link: &Path, link_path: &Path) -> Result<(), LifecycleError> {
    if link_path.is_dir() {
        return Err(LifecycleError::Conflict {
            path: link_path.to_path_buf(),
        });
    }
    fs::rename(temp_link, link_path).map_err(|err| {
        LifecycleError::io(
            format!(
                "failed to move symlink {} into place at {}",
                temp_link.display(),
                link_path.display()
            ),
            err,
        )
    })
}

fn create_temp_symlink(target: &Path, link_path: &Path) -> Result<PathBuf, LifecycleError> {
    let link_dir = link_path.parent().unwrap_or_else(|| Path::new("."));
    let base_name = link_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut last_err = None;
    for _ in 0..TEMP_LINK_ATTEMPTS {
        let candidate = link_dir.join(temp_link_name(&base_name));
        match create_symlink(target, &candidate) {
            Ok(()) => return Ok(candidate),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => last_err = Some(err),
            Err(err) => {
                return Err(LifecycleError::io(
                    format!(
                        "failed to create symlink {} -> {}",
                        candidate.display(),
                        target.display()
                    ),
                    err,
                ))
            }
        }
    }

    Err(LifecycleError::io(
        format!(
            "failed to find a free temporary name next to {}",
            link_path.display()
        ),
        last_err.unwrap_or_else(|| io::Error::from(io::ErrorKind::AlreadyExists)),
    ))
}

fn temp_link_name(base_name: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    let seq = TEMP_LINK_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!(
        ".{base_name}.pip-safe-{}-{nanos}-{seq}",
        std::process::id()
    )
}

fn create_symlink(target: &Path, link_path: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, link_path)
    }

    #[cfg(not(unix))]
    {
        let _ = (target, link_path);
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "symlinked executables require a POSIX filesystem",
        ))
    }
}
