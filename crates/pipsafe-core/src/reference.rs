use std::fmt;
use std::path::Path;

use crate::PackageKey;

const VCS_PREFIX: &str = "git+";
const CURRENT_DIR: &str = ".";

/// What the user asked to install: a plain name, `name==version`, a VCS URL
/// such as `git+https://host/org/repo`, or `.` for the working directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageReference {
    raw: String,
}

impl PackageReference {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_vcs(&self) -> bool {
        self.raw.starts_with(VCS_PREFIX)
    }

    pub fn is_current_dir(&self) -> bool {
        self.raw == CURRENT_DIR
    }

    /// Sanitized key, resolving `.` against the process working directory.
    pub fn key(&self) -> PackageKey {
        match std::env::current_dir() {
            Ok(cwd) => PackageKey::sanitize(&self.raw, &cwd),
            Err(_) => PackageKey::sanitize(&self.raw, Path::new("")),
        }
    }

    pub fn key_in(&self, cwd: &Path) -> PackageKey {
        PackageKey::sanitize(&self.raw, cwd)
    }
}

impl fmt::Display for PackageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for PackageReference {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
