use std::fmt;
use std::path::Path;

// The `git+` prefix is kept, so VCS environments are named `git+host_org_repo`.
const SCHEME_MARKERS: [&str; 4] = ["https://", "http://", "ssh://", "file://"];
const PATH_SEPARATOR: char = '/';
const JOINER: &str = "_";
const VERSION_PIN: &str = "==";
const CURRENT_DIR: &str = ".";

/// Filesystem-safe directory name derived from a package reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageKey(String);

impl PackageKey {
    /// Derive a key from a raw reference.
    ///
    /// Scheme markers are stripped, remaining `/` become `_`, anything from
    /// the first `==` on is dropped, and `.` becomes the last component of
    /// `cwd`. Never fails; degenerate input yields a degenerate key, which
    /// [`PackageKey::is_addressable`] reports.
    pub fn sanitize(reference: &str, cwd: &Path) -> Self {
        let mut name = reference.to_string();
        for marker in SCHEME_MARKERS {
            name = name.replace(marker, "");
        }
        let name = name.replace(PATH_SEPARATOR, JOINER);
        let name = match name.split_once(VERSION_PIN) {
            Some((head, _)) => head.to_string(),
            None => name,
        };

        if name == CURRENT_DIR {
            let base = cwd
                .file_name()
                .map(|value| value.to_string_lossy().into_owned())
                .unwrap_or_default();
            return Self(base);
        }

        Self(name)
    }

    /// Wrap a name read back from an environment root listing.
    pub fn from_dir_name(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// False for keys that would resolve to the environment root itself or
    /// to its parent.
    pub fn is_addressable(&self) -> bool {
        !matches!(self.0.as_str(), "" | "." | "..")
    }
}

impl fmt::Display for PackageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PackageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
