use std::path::PathBuf;

use pipsafe_core::{PackageKey, Scope};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed {
        key: PackageKey,
        executables: Vec<String>,
        bin_dir: PathBuf,
        on_path: bool,
    },
    /// The package placed nothing in the environment's bin directory.
    NoExecutables { venv_dir: PathBuf, removed: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    NothingToDo,
    Cancelled,
    Removed { executables: Vec<String> },
}

impl RemoveOutcome {
    pub fn is_removed(&self) -> bool {
        matches!(self, Self::Removed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedPackage {
    pub name: String,
    pub version: String,
    pub scope: Scope,
}
