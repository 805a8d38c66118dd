use std::path::{Path, PathBuf};

use pipsafe_core::{PackageKey, Scope};

use crate::LifecycleError;

pub const SYSTEM_VENVS_DIR: &str = "/opt/pip-safe";
pub const SYSTEM_BIN_DIR: &str = "/usr/local/bin";

const USER_PATH_HINT: &str = "$HOME/.local/bin";

/// Where environments and public executables live for one scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixLayout {
    scope: Scope,
    venvs_dir: PathBuf,
    bin_dir: PathBuf,
    path_hint: String,
}

impl PrefixLayout {
    pub fn new(scope: Scope, venvs_dir: impl Into<PathBuf>, bin_dir: impl Into<PathBuf>) -> Self {
        let bin_dir = bin_dir.into();
        Self {
            scope,
            venvs_dir: venvs_dir.into(),
            path_hint: bin_dir.display().to_string(),
            bin_dir,
        }
    }

    pub fn user(home: &Path) -> Self {
        Self {
            scope: Scope::User,
            venvs_dir: home.join(".virtualenvs"),
            bin_dir: home.join(".local").join("bin"),
            path_hint: USER_PATH_HINT.to_string(),
        }
    }

    pub fn system() -> Self {
        Self::new(Scope::System, SYSTEM_VENVS_DIR, SYSTEM_BIN_DIR)
    }

    pub fn with_venvs_dir(mut self, venvs_dir: impl Into<PathBuf>) -> Self {
        self.venvs_dir = venvs_dir.into();
        self
    }

    pub fn with_bin_dir(mut self, bin_dir: impl Into<PathBuf>) -> Self {
        self.bin_dir = bin_dir.into();
        self.path_hint = self.bin_dir.display().to_string();
        self
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn venvs_dir(&self) -> &Path {
        &self.venvs_dir
    }

    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    /// Bin directory as the user should type it into a shell profile.
    pub fn path_hint(&self) -> &str {
        &self.path_hint
    }

    pub fn venv_dir(&self, key: &PackageKey) -> PathBuf {
        self.venvs_dir.join(key.as_str())
    }

    pub fn environment(&self, key: &PackageKey) -> EnvironmentHandle {
        EnvironmentHandle {
            key: key.clone(),
            scope: self.scope,
            dir: self.venv_dir(key),
        }
    }

    pub fn exposed_bin_path(&self, executable: &str) -> PathBuf {
        self.bin_dir.join(executable)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layouts {
    user: PrefixLayout,
    system: PrefixLayout,
}

impl Layouts {
    pub fn new(user: PrefixLayout, system: PrefixLayout) -> Self {
        Self { user, system }
    }

    pub fn user(&self) -> &PrefixLayout {
        &self.user
    }

    pub fn system(&self) -> &PrefixLayout {
        &self.system
    }

    pub fn for_scope(&self, scope: Scope) -> &PrefixLayout {
        match scope {
            Scope::User => &self.user,
            Scope::System => &self.system,
        }
    }
}

/// One package's private environment directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentHandle {
    key: PackageKey,
    scope: Scope,
    dir: PathBuf,
}

impl EnvironmentHandle {
    pub fn key(&self) -> &PackageKey {
        &self.key
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.dir.join("bin")
    }

    pub fn pip_path(&self) -> PathBuf {
        self.bin_dir().join("pip")
    }

    pub fn python_path(&self) -> PathBuf {
        self.bin_dir().join("python")
    }

    pub fn executable_path(&self, name: &str) -> PathBuf {
        self.bin_dir().join(name)
    }

    pub fn exists(&self) -> bool {
        self.dir.exists()
    }

    pub fn has_installer(&self) -> bool {
        self.pip_path().exists()
    }
}

pub fn default_home() -> Result<PathBuf, LifecycleError> {
    match std::env::var_os("HOME") {
        Some(home) if !home.is_empty() => Ok(PathBuf::from(home)),
        _ => Err(LifecycleError::HomeUnset),
    }
}
