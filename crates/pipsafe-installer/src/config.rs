use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Layouts, LifecycleError, PrefixLayout};

pub const CONFIG_ENV: &str = "PIP_SAFE_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub provisioner: ProvisionerSettings,
    pub user: LayoutOverride,
    pub system: LayoutOverride,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProvisionerSettings {
    pub backend: ProvisionBackend,
    pub python: String,
}

impl Default for ProvisionerSettings {
    fn default() -> Self {
        Self {
            backend: ProvisionBackend::Auto,
            python: "python3".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProvisionBackend {
    /// `virtualenv` when it is on PATH, else `python -m venv`.
    #[default]
    Auto,
    Virtualenv,
    Venv,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutOverride {
    pub venvs_dir: Option<PathBuf>,
    pub bin_dir: Option<PathBuf>,
}

impl LayoutOverride {
    fn apply(&self, mut layout: PrefixLayout) -> PrefixLayout {
        if let Some(venvs_dir) = &self.venvs_dir {
            layout = layout.with_venvs_dir(venvs_dir);
        }
        if let Some(bin_dir) = &self.bin_dir {
            layout = layout.with_bin_dir(bin_dir);
        }
        layout
    }
}

impl Settings {
    pub fn parse(raw: &str, path: &Path) -> Result<Self, LifecycleError> {
        toml::from_str(raw).map_err(|err| LifecycleError::Config {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
    }

    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, LifecycleError> {
        match fs::read_to_string(path) {
            Ok(raw) => Self::parse(&raw, path),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(LifecycleError::io(
                format!("failed to read config file {}", path.display()),
                err,
            )),
        }
    }

    pub fn load_default(home: Option<&Path>) -> Result<Self, LifecycleError> {
        match default_config_path(
            std::env::var_os(CONFIG_ENV),
            std::env::var_os("XDG_CONFIG_HOME"),
            home,
        ) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn layouts(&self, home: &Path) -> Layouts {
        Layouts::new(
            self.user.apply(PrefixLayout::user(home)),
            self.system.apply(PrefixLayout::system()),
        )
    }
}

pub fn default_config_path(
    explicit: Option<OsString>,
    xdg_config_home: Option<OsString>,
    home: Option<&Path>,
) -> Option<PathBuf> {
    if let Some(path) = explicit.filter(|value| !value.is_empty()) {
        return Some(PathBuf::from(path));
    }
    if let Some(dir) = xdg_config_home.filter(|value| !value.is_empty()) {
        return Some(PathBuf::from(dir).join("pip-safe").join("config.toml"));
    }
    home.map(|home| home.join(".config").join("pip-safe").join("config.toml"))
}
