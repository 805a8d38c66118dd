mod config;
mod error;
mod exposure;
mod fs_utils;
mod layout;
mod lifecycle;
mod pip;
mod process;
mod provision;
mod types;
mod umask;

pub use config::{
    default_config_path, LayoutOverride, ProvisionBackend, ProvisionerSettings, Settings,
    CONFIG_ENV,
};
pub use error::{LifecycleError, LookupError};
pub use exposure::{bin_dir_on_path, path_remediation_command, publish_symlink, retract_symlink};
pub use layout::{
    default_home, EnvironmentHandle, Layouts, PrefixLayout, SYSTEM_BIN_DIR, SYSTEM_VENVS_DIR,
};
pub use lifecycle::{Confirm, FixedAnswer, Lifecycle};
pub use pip::{
    InstalledPackage, PackageInstaller, PipInstaller, DAMAGED_NO_INTERPRETER, DAMAGED_NO_PIP,
    EMPTY_ENVIRONMENT, VERSION_UNKNOWN,
};
pub use process::{run_captured, CommandOutput};
pub use provision::{EnvironmentProvisioner, VirtualenvProvisioner};
pub use types::{InstallOutcome, ListedPackage, RemoveOutcome};
pub use umask::UmaskGuard;
