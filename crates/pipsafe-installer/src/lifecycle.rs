use std::ffi::OsString;
use std::fs;
use std::path::Path;

use pipsafe_core::{PackageKey, PackageReference, Scope};
use tracing::{debug, error, info, warn};

use crate::exposure::{
    bin_dir_on_path, path_remediation_command, publish_symlink, retract_symlink,
};
use crate::fs_utils::{ensure_dir, remove_dir_all_if_exists};
use crate::{
    EnvironmentHandle, EnvironmentProvisioner, InstallOutcome, Layouts, LifecycleError,
    ListedPackage, PackageInstaller, PrefixLayout, RemoveOutcome, UmaskGuard,
};

/// Yes/no oracle for interactive questions. Anything but an explicit yes
/// must answer `false`.
pub trait Confirm {
    fn confirm(&self, question: &str) -> bool;
}

/// Answers every question with a fixed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedAnswer(pub bool);

impl Confirm for FixedAnswer {
    fn confirm(&self, _question: &str) -> bool {
        self.0
    }
}

/// Sequences provisioning, installation and executable exposure for one
/// package at a time.
pub struct Lifecycle<'a> {
    layouts: Layouts,
    provisioner: &'a dyn EnvironmentProvisioner,
    installer: &'a dyn PackageInstaller,
    confirm: &'a dyn Confirm,
    path_var: Option<OsString>,
    cert_bundle: bool,
}

impl<'a> Lifecycle<'a> {
    pub fn new(
        layouts: Layouts,
        provisioner: &'a dyn EnvironmentProvisioner,
        installer: &'a dyn PackageInstaller,
        confirm: &'a dyn Confirm,
    ) -> Self {
        Self {
            layouts,
            provisioner,
            installer,
            confirm,
            path_var: std::env::var_os("PATH"),
            cert_bundle: cfg!(target_os = "macos"),
        }
    }

    /// Overrides the PATH value used to decide whether to warn about an
    /// unreachable bin directory.
    pub fn with_path_var(mut self, path_var: Option<OsString>) -> Self {
        self.path_var = path_var;
        self
    }

    /// Whether to install the certificate bundle after the self-upgrade.
    /// Defaults to on for macOS only.
    pub fn with_cert_bundle(mut self, cert_bundle: bool) -> Self {
        self.cert_bundle = cert_bundle;
        self
    }

    pub fn layouts(&self) -> &Layouts {
        &self.layouts
    }

    pub fn install(
        &self,
        reference: &PackageReference,
        scope: Scope,
        upgrade: bool,
    ) -> Result<InstallOutcome, LifecycleError> {
        // System environments must stay readable by every user.
        let _umask = UmaskGuard::for_scope(scope);

        let layout = self.layouts.for_scope(scope);
        let key = addressable_key(reference)?;
        let env = layout.environment(&key);
        let existed = env.exists();

        if upgrade {
            info!("Upgrading {} {} ...", reference, scope.install_for());
        } else {
            info!("Installing {} {} ...", reference, scope.install_for());
        }

        let reuse = upgrade && env.has_installer();
        if let Err(err) = self.prepare_environment(&env, reuse) {
            if !existed {
                self.discard_environment(&env);
            }
            return Err(err);
        }

        if let Err(err) = self.installer.install(&env, reference, upgrade) {
            // Reported once by the caller.
            debug!("install failed, rolling back {}: {err}", env.dir().display());
            if let Err(cleanup_err) = self.remove(reference, scope, false, true) {
                warn!("failed to clean up after unsuccessful install: {cleanup_err}");
            }
            return Err(err);
        }

        let executables = self.installer.list_executables(&env, reference);
        if executables.is_empty() {
            error!("The package does not seem to provide any executables.");
            if self.confirm.confirm("Shall I remove it as something useless?") {
                let removal = self.remove(reference, scope, true, false)?;
                return Ok(InstallOutcome::NoExecutables {
                    venv_dir: env.dir().to_path_buf(),
                    removed: removal.is_removed(),
                });
            }
            info!("Oh, alright. You can peek around in {}", env.dir().display());
            return Ok(InstallOutcome::NoExecutables {
                venv_dir: env.dir().to_path_buf(),
                removed: false,
            });
        }

        self.expose_executables(layout, &env, &executables)?;

        let on_path = bin_dir_on_path(layout, self.path_var.as_deref());
        if on_path {
            info!(
                "Programs installed. You can run them by typing: {}",
                executables.join(", ")
            );
        } else {
            let first = layout.exposed_bin_path(&executables[0]);
            warn!(
                "{} is not in PATH so you can only launch programs like \"{}\" by their complete filename, e.g. {} !",
                layout.bin_dir().display(),
                executables[0],
                first.display()
            );
            info!("Setup your environment PATH variable by running: ");
            info!("{}", path_remediation_command(layout));
        }

        Ok(InstallOutcome::Installed {
            key,
            executables,
            bin_dir: layout.bin_dir().to_path_buf(),
            on_path,
        })
    }

    pub fn remove(
        &self,
        reference: &PackageReference,
        scope: Scope,
        confirmation_needed: bool,
        silent: bool,
    ) -> Result<RemoveOutcome, LifecycleError> {
        let layout = self.layouts.for_scope(scope);
        let key = addressable_key(reference)?;
        let env = layout.environment(&key);

        if !env.exists() {
            warn!(
                "Looks like {} already does not exist. Nothing to do",
                env.dir().display()
            );
            return Ok(RemoveOutcome::NothingToDo);
        }

        if confirmation_needed
            && !self.confirm.confirm(&format!(
                "Are you sure you want to remove package \"{reference}\""
            ))
        {
            info!("Deletion cancelled");
            return Ok(RemoveOutcome::Cancelled);
        }

        let executables = self.installer.list_executables(&env, reference);
        for name in &executables {
            let link_path = layout.exposed_bin_path(name);
            if silent {
                debug!("Removing symlink: {}", link_path.display());
            } else {
                info!("Removing symlink: {}", link_path.display());
            }
            if let Err(err) = retract_symlink(&link_path) {
                warn!("{err}");
            }
        }

        debug!("Going to remove: {}", env.dir().display());
        remove_dir_all_if_exists(env.dir()).map_err(|err| {
            LifecycleError::io(
                format!("failed to remove environment {}", env.dir().display()),
                err,
            )
        })?;

        if silent {
            debug!("Cleaned up {reference}");
        } else {
            info!("{reference} was removed.");
        }
        Ok(RemoveOutcome::Removed { executables })
    }

    /// Every environment under the user root, then the system root. Never
    /// modifies anything.
    pub fn list(&self) -> Result<Vec<ListedPackage>, LifecycleError> {
        let mut packages = Vec::new();
        for layout in [self.layouts.user(), self.layouts.system()] {
            debug!(
                "Listing {} environments in {}",
                layout.scope().as_str(),
                layout.venvs_dir().display()
            );
            for name in environment_names(layout.venvs_dir())? {
                let env = layout.environment(&PackageKey::from_dir_name(name.as_str()));
                let version = self.installer.current_version(&env, &name);
                packages.push(ListedPackage {
                    name,
                    version,
                    scope: layout.scope(),
                });
            }
        }
        Ok(packages)
    }

    fn prepare_environment(
        &self,
        env: &EnvironmentHandle,
        reuse: bool,
    ) -> Result<(), LifecycleError> {
        ensure_dir(env.dir(), env.scope().is_system()).map_err(|err| {
            LifecycleError::io(
                format!("failed to create environment directory {}", env.dir().display()),
                err,
            )
        })?;

        if reuse {
            debug!("Reusing existing virtualenv at {}", env.dir().display());
        } else {
            self.provisioner.provision(env)?;
        }

        self.installer.ensure_latest_self(env)?;
        if self.cert_bundle {
            self.installer.ensure_cert_bundle(env)?;
        }
        Ok(())
    }

    fn expose_executables(
        &self,
        layout: &PrefixLayout,
        env: &EnvironmentHandle,
        executables: &[String],
    ) -> Result<(), LifecycleError> {
        // Refuse before touching anything if any destination is a directory.
        if let Some(conflict) = executables
            .iter()
            .map(|name| layout.exposed_bin_path(name))
            .find(|path| path.is_dir())
        {
            return Err(LifecycleError::Conflict { path: conflict });
        }

        ensure_dir(layout.bin_dir(), false).map_err(|err| {
            LifecycleError::io(
                format!("failed to create bin directory {}", layout.bin_dir().display()),
                err,
            )
        })?;

        for name in executables {
            let source = env.executable_path(name);
            let destination = layout.exposed_bin_path(name);
            debug!(
                "Creating symlink: {} -> {}",
                source.display(),
                destination.display()
            );
            publish_symlink(&source, &destination)?;
        }
        Ok(())
    }

    fn discard_environment(&self, env: &EnvironmentHandle) {
        debug!("Discarding incomplete environment {}", env.dir().display());
        if let Err(err) = remove_dir_all_if_exists(env.dir()) {
            warn!(
                "failed to remove incomplete environment {}: {err}",
                env.dir().display()
            );
        }
    }
}

fn addressable_key(reference: &PackageReference) -> Result<PackageKey, LifecycleError> {
    let key = reference.key();
    if !key.is_addressable() {
        return Err(LifecycleError::InvalidReference {
            reference: reference.to_string(),
        });
    }
    Ok(key)
}

fn environment_names(venvs_dir: &Path) -> Result<Vec<String>, LifecycleError> {
    if !venvs_dir.exists() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(venvs_dir).map_err(|err| {
        LifecycleError::io(
            format!("failed to read environment root {}", venvs_dir.display()),
            err,
        )
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| {
            LifecycleError::io(
                format!("failed to read environment root {}", venvs_dir.display()),
                err,
            )
        })?;
        if !entry.path().is_dir() {
            continue;
        }
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}
