use std::path::Path;
use std::process::Command;

use pipsafe_core::PackageReference;
use serde::Deserialize;
use tracing::{debug, info};

use crate::process::{describe_command, run_captured, CommandOutput};
use crate::{EnvironmentHandle, LifecycleError, LookupError};

pub const DAMAGED_NO_PIP: &str = "damaged (no inner pip)";
pub const DAMAGED_NO_INTERPRETER: &str = "damaged (Python interpreter is not found)";
pub const EMPTY_ENVIRONMENT: &str = "empty!";
pub const VERSION_UNKNOWN: &str = "n/a";

const BOOTSTRAP_PACKAGES: [&str; 3] = ["pip", "setuptools", "wheel"];
/// Manifest entries of files pip placed in `<env>/bin`, relative to
/// `<env>/lib/pythonX.Y/site-packages`.
const ENV_BIN_PREFIX: &str = "../../../bin/";
const VERSION_MARKER: &str = "Version:";
const NOT_FOUND_MARKER: &str = "Package(s) not found";

/// One row of `pip list --format json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InstalledPackage {
    pub name: String,
    #[serde(default)]
    pub version: String,
}

/// Package operations inside one environment.
///
/// Implementors supply the raw installer invocations; executable discovery
/// and version reporting are built on top of them and never fail.
pub trait PackageInstaller {
    /// Upgrades the environment's own installer.
    fn ensure_latest_self(&self, env: &EnvironmentHandle) -> Result<(), LifecycleError>;

    /// Installs the root-certificate bundle package.
    fn ensure_cert_bundle(&self, env: &EnvironmentHandle) -> Result<(), LifecycleError>;

    /// Installs (or with `upgrade`, upgrades in place) `reference`, returning
    /// the installer's output lines.
    fn install(
        &self,
        env: &EnvironmentHandle,
        reference: &PackageReference,
        upgrade: bool,
    ) -> Result<Vec<String>, LifecycleError>;

    /// Installed packages that no other installed package depends on.
    fn not_required_packages(
        &self,
        env: &EnvironmentHandle,
    ) -> Result<Vec<InstalledPackage>, LookupError>;

    /// File manifest of an installed package. A non-zero exit is an error.
    fn package_files(
        &self,
        env: &EnvironmentHandle,
        name: &str,
    ) -> Result<Vec<String>, LookupError>;

    /// Metadata lines for a package. A non-zero exit still yields the output,
    /// since "not found" is reported that way.
    fn package_details(
        &self,
        env: &EnvironmentHandle,
        name: &str,
    ) -> Result<Vec<String>, LookupError>;

    /// Names of the executables `reference` placed in the environment's bin
    /// directory, in manifest order. Empty on any lookup failure.
    fn list_executables(
        &self,
        env: &EnvironmentHandle,
        reference: &PackageReference,
    ) -> Vec<String> {
        debug!("Checking what was installed to virtualenv's bin");
        if !env.has_installer() {
            return Vec::new();
        }

        let target = self.lookup_target(env, reference);
        match self.package_files(env, &target) {
            Ok(lines) => executables_from_manifest(&lines),
            Err(err) => {
                debug!("executable discovery for {target} failed: {err}");
                Vec::new()
            }
        }
    }

    /// Package name whose manifest describes what `reference` installed.
    fn lookup_target(&self, env: &EnvironmentHandle, reference: &PackageReference) -> String {
        if reference.is_vcs() {
            match self.not_required_packages(env) {
                Ok(packages) => {
                    if let Some(name) = select_main_package(&packages) {
                        return name.to_string();
                    }
                    debug!("no top-level package found for {reference}");
                }
                Err(err) => debug!("listing top-level packages failed: {err}"),
            }
        }
        env.key().as_str().to_string()
    }

    /// Installed version of `name`, or one of the damaged/empty sentinels.
    fn current_version(&self, env: &EnvironmentHandle, name: &str) -> String {
        if !env.has_installer() {
            return DAMAGED_NO_PIP.to_string();
        }
        if !env.python_path().exists() {
            return DAMAGED_NO_INTERPRETER.to_string();
        }

        match self.package_details(env, name) {
            Ok(lines) => parse_version(&lines),
            Err(LookupError::Spawn { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                DAMAGED_NO_INTERPRETER.to_string()
            }
            Err(err) => {
                debug!("version query for {name} failed: {err}");
                VERSION_UNKNOWN.to_string()
            }
        }
    }
}

/// Runs the environment's own `pip`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipInstaller;

impl PipInstaller {
    fn pip(env: &EnvironmentHandle) -> Command {
        Command::new(env.pip_path())
    }

    fn run_required(
        mut command: Command,
        env: &EnvironmentHandle,
    ) -> Result<CommandOutput, LifecycleError> {
        let output = run_captured(&mut command).map_err(|err| LifecycleError::Provision {
            path: env.dir().to_path_buf(),
            reason: format!("failed to run {}: {err}", describe_command(&command)),
        })?;
        if !output.success {
            return Err(LifecycleError::Provision {
                path: env.dir().to_path_buf(),
                reason: output.failure_reason(),
            });
        }
        Ok(output)
    }

    fn run_lookup(mut command: Command) -> Result<CommandOutput, LookupError> {
        run_captured(&mut command).map_err(|source| LookupError::Spawn {
            command: describe_command(&command),
            source,
        })
    }
}

impl PackageInstaller for PipInstaller {
    fn ensure_latest_self(&self, env: &EnvironmentHandle) -> Result<(), LifecycleError> {
        let mut command = Self::pip(env);
        command.args(["install", "--upgrade", "pip", "--quiet"]);
        // Only this child sees the override; it hides the "new pip available"
        // banner printed by a freshly created environment.
        command.env("PIP_DISABLE_PIP_VERSION_CHECK", "1");
        info!("Ensuring latest pip in the virtualenv");
        debug!(
            "PIP_DISABLE_PIP_VERSION_CHECK=1 {}",
            describe_command(&command)
        );
        Self::run_required(command, env).map(|_| ())
    }

    fn ensure_cert_bundle(&self, env: &EnvironmentHandle) -> Result<(), LifecycleError> {
        let mut command = Self::pip(env);
        command.args(["install", "--upgrade", "certifi", "--quiet"]);
        info!("Ensuring certifi in the virtualenv");
        Self::run_required(command, env).map(|_| ())
    }

    fn install(
        &self,
        env: &EnvironmentHandle,
        reference: &PackageReference,
        upgrade: bool,
    ) -> Result<Vec<String>, LifecycleError> {
        let mut command = Self::pip(env);
        command.arg("install");
        if upgrade {
            command.arg("-U");
        }
        command.arg(reference.as_str()).arg("--quiet");
        debug!("Running pip install in the virtualenv {}", env.key());

        let output = run_captured(&mut command).map_err(|err| LifecycleError::Install {
            reference: reference.to_string(),
            reason: format!("failed to run {}: {err}", describe_command(&command)),
        })?;
        if !output.success {
            return Err(LifecycleError::Install {
                reference: reference.to_string(),
                reason: output.failure_reason(),
            });
        }
        Ok(output.lines)
    }

    fn not_required_packages(
        &self,
        env: &EnvironmentHandle,
    ) -> Result<Vec<InstalledPackage>, LookupError> {
        let mut command = Self::pip(env);
        command.args(["list", "--not-required", "--format", "json"]);
        let output = Self::run_lookup(command)?;
        parse_package_listing(&output.lines)
    }

    fn package_files(
        &self,
        env: &EnvironmentHandle,
        name: &str,
    ) -> Result<Vec<String>, LookupError> {
        let mut command = Self::pip(env);
        command.args(["show", "-f", name]);
        let output = Self::run_lookup(command)?;
        if !output.success {
            return Err(LookupError::Status {
                command: output.description,
                status: output
                    .code
                    .map(|code| code.to_string())
                    .unwrap_or_else(|| "signal".to_string()),
            });
        }
        Ok(output.lines)
    }

    fn package_details(
        &self,
        env: &EnvironmentHandle,
        name: &str,
    ) -> Result<Vec<String>, LookupError> {
        let mut command = Self::pip(env);
        command.args(["show", name]);
        let output = Self::run_lookup(command)?;
        if !output.success {
            debug!(
                "Command {} had error code {}",
                output.description,
                output.code.unwrap_or(-1)
            );
        }
        Ok(output.lines)
    }
}

pub(crate) fn parse_package_listing(
    lines: &[String],
) -> Result<Vec<InstalledPackage>, LookupError> {
    let payload = lines
        .iter()
        .map(|line| line.trim())
        .find(|line| line.starts_with('['))
        .unwrap_or("");
    Ok(serde_json::from_str(payload)?)
}

pub(crate) fn select_main_package(packages: &[InstalledPackage]) -> Option<&str> {
    packages
        .iter()
        .map(|package| package.name.as_str())
        .find(|name| !BOOTSTRAP_PACKAGES.contains(name))
}

pub(crate) fn executables_from_manifest(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| line.starts_with(ENV_BIN_PREFIX))
        .filter_map(|line| Path::new(line).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect()
}

pub(crate) fn parse_version(lines: &[String]) -> String {
    let mut version = None;
    let mut not_found = false;
    for line in lines {
        if line.contains(VERSION_MARKER) {
            if let Some(value) = line.rsplit(':').next() {
                version = Some(value.trim().to_string());
            }
        }
        if line.contains(NOT_FOUND_MARKER) {
            not_found = true;
        }
    }

    match version {
        Some(version) => version,
        None if not_found => EMPTY_ENVIRONMENT.to_string(),
        None => VERSION_UNKNOWN.to_string(),
    }
}
