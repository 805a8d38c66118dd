use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use crate::process::run_captured;
use crate::{EnvironmentHandle, LifecycleError, ProvisionBackend, ProvisionerSettings};

/// Materializes an isolated Python runtime, including its own `pip`, in an
/// environment directory.
pub trait EnvironmentProvisioner {
    fn provision(&self, env: &EnvironmentHandle) -> Result<(), LifecycleError>;
}

/// Provisions with the `virtualenv` tool or the standard `venv` module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualenvProvisioner {
    backend: ProvisionBackend,
    python: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ResolvedBackend {
    Virtualenv(PathBuf),
    Venv(String),
}

impl VirtualenvProvisioner {
    pub fn new(settings: &ProvisionerSettings) -> Self {
        Self {
            backend: settings.backend,
            python: settings.python.clone(),
        }
    }

    fn resolve_backend(&self) -> ResolvedBackend {
        match self.backend {
            ProvisionBackend::Virtualenv => {
                ResolvedBackend::Virtualenv(PathBuf::from("virtualenv"))
            }
            ProvisionBackend::Venv => ResolvedBackend::Venv(self.python.clone()),
            ProvisionBackend::Auto => match which::which("virtualenv") {
                Ok(path) => ResolvedBackend::Virtualenv(path),
                Err(_) => ResolvedBackend::Venv(self.python.clone()),
            },
        }
    }

    fn command_for(&self, env: &EnvironmentHandle) -> Command {
        match self.resolve_backend() {
            ResolvedBackend::Virtualenv(program) => {
                let mut command = Command::new(program);
                command.arg(env.dir());
                command
            }
            ResolvedBackend::Venv(python) => {
                let mut command = Command::new(python);
                command.arg("-m").arg("venv").arg(env.dir());
                command
            }
        }
    }
}

impl Default for VirtualenvProvisioner {
    fn default() -> Self {
        Self::new(&ProvisionerSettings::default())
    }
}

impl EnvironmentProvisioner for VirtualenvProvisioner {
    fn provision(&self, env: &EnvironmentHandle) -> Result<(), LifecycleError> {
        debug!("Creating virtualenv at {}", env.dir().display());
        let mut command = self.command_for(env);
        let output = run_captured(&mut command).map_err(|err| LifecycleError::Provision {
            path: env.dir().to_path_buf(),
            reason: format!("failed to start environment tool: {err}"),
        })?;
        if !output.success {
            return Err(LifecycleError::Provision {
                path: env.dir().to_path_buf(),
                reason: output.failure_reason(),
            });
        }
        Ok(())
    }
}
