use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that end a lifecycle operation.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("failed to provision environment at {}: {reason}", path.display())]
    Provision { path: PathBuf, reason: String },

    #[error("failed to install {reference}: {reason}")]
    Install { reference: String, reason: String },

    #[error("cannot symlink over existing directory: {}", path.display())]
    Conflict { path: PathBuf },

    #[error("package reference '{reference}' does not name an environment directory")]
    InvalidReference { reference: String },

    #[error("HOME is not set; cannot resolve the user environment root")]
    HomeUnset,

    #[error("invalid configuration in {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl LifecycleError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Executable discovery or version query failure. The orchestrator never
/// propagates it: it degrades to an empty list or a sentinel string.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("{command} exited with {status}")]
    Status { command: String, status: String },

    #[error("unparseable package listing: {0}")]
    Listing(#[from] serde_json::Error),
}
