//! Scoped file-creation mask for system-wide installs.

#[cfg(unix)]
use nix::sys::stat::{umask, Mode};
use pipsafe_core::Scope;

/// World-readable: new directories 0755, new files 0644.
#[cfg(unix)]
const RELAXED_MASK: u32 = 0o022;

/// Holds a relaxed umask for its lifetime and restores the caller's mask on
/// drop, including early returns and unwinding.
#[derive(Debug)]
pub struct UmaskGuard {
    #[cfg(unix)]
    previous: Mode,
}

impl UmaskGuard {
    pub fn relaxed() -> Self {
        #[cfg(unix)]
        {
            let previous = umask(Mode::from_bits_truncate(RELAXED_MASK as _));
            Self { previous }
        }

        #[cfg(not(unix))]
        {
            Self {}
        }
    }

    /// Relaxes the mask only for system scope.
    pub fn for_scope(scope: Scope) -> Option<Self> {
        scope.is_system().then(Self::relaxed)
    }
}

impl Drop for UmaskGuard {
    fn drop(&mut self) {
        #[cfg(unix)]
        {
            umask(self.previous);
        }
    }
}
